use crate::errors::ToolError;
use crate::fakturoid::FakturoidError;
use serde::Serialize;
use serde_json::Value;

pub fn unknown_action_error(
    manager: &str,
    action: Option<&Value>,
    known_actions: &[&str],
) -> ToolError {
    let action_value = action.and_then(|v| v.as_str()).unwrap_or("");
    ToolError::internal(format!("Unknown {} action: {}", manager, action_value))
        .with_hint(format!("Use one of: {}.", known_actions.join(", ")))
        .with_details(serde_json::json!({ "known_actions": known_actions }))
}

/// `map_err` adapter: `client.get_invoice(id).await.map_err(failed("get invoice"))`
/// yields `Failed to get invoice: <cause>`.
pub fn failed(operation: &'static str) -> impl FnOnce(FakturoidError) -> ToolError {
    move |err| ToolError::from(err).context(format!("Failed to {}", operation))
}

pub fn to_tool_value<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value)
        .map_err(|err| ToolError::internal(format!("Failed to encode result: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;

    #[test]
    fn failed_prefixes_operation() {
        let err = failed("get invoice")(FakturoidError::Api {
            status: 404,
            body: "{}".to_string(),
        });
        assert_eq!(err.kind, ToolErrorKind::NotFound);
        assert!(err.message.starts_with("Failed to get invoice: "));
    }

    #[test]
    fn unknown_action_lists_known_actions() {
        let action = Value::String("invoice_archive".to_string());
        let err = unknown_action_error("invoice", Some(&action), &["invoice_list"]);
        assert_eq!(err.message, "Unknown invoice action: invoice_archive");
        assert_eq!(err.hint.as_deref(), Some("Use one of: invoice_list."));
    }
}
