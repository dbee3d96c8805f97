use crate::errors::ToolError;
use serde::Serialize;
use serde_json::Value;

pub fn render_tool_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => to_pretty_json(other),
    }
}

pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("json error: {}", err))
}

pub fn render_tool_error(tool: &str, error: &ToolError) -> String {
    let mut lines = vec![
        error.message.clone(),
        format!("tool: {}", tool),
        format!("code: {}", error.code),
        format!("retryable: {}", error.retryable),
    ];
    if let Some(hint) = &error.hint {
        lines.push(format!("hint: {}", hint));
    }
    if let Some(status) = error
        .details
        .as_ref()
        .and_then(|details| details.get("status"))
        .filter(|status| !status.is_null())
    {
        lines.push(format!("status: {}", status));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_rendered_verbatim() {
        assert_eq!(
            render_tool_text(&Value::String("Invoice 5 deleted".to_string())),
            "Invoice 5 deleted"
        );
    }

    #[test]
    fn values_are_pretty_printed() {
        let text = render_tool_text(&serde_json::json!({ "id": 1 }));
        assert_eq!(text, "{\n  \"id\": 1\n}");
    }

    #[test]
    fn error_text_carries_code_and_status() {
        let err = ToolError::not_found("Failed to get invoice: fakturoid API error (404): {}")
            .with_details(serde_json::json!({ "status": 404 }));
        let text = render_tool_error("fakturoid_invoice_detail", &err);
        assert!(text.starts_with("Failed to get invoice"));
        assert!(text.contains("code: NOT_FOUND"));
        assert!(text.contains("status: 404"));
    }
}
