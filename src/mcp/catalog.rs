use crate::errors::ToolError;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        if let Ok(schema) = JSONSchema::compile(&tool.input_schema) {
            map.insert(tool.name.clone(), schema);
        }
    }
    map
});

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

pub fn list_tools() -> Vec<ToolDef> {
    TOOL_CATALOG.clone()
}

pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), ToolError> {
    let Some(schema) = TOOL_VALIDATORS.get(tool_name) else {
        return Ok(());
    };
    if let Err(errors) = schema.validate(args) {
        let message = format_schema_errors(tool_name, errors);
        return Err(ToolError::invalid_params(message)
            .with_hint(format!("See the inputSchema of {} in tools/list", tool_name)));
    }
    Ok(())
}

fn format_schema_errors(tool_name: &str, errors: jsonschema::ErrorIterator) -> String {
    let mut lines = vec![format!("Invalid arguments for {}", tool_name)];
    for err in errors.take(10) {
        let instance_path = if err.instance_path.to_string().is_empty() {
            "(root)".to_string()
        } else {
            err.instance_path.to_string()
        };
        let rendered = match &err.kind {
            jsonschema::error::ValidationErrorKind::Required { property } => {
                let prop = property
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| property.to_string());
                if instance_path == "(root)" {
                    format!("{} is required", prop)
                } else {
                    format!("{}: {} is required", instance_path, prop)
                }
            }
            jsonschema::error::ValidationErrorKind::Type { kind } => {
                format!("{}: expected {}", instance_path, format_type_kind(kind))
            }
            jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
                format!("{}: unknown field(s) {}", instance_path, unexpected.join(", "))
            }
            _ => format!("{}: {}", instance_path, err),
        };
        lines.push(format!("- {}", rendered));
    }
    lines.join("\n")
}

fn format_type_kind(kind: &jsonschema::error::TypeKind) -> String {
    match kind {
        jsonschema::error::TypeKind::Single(primitive) => primitive.to_string(),
        jsonschema::error::TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_declares_every_tool_once() {
        let names: Vec<&str> = tool_catalog().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), 22);
        assert_eq!(TOOL_MAP.len(), names.len());
        assert!(names.iter().all(|n| n.starts_with("fakturoid_")));
    }

    #[test]
    fn every_schema_compiles() {
        assert_eq!(TOOL_VALIDATORS.len(), tool_catalog().len());
    }

    #[test]
    fn missing_required_field_is_named() {
        let err = validate_tool_args("fakturoid_invoice_detail", &json!({})).unwrap_err();
        assert!(err.message.contains("id is required"), "{}", err.message);
    }

    #[test]
    fn ill_typed_field_is_reported() {
        let err = validate_tool_args(
            "fakturoid_invoice_create",
            &json!({"subject_id": 42, "lines": "one"}),
        )
        .unwrap_err();
        assert!(err.message.contains("/lines: expected array"), "{}", err.message);
    }

    #[test]
    fn numeric_string_ids_are_accepted() {
        assert!(validate_tool_args("fakturoid_subject_detail", &json!({"id": "17"})).is_ok());
        assert!(validate_tool_args("fakturoid_subject_detail", &json!({"id": 0})).is_err());
    }

    #[test]
    fn empty_lines_fail_schema() {
        assert!(validate_tool_args(
            "fakturoid_expense_create",
            &json!({"subject_id": 1, "lines": []})
        )
        .is_err());
    }
}
