use crate::constants::pagination::DEFAULT_PAGE;
use crate::errors::ToolError;
use crate::fakturoid::DocumentLine;
use serde_json::Value;

#[derive(Clone, Default)]
pub struct Validation;

fn present<'a>(args: &'a Value, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|v| !v.is_null())
}

// Integers, whole floats like `5.0`, and numeric strings.
fn as_whole_number(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
}

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(&self, args: &Value, key: &str) -> Result<String, ToolError> {
        let value = present(args, key).ok_or_else(|| ToolError::required(key))?;
        let text = value
            .as_str()
            .ok_or_else(|| ToolError::invalid_params(format!("{} must be a string", key)))?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ToolError::required(key));
        }
        Ok(trimmed.to_string())
    }

    pub fn ensure_optional_string(
        &self,
        args: &Value,
        key: &str,
    ) -> Result<Option<String>, ToolError> {
        match present(args, key) {
            None => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.trim().to_string())),
            Some(_) => Err(ToolError::invalid_params(format!(
                "{} must be a string",
                key
            ))),
        }
    }

    pub fn ensure_id(&self, args: &Value, key: &str) -> Result<u64, ToolError> {
        let value = present(args, key).ok_or_else(|| ToolError::required(key))?;
        match as_whole_number(value) {
            Some(0) => Err(ToolError::required(key)),
            Some(id) => Ok(id),
            None => Err(ToolError::invalid_params(format!(
                "{} must be a positive integer",
                key
            ))),
        }
    }

    pub fn ensure_optional_id(&self, args: &Value, key: &str) -> Result<Option<u64>, ToolError> {
        if present(args, key).is_none() {
            return Ok(None);
        }
        self.ensure_id(args, key).map(Some)
    }

    pub fn ensure_page(&self, args: &Value) -> Result<u32, ToolError> {
        let Some(value) = present(args, "page") else {
            return Ok(DEFAULT_PAGE);
        };
        match as_whole_number(value) {
            Some(page) if page >= 1 && page <= u32::MAX as u64 => Ok(page as u32),
            _ => Err(ToolError::invalid_params(
                "page must be a positive integer",
            )),
        }
    }

    pub fn ensure_lines(&self, args: &Value) -> Result<Vec<DocumentLine>, ToolError> {
        let value = present(args, "lines").ok_or_else(|| ToolError::required("lines"))?;
        let items = value
            .as_array()
            .ok_or_else(|| ToolError::invalid_params("lines must be an array"))?;
        if items.is_empty() {
            return Err(ToolError::invalid_params("at least one line is required"));
        }
        serde_json::from_value(value.clone())
            .map_err(|err| ToolError::invalid_params(format!("Invalid lines: {}", err)))
    }

    pub fn ensure_optional_lines(
        &self,
        args: &Value,
    ) -> Result<Option<Vec<DocumentLine>>, ToolError> {
        if present(args, "lines").is_none() {
            return Ok(None);
        }
        self.ensure_lines(args).map(Some)
    }
}
