use crate::fakturoid::FakturoidError;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    Denied,
    NotFound,
    RateLimited,
    Timeout,
    Retryable,
    Upstream,
    Decode,
    Internal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub retryable: bool,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
            retryable: matches!(
                kind,
                ToolErrorKind::Timeout | ToolErrorKind::Retryable | ToolErrorKind::RateLimited
            ),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn context(mut self, prefix: impl AsRef<str>) -> Self {
        self.message = format!("{}: {}", prefix.as_ref(), self.message);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn required(field: &str) -> Self {
        Self::invalid_params(format!("{} is required", field))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, "NOT_FOUND", message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, "TIMEOUT", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

impl From<FakturoidError> for ToolError {
    fn from(err: FakturoidError) -> Self {
        let message = err.to_string();
        let status = err.status();
        let mapped = match err {
            FakturoidError::Authentication { .. } => {
                ToolError::new(ToolErrorKind::Denied, "AUTHENTICATION_FAILED", message)
                    .with_hint("Check FAKTUROID_CLIENT_ID and FAKTUROID_CLIENT_SECRET.")
            }
            FakturoidError::RateLimited { .. } => {
                ToolError::new(ToolErrorKind::RateLimited, "RATE_LIMITED", message)
                    .with_hint("Wait a moment before calling the tool again.")
            }
            FakturoidError::Api { status, body } => {
                let (kind, code) = match status {
                    404 => (ToolErrorKind::NotFound, "NOT_FOUND"),
                    400 | 422 => (ToolErrorKind::InvalidParams, "UPSTREAM_REJECTED"),
                    401 | 403 => (ToolErrorKind::Denied, "FORBIDDEN"),
                    _ => (ToolErrorKind::Upstream, "UPSTREAM_ERROR"),
                };
                return ToolError::new(kind, code, message)
                    .with_details(serde_json::json!({ "status": status, "body": body }));
            }
            FakturoidError::Decode(_) => ToolError::new(ToolErrorKind::Decode, "DECODE_FAILED", message),
            FakturoidError::Encode(_) => ToolError::invalid_params(message),
            FakturoidError::Timeout(_) => ToolError::timeout(message),
            FakturoidError::Transport(_) => {
                ToolError::new(ToolErrorKind::Retryable, "NETWORK", message)
            }
        };
        match status {
            Some(status) => mapped.with_details(serde_json::json!({ "status": status })),
            None => mapped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_maps_to_retryable_kind() {
        let err = ToolError::from(FakturoidError::RateLimited {
            body: String::new(),
        });
        assert_eq!(err.kind, ToolErrorKind::RateLimited);
        assert_eq!(err.code, "RATE_LIMITED");
        assert!(err.retryable);
    }

    #[test]
    fn api_error_keeps_status_in_details() {
        let err = ToolError::from(FakturoidError::Api {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(err.kind, ToolErrorKind::Upstream);
        let details = err.details.expect("details");
        assert_eq!(details["status"], 500);
        assert_eq!(details["body"], "boom");
        assert!(!err.retryable);
    }

    #[test]
    fn missing_invoice_maps_to_not_found() {
        let err = ToolError::from(FakturoidError::Api {
            status: 404,
            body: "{}".to_string(),
        });
        assert_eq!(err.kind, ToolErrorKind::NotFound);
    }

    #[test]
    fn auth_failure_carries_token_endpoint_status() {
        let err = ToolError::from(FakturoidError::Authentication {
            status: Some(401),
            message: "invalid_client".to_string(),
        });
        assert_eq!(err.code, "AUTHENTICATION_FAILED");
        assert_eq!(err.details.expect("details")["status"], 401);

        let err = ToolError::from(FakturoidError::Authentication {
            status: None,
            message: "empty access token".to_string(),
        });
        assert!(err.details.is_none());
    }

    #[test]
    fn rate_limit_details_report_429() {
        let err = ToolError::from(FakturoidError::RateLimited {
            body: String::new(),
        });
        assert_eq!(err.details.expect("details")["status"], 429);
    }

    #[test]
    fn context_prefixes_message() {
        let err = ToolError::required("id").context("Failed to get invoice");
        assert_eq!(err.message, "Failed to get invoice: id is required");
    }
}
