use thiserror::Error;

#[derive(Debug, Error)]
pub enum FakturoidError {
    #[error("oauth token error ({}): {message}", status.map(|s| s.to_string()).unwrap_or_else(|| "no status".to_string()))]
    Authentication { status: Option<u16>, message: String },

    #[error("fakturoid rate limit exceeded, try again later")]
    RateLimited { body: String },

    #[error("fakturoid API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("unmarshal response: {0}")]
    Decode(String),

    #[error("marshal request: {0}")]
    Encode(String),

    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("request failed: {0}")]
    Transport(String),
}

impl FakturoidError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FakturoidError::Authentication { status, .. } => *status,
            FakturoidError::RateLimited { .. } => Some(429),
            FakturoidError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
