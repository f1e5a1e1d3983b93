//! Error types for the Feishu integration.

/// Error from Feishu API operations.
#[derive(Debug, thiserror::Error)]
pub enum FeishuError {
    /// HTTP transport or status error.
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// Non-zero application-level status code in a response envelope.
    #[error("API error: {code} - {msg}")]
    Api { code: i64, msg: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Bearer token could not be produced.
    #[error("Token error: {0}")]
    Token(String),
}

impl From<serde_json::Error> for FeishuError {
    fn from(e: serde_json::Error) -> Self {
        FeishuError::Json(e.to_string())
    }
}

impl From<ureq::Error> for FeishuError {
    fn from(e: ureq::Error) -> Self {
        FeishuError::Http {
            status: 0,
            body: e.to_string(),
        }
    }
}
