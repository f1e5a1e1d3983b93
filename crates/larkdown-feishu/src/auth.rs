//! Bearer credential source.
//!
//! Token acquisition and refresh happen outside this crate; the client only
//! consumes a credential per request through this trait. Tests and callers
//! with an already-acquired token use [`StaticToken`].

use crate::error::FeishuError;

/// Supplies the bearer credential attached to each request.
pub trait TokenSource {
    /// Produce the current bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`FeishuError::Token`] when no credential can be produced.
    fn bearer_token(&self) -> Result<String, FeishuError>;
}

/// A fixed, pre-acquired token.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wrap an already-acquired token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Result<String, FeishuError> {
        Ok(self.token.clone())
    }
}
