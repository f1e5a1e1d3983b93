//! Publisher error type.

use crate::error::FeishuError;

/// Error from a publish or update operation.
///
/// Only identity-producing failures surface here: when the document or
/// its destination cannot be created there is nothing to write into.
/// Content-mutation and asset failures are logged partial failures.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Feishu API error.
    #[error("{0}")]
    Feishu(#[from] FeishuError),

    /// IO error reading the source file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or unresolvable destination configuration.
    #[error("{0}")]
    Target(String),
}
