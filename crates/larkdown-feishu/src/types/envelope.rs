//! The response envelope shared by all JSON endpoints.

use serde::Deserialize;

/// Standard `{ code, msg, data }` envelope.
///
/// A zero `code` means success; any other value is an application-level
/// failure and `data` is unreliable.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}
