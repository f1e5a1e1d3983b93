//! Feishu open-platform REST client.
//!
//! Sync HTTP client for the docx, drive, and wiki endpoints. Stateless:
//! every operation takes explicit document and block identifiers, and the
//! bearer credential is produced per request by the configured
//! [`TokenSource`].

mod documents;
mod drive;
mod images;
mod media;
mod tables;
mod wiki;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use ureq::Agent;

use crate::auth::TokenSource;
use crate::error::FeishuError;
use crate::types::ApiResponse;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Feishu REST API client.
pub struct FeishuClient {
    agent: Agent,
    base_url: String,
    token: Box<dyn TokenSource>,
}

impl FeishuClient {
    /// Create a client for the given API base URL (e.g.
    /// `https://open.feishu.cn/open-apis`).
    #[must_use]
    pub fn new(base_url: &str, token: impl TokenSource + 'static) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: Box::new(token),
        }
    }

    /// URL of a block's children collection.
    fn children_url(&self, document_id: &str, block_id: &str) -> String {
        format!(
            "{}/docx/v1/documents/{document_id}/blocks/{block_id}/children",
            self.base_url
        )
    }

    /// URL of a single block.
    fn block_url(&self, document_id: &str, block_id: &str) -> String {
        format!(
            "{}/docx/v1/documents/{document_id}/blocks/{block_id}",
            self.base_url
        )
    }

    /// The Authorization header value for the next request.
    fn auth_header(&self) -> Result<String, FeishuError> {
        Ok(format!("Bearer {}", self.token.bearer_token()?))
    }

    fn api_get<T: DeserializeOwned>(&self, url: &str) -> Result<ApiResponse<T>, FeishuError> {
        let auth = self.auth_header()?;
        let response = self
            .agent
            .get(url)
            .header("Authorization", &auth)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| FeishuError::Http {
                status: 0,
                body: e.to_string(),
            })?;
        Self::read_response(response)
    }

    fn api_post<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &Value,
    ) -> Result<ApiResponse<T>, FeishuError> {
        let auth = self.auth_header()?;
        let payload_bytes = serde_json::to_vec(payload)?;
        let response = self
            .agent
            .post(url)
            .header("Authorization", &auth)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])
            .map_err(|e| FeishuError::Http {
                status: 0,
                body: e.to_string(),
            })?;
        Self::read_response(response)
    }

    fn api_patch<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &Value,
    ) -> Result<ApiResponse<T>, FeishuError> {
        let auth = self.auth_header()?;
        let payload_bytes = serde_json::to_vec(payload)?;
        let response = self
            .agent
            .patch(url)
            .header("Authorization", &auth)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])
            .map_err(|e| FeishuError::Http {
                status: 0,
                body: e.to_string(),
            })?;
        Self::read_response(response)
    }

    fn api_delete<T: DeserializeOwned>(&self, url: &str) -> Result<ApiResponse<T>, FeishuError> {
        let auth = self.auth_header()?;
        let response = self
            .agent
            .delete(url)
            .header("Authorization", &auth)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| FeishuError::Http {
                status: 0,
                body: e.to_string(),
            })?;
        Self::read_response(response)
    }

    /// Decode a response: HTTP errors carry the raw body, everything else
    /// is parsed as the standard envelope.
    fn read_response<T: DeserializeOwned>(
        response: ureq::http::Response<ureq::Body>,
    ) -> Result<ApiResponse<T>, FeishuError> {
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(FeishuError::Http {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_json()?)
    }
}
