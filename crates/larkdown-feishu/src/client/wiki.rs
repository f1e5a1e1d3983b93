//! Wiki space and node operations.

use serde_json::json;
use tracing::{info, warn};

use super::FeishuClient;
use crate::error::FeishuError;
use crate::types::{ApiResponse, WikiNodeData};

impl FeishuClient {
    /// Create a document directly in a wiki space.
    ///
    /// Returns `(obj_token, node_token)`: the first addresses the backing
    /// document for content writes, the second the node in the wiki tree.
    ///
    /// # Errors
    ///
    /// Creation is identity-producing: failures are surfaced.
    pub fn create_wiki_document(
        &self,
        title: &str,
        space_id: &str,
        parent_node_token: Option<&str>,
    ) -> Result<(String, String), FeishuError> {
        let url = format!("{}/wiki/v2/spaces/{space_id}/nodes", self.base_url);

        let mut payload = json!({
            "obj_type": "docx",
            "node_type": "origin",
            "title": title,
        });
        if let Some(parent) = parent_node_token {
            payload["parent_node_token"] = json!(parent);
        }

        info!("Creating wiki document '{title}' in space {space_id}");

        let resp: ApiResponse<WikiNodeData> = self.api_post(&url, &payload)?;
        if resp.code != 0 {
            return Err(FeishuError::Api {
                code: resp.code,
                msg: resp.msg,
            });
        }

        let node = resp
            .data
            .ok_or_else(|| FeishuError::Json("empty wiki node response".to_owned()))?
            .node;
        Ok((node.obj_token, node.node_token))
    }

    /// Resolve a node token to its owning wiki space id.
    ///
    /// Returns `None` on any failure.
    pub fn wiki_space_id(&self, node_token: &str) -> Option<String> {
        let url = format!(
            "{}/wiki/v2/spaces/get_node?token={node_token}",
            self.base_url
        );

        match self.api_get::<WikiNodeData>(&url) {
            Ok(resp) if resp.code == 0 => resp
                .data
                .map(|d| d.node.space_id)
                .filter(|id| !id.is_empty()),
            Ok(resp) => {
                warn!("Wiki node lookup failed: {} - {}", resp.code, resp.msg);
                None
            }
            Err(e) => {
                warn!("Wiki node lookup failed: {e}");
                None
            }
        }
    }
}
