//! Image placeholder blocks.
//!
//! Images land in a document in two phases: an empty image block is
//! created first, the asset is uploaded against that block's identity, and
//! the uploaded token is then bound to the block.

use serde_json::{Value, json};
use tracing::warn;

use super::FeishuClient;
use crate::blocks::BlockTypeCode;
use crate::types::ChildrenData;

impl FeishuClient {
    /// Create an empty image block under a parent block.
    ///
    /// Returns the new block's id, or `None` on failure.
    pub fn create_image_block(&self, document_id: &str, block_id: &str) -> Option<String> {
        let url = self.children_url(document_id, block_id);
        let payload = json!({
            "children": [{
                "block_type": BlockTypeCode::Image.code(),
                "image": {},
            }],
        });

        match self.api_post::<ChildrenData>(&url, &payload) {
            Ok(resp) if resp.code == 0 => resp
                .data
                .and_then(|d| d.children.into_iter().next())
                .map(|child| child.block_id),
            Ok(resp) => {
                warn!("Image block creation failed: {} - {}", resp.code, resp.msg);
                None
            }
            Err(e) => {
                warn!("Image block creation failed: {e}");
                None
            }
        }
    }

    /// Bind an uploaded asset's token to an image block.
    ///
    /// Best-effort: returns whether the bind succeeded.
    pub fn bind_image_token(
        &self,
        document_id: &str,
        image_block_id: &str,
        file_token: &str,
    ) -> bool {
        let url = self.block_url(document_id, image_block_id);
        let payload = json!({
            "replace_image": {"token": file_token},
        });

        match self.api_patch::<Value>(&url, &payload) {
            Ok(resp) if resp.code == 0 => true,
            Ok(resp) => {
                warn!("Image token bind failed: {} - {}", resp.code, resp.msg);
                false
            }
            Err(e) => {
                warn!("Image token bind failed: {e}");
                false
            }
        }
    }
}
