//! Document creation, block appends, and content deletion.

use serde_json::{Value, json};
use tracing::{info, warn};

use super::FeishuClient;
use crate::error::FeishuError;
use crate::types::{ApiResponse, BlockListData, ChildrenData, CreateDocumentData, DocumentData};

/// Maximum children per append request.
const APPEND_BATCH_SIZE: usize = 50;

impl FeishuClient {
    /// Create a document, optionally inside a folder.
    ///
    /// Returns `(document_id, root_block_id)`. The two are the same value;
    /// both are returned so callers address content writes explicitly.
    ///
    /// # Errors
    ///
    /// Creation is identity-producing: any transport or API failure is
    /// surfaced since there is no valid identifier to return.
    pub fn create_document(
        &self,
        title: &str,
        folder_token: Option<&str>,
    ) -> Result<(String, String), FeishuError> {
        let url = format!("{}/docx/v1/documents", self.base_url);

        let mut payload = json!({"title": title});
        if let Some(folder) = folder_token {
            payload["folder_token"] = json!(folder);
        }

        info!("Creating document '{title}'");

        let resp: ApiResponse<CreateDocumentData> = self.api_post(&url, &payload)?;
        if resp.code != 0 {
            return Err(FeishuError::Api {
                code: resp.code,
                msg: resp.msg,
            });
        }

        let document = resp
            .data
            .ok_or_else(|| FeishuError::Json("empty document creation response".to_owned()))?
            .document;
        Ok((document.document_id.clone(), document.document_id))
    }

    /// Fetch a document's root block id.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be fetched.
    pub fn document_root_block(&self, document_id: &str) -> Result<String, FeishuError> {
        let url = format!("{}/docx/v1/documents/{document_id}", self.base_url);

        let resp: ApiResponse<DocumentData> = self.api_get(&url)?;
        if resp.code != 0 {
            return Err(FeishuError::Api {
                code: resp.code,
                msg: resp.msg,
            });
        }

        resp.data
            .map(|d| d.document.document_id)
            .ok_or_else(|| FeishuError::Json("empty document response".to_owned()))
    }

    /// Append encoded child blocks under a parent block.
    ///
    /// Batches exceeding the API's per-request limit are chunked into
    /// sequential requests. A chunk failure aborts the remaining chunks;
    /// already-applied chunks are not rolled back, so callers must
    /// tolerate partial application.
    ///
    /// # Errors
    ///
    /// Returns the first failing chunk's error.
    pub fn append_blocks(
        &self,
        document_id: &str,
        block_id: &str,
        children: &[Value],
    ) -> Result<(), FeishuError> {
        if children.is_empty() {
            return Ok(());
        }

        let url = self.children_url(document_id, block_id);
        info!("Appending {} blocks to document {document_id}", children.len());

        for batch in children.chunks(APPEND_BATCH_SIZE) {
            let payload = json!({"children": batch});
            let resp: ApiResponse<ChildrenData> = self.api_post(&url, &payload)?;
            if resp.code != 0 {
                return Err(FeishuError::Api {
                    code: resp.code,
                    msg: resp.msg,
                });
            }
        }

        Ok(())
    }

    /// Delete all child blocks of a document except its root.
    ///
    /// Used for update-in-place. Best-effort: individual delete failures
    /// are logged, not surfaced. Returns false only when the block listing
    /// itself fails.
    pub fn delete_document_content(&self, document_id: &str) -> bool {
        let url = format!("{}/docx/v1/documents/{document_id}/blocks", self.base_url);

        let items = match self.api_get::<BlockListData>(&url) {
            Ok(resp) if resp.code == 0 => resp.data.map(|d| d.items).unwrap_or_default(),
            Ok(resp) => {
                warn!(
                    "Failed to list blocks of {document_id}: {} - {}",
                    resp.code, resp.msg
                );
                return false;
            }
            Err(e) => {
                warn!("Failed to list blocks of {document_id}: {e}");
                return false;
            }
        };

        info!("Clearing {} blocks from document {document_id}", items.len());

        for block in items {
            if block.block_id == document_id {
                continue;
            }
            let delete_url = self.block_url(document_id, &block.block_id);
            match self.api_delete::<Value>(&delete_url) {
                Ok(resp) if resp.code == 0 => {}
                Ok(resp) => warn!(
                    "Failed to delete block {}: {} - {}",
                    block.block_id, resp.code, resp.msg
                ),
                Err(e) => warn!("Failed to delete block {}: {e}", block.block_id),
            }
        }

        true
    }
}
