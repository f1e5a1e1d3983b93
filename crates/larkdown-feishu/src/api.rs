//! The document operation contract consumed by the publisher.
//!
//! [`FeishuClient`] is the production implementation; tests drive the
//! publisher with a recording fake. The error policy mirrors the client:
//! identity-producing operations return `Result`, best-effort content
//! mutations return `Option`/`bool`/empty collections.

use std::path::Path;

use serde_json::Value;

use crate::client::FeishuClient;
use crate::error::FeishuError;
use crate::types::DriveFile;

/// Remote document operations.
pub trait DocumentApi {
    /// Create a document, optionally in a folder; returns
    /// `(document_id, root_block_id)`.
    fn create_document(
        &self,
        title: &str,
        folder_token: Option<&str>,
    ) -> Result<(String, String), FeishuError>;

    /// Create a document in a wiki space; returns `(obj_token, node_token)`.
    fn create_wiki_document(
        &self,
        title: &str,
        space_id: &str,
        parent_node_token: Option<&str>,
    ) -> Result<(String, String), FeishuError>;

    /// Resolve a wiki node token to its owning space id.
    fn wiki_space_id(&self, node_token: &str) -> Option<String>;

    /// Fetch a document's root block id.
    fn document_root_block(&self, document_id: &str) -> Result<String, FeishuError>;

    /// List documents in a drive folder; empty on failure.
    fn list_documents(&self, folder_token: &str) -> Vec<DriveFile>;

    /// Delete all content under a document's root, best-effort.
    fn delete_document_content(&self, document_id: &str) -> bool;

    /// Append encoded blocks under a parent, chunked.
    fn append_blocks(
        &self,
        document_id: &str,
        block_id: &str,
        children: &[Value],
    ) -> Result<(), FeishuError>;

    /// Create an empty image block; `None` on failure.
    fn create_image_block(&self, document_id: &str, block_id: &str) -> Option<String>;

    /// Upload an image file against an image block; returns the file token.
    fn upload_image(&self, path: &Path, image_block_id: &str) -> Option<String>;

    /// Bind an uploaded file token to an image block.
    fn bind_image_token(&self, document_id: &str, image_block_id: &str, file_token: &str) -> bool;

    /// Create an empty table block; returns its id.
    fn create_table(
        &self,
        document_id: &str,
        block_id: &str,
        rows: usize,
        cols: usize,
    ) -> Option<String>;

    /// Populate a table from a row-major grid.
    fn fill_table(&self, document_id: &str, table_block_id: &str, grid: &[Vec<String>]) -> bool;
}

impl DocumentApi for FeishuClient {
    fn create_document(
        &self,
        title: &str,
        folder_token: Option<&str>,
    ) -> Result<(String, String), FeishuError> {
        FeishuClient::create_document(self, title, folder_token)
    }

    fn create_wiki_document(
        &self,
        title: &str,
        space_id: &str,
        parent_node_token: Option<&str>,
    ) -> Result<(String, String), FeishuError> {
        FeishuClient::create_wiki_document(self, title, space_id, parent_node_token)
    }

    fn wiki_space_id(&self, node_token: &str) -> Option<String> {
        FeishuClient::wiki_space_id(self, node_token)
    }

    fn document_root_block(&self, document_id: &str) -> Result<String, FeishuError> {
        FeishuClient::document_root_block(self, document_id)
    }

    fn list_documents(&self, folder_token: &str) -> Vec<DriveFile> {
        FeishuClient::list_documents(self, folder_token)
    }

    fn delete_document_content(&self, document_id: &str) -> bool {
        FeishuClient::delete_document_content(self, document_id)
    }

    fn append_blocks(
        &self,
        document_id: &str,
        block_id: &str,
        children: &[Value],
    ) -> Result<(), FeishuError> {
        FeishuClient::append_blocks(self, document_id, block_id, children)
    }

    fn create_image_block(&self, document_id: &str, block_id: &str) -> Option<String> {
        FeishuClient::create_image_block(self, document_id, block_id)
    }

    fn upload_image(&self, path: &Path, image_block_id: &str) -> Option<String> {
        FeishuClient::upload_image(self, path, image_block_id)
    }

    fn bind_image_token(&self, document_id: &str, image_block_id: &str, file_token: &str) -> bool {
        FeishuClient::bind_image_token(self, document_id, image_block_id, file_token)
    }

    fn create_table(
        &self,
        document_id: &str,
        block_id: &str,
        rows: usize,
        cols: usize,
    ) -> Option<String> {
        FeishuClient::create_table(self, document_id, block_id, rows, cols)
    }

    fn fill_table(&self, document_id: &str, table_block_id: &str, grid: &[Vec<String>]) -> bool {
        FeishuClient::fill_table(self, document_id, table_block_id, grid)
    }
}
