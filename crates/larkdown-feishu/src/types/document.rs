//! Docx document and block types.

use serde::Deserialize;

/// Payload of a document-creation response.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentData {
    pub document: DocumentInfo,
}

/// Payload of a document-info response.
#[derive(Debug, Deserialize)]
pub struct DocumentData {
    pub document: DocumentInfo,
}

/// Document identity. The document id doubles as its root block id.
#[derive(Debug, Deserialize)]
pub struct DocumentInfo {
    pub document_id: String,
}

/// Payload of a children-creation response.
#[derive(Debug, Deserialize)]
pub struct ChildrenData {
    #[serde(default)]
    pub children: Vec<BlockInfo>,
}

/// Payload of a block-listing response.
#[derive(Debug, Deserialize)]
pub struct BlockListData {
    #[serde(default)]
    pub items: Vec<BlockInfo>,
}

/// A single block's identity.
#[derive(Debug, Deserialize)]
pub struct BlockInfo {
    pub block_id: String,
}
