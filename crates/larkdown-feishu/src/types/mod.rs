//! Feishu API response types.

mod document;
mod drive;
mod envelope;
mod wiki;

pub use document::{BlockInfo, BlockListData, ChildrenData, CreateDocumentData, DocumentData, DocumentInfo};
pub use drive::{DriveFile, FileListData, MediaData};
pub use envelope::ApiResponse;
pub use wiki::{WikiNode, WikiNodeData};
