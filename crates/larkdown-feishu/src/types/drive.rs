//! Drive listing and media upload types.

use serde::Deserialize;

/// Payload of a folder-listing response.
#[derive(Debug, Deserialize)]
pub struct FileListData {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// One entry in a folder listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    /// Item token; for documents this is the document id.
    pub token: String,
    /// Display name; documents carry no file extension.
    pub name: String,
    /// Item kind (e.g. "docx", "folder").
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Payload of a media upload response.
#[derive(Debug, Deserialize)]
pub struct MediaData {
    pub file_token: String,
}
