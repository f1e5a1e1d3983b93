//! Drive folder listing.

use tracing::{info, warn};

use super::FeishuClient;
use crate::types::{DriveFile, FileListData};

/// Page size for folder listings.
const LIST_PAGE_SIZE: u32 = 200;

impl FeishuClient {
    /// List the documents in a drive folder.
    ///
    /// Returns an empty list on any API-level error rather than failing:
    /// callers use this for duplicate checks where an unreadable folder
    /// simply means no duplicates can be found.
    pub fn list_documents(&self, folder_token: &str) -> Vec<DriveFile> {
        let url = format!(
            "{}/drive/v1/files?folder_token={folder_token}&page_size={LIST_PAGE_SIZE}",
            self.base_url
        );

        info!("Listing documents in folder {folder_token}");

        match self.api_get::<FileListData>(&url) {
            Ok(resp) if resp.code == 0 => resp.data.map(|d| d.files).unwrap_or_default(),
            Ok(resp) => {
                warn!("Folder listing failed: {} - {}", resp.code, resp.msg);
                Vec::new()
            }
            Err(e) => {
                warn!("Folder listing failed: {e}");
                Vec::new()
            }
        }
    }
}
