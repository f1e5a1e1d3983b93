//! Media upload against an image block.

use std::path::Path;

use rand::RngExt;
use tracing::{info, warn};

use super::FeishuClient;
use crate::types::{ApiResponse, MediaData};

impl FeishuClient {
    /// Upload an image file against an image block's identity.
    ///
    /// The upload endpoint requires the parent block id, the file name,
    /// the parent linkage type, and the byte size alongside the file part.
    /// Returns the uploaded asset's token, or `None` on any transport or
    /// API failure (logged).
    pub fn upload_image(&self, path: &Path, image_block_id: &str) -> Option<String> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read image {}: {e}", path.display());
                return None;
            }
        };

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image.png");
        let content_type = content_type_for(filename);

        let auth = match self.auth_header() {
            Ok(auth) => auth,
            Err(e) => {
                warn!("Image upload failed: {e}");
                return None;
            }
        };

        // Build multipart form data manually
        let boundary = format!(
            "----LarkdownFormBoundary{:016x}",
            rand::rng().random::<u64>()
        );
        let size = data.len().to_string();
        let mut body = Vec::new();

        for (name, value) in [
            ("file_name", filename),
            ("parent_type", "docx_image"),
            ("parent_node", image_block_id),
            ("size", size.as_str()),
        ] {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            );
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }

        // Add file part
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(&data);
        body.extend_from_slice(b"\r\n");

        // End boundary
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        info!("Uploading image '{filename}' for block {image_block_id}");

        let url = format!("{}/drive/v1/medias/upload_all", self.base_url);
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &auth)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send(&body[..]);

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!("Image upload failed: {e}");
                return None;
            }
        };

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            warn!("Image upload failed: {status} - {error_body}");
            return None;
        }

        let resp: ApiResponse<MediaData> = match body_reader.read_json() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Image upload failed: {e}");
                return None;
            }
        };

        if resp.code != 0 {
            warn!("Image upload failed: {} - {}", resp.code, resp.msg);
            return None;
        }

        resp.data.map(|d| d.file_token)
    }
}

/// Content type inferred from a filename's extension.
fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
