//! Image reference resolution.
//!
//! Resolves an image reference to a local file: local paths are resolved
//! against the source document's directory, remote URLs are downloaded
//! into an on-disk cache keyed by a content hash of the URL so repeated
//! publishes never re-fetch. Uploading the resolved file is the client's
//! job ([`crate::FeishuClient::upload_image`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{info, warn};
use ureq::Agent;

use larkdown_parser::ImageOrigin;

/// Download timeout in seconds.
const DOWNLOAD_TIMEOUT: u64 = 30;

/// Some image hosts refuse requests without a browser-like client id.
const DOWNLOAD_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Extensions accepted straight from the URL path.
const KNOWN_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// Fallback extension when nothing can be inferred.
const DEFAULT_EXTENSION: &str = "jpg";

/// Resolves image references to local files.
pub struct AssetResolver {
    base_dir: PathBuf,
    cache_dir: PathBuf,
    agent: Agent,
}

impl AssetResolver {
    /// Create a resolver.
    ///
    /// `base_dir` is the source document's directory, used for relative
    /// local references; `cache_dir` holds downloaded remote images.
    #[must_use]
    pub fn new(base_dir: PathBuf, cache_dir: PathBuf) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DOWNLOAD_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            base_dir,
            cache_dir,
            agent,
        }
    }

    /// Default cache directory under the system temp dir.
    #[must_use]
    pub fn default_cache_dir() -> PathBuf {
        std::env::temp_dir().join("larkdown-images")
    }

    /// Resolve a reference to a local file, or `None` on failure (logged).
    pub fn resolve(&self, source: &str, origin: ImageOrigin) -> Option<PathBuf> {
        match origin {
            ImageOrigin::Remote => self.download(source),
            ImageOrigin::Local => {
                let path = Path::new(source);
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.base_dir.join(path)
                };

                if path.exists() {
                    Some(path)
                } else {
                    warn!("Image not found: {}", path.display());
                    None
                }
            }
        }
    }

    /// Download a remote image into the cache, reusing an existing entry.
    fn download(&self, url: &str) -> Option<PathBuf> {
        let local_path = self.cache_dir.join(cache_filename(url));
        if local_path.exists() {
            return Some(local_path);
        }

        info!("Downloading image {url}");

        let response = match self
            .agent
            .get(url)
            .header("User-Agent", DOWNLOAD_USER_AGENT)
            .call()
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Image download failed for {url}: {e}");
                return None;
            }
        };

        let status = response.status().as_u16();
        if status >= 400 {
            warn!("Image download failed for {url}: HTTP {status}");
            return None;
        }

        let bytes = match response.into_body().read_to_vec() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Image download failed for {url}: {e}");
                return None;
            }
        };

        if let Err(e) = std::fs::create_dir_all(&self.cache_dir) {
            warn!("Failed to create image cache dir: {e}");
            return None;
        }
        if let Err(e) = std::fs::write(&local_path, &bytes) {
            warn!("Failed to store downloaded image: {e}");
            return None;
        }

        Some(local_path)
    }
}

/// Stable cache filename for a URL: a truncated URL hash plus an inferred
/// extension.
fn cache_filename(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("img_{}.{}", &digest[..12], infer_extension(url))
}

/// Infer an image extension from a URL.
///
/// The URL path's extension wins when recognized; otherwise a `wx_fmt=`
/// query hint is consulted; otherwise the fixed default applies.
fn infer_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if let Some(ext) = Path::new(path).extension().and_then(|ext| ext.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if KNOWN_EXTENSIONS.contains(&ext.as_str()) {
            return ext;
        }
    }

    if let Some(idx) = url.rfind("wx_fmt=") {
        let fmt = &url[idx + "wx_fmt=".len()..];
        let fmt = fmt.split('&').next().unwrap_or(fmt);
        return match fmt {
            "jpeg" | "jpg" => "jpg",
            "png" => "png",
            "gif" => "gif",
            "webp" => "webp",
            "bmp" => "bmp",
            _ => DEFAULT_EXTENSION,
        }
        .to_owned();
    }

    DEFAULT_EXTENSION.to_owned()
}
