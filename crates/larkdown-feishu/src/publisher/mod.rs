//! Document publisher.
//!
//! Drives the whole publish/update flow: parse the markdown source, check
//! the destination for duplicates, create or select the target document,
//! then walk the block sequence interleaving ordinary block batches with
//! image and table handling so the remote document renders in source
//! order.
//!
//! # Example
//!
//! ```ignore
//! use larkdown_feishu::{DocumentPublisher, FeishuClient, PublishConfig, PublishTarget, StaticToken};
//!
//! let client = FeishuClient::new("https://open.feishu.cn/open-apis", StaticToken::new(token));
//! let publisher = DocumentPublisher::new(&client, PublishConfig::default());
//!
//! let outcome = publisher.publish(Path::new("notes.md"), &PublishTarget::Space)?;
//! ```

mod error;
mod executor;
mod result;

pub use error::PublishError;
pub use executor::DocumentPublisher;
pub use result::{PublishOutcome, PublishResult};

use std::path::PathBuf;

use crate::assets::AssetResolver;

/// Destination for a publish operation.
#[derive(Clone, Debug)]
pub enum PublishTarget {
    /// The caller's own docs space.
    Space,
    /// A drive folder.
    Folder(String),
    /// A wiki space, optionally under a parent node. A missing space id is
    /// resolved from the node token.
    Wiki {
        space_id: Option<String>,
        node_token: Option<String>,
    },
}

/// Configuration for publish and update operations.
#[derive(Debug)]
pub struct PublishConfig {
    /// Check the destination folder for a same-named document before
    /// creating a new one.
    pub check_duplicate: bool,
    /// Folder consulted by the duplicate check when the target itself is
    /// not a folder.
    pub folder_token: Option<String>,
    /// Cache directory for downloaded remote images.
    pub image_cache_dir: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            check_duplicate: true,
            folder_token: None,
            image_cache_dir: AssetResolver::default_cache_dir(),
        }
    }
}
