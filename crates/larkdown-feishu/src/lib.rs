//! Feishu docx integration.
//!
//! Everything vendor-facing lives here: the wire encoding of parsed
//! blocks, the REST client, the image asset resolver, and the publisher
//! that drives a whole publish or update operation.
//!
//! # Architecture
//!
//! - [`FeishuClient`] is a stateless wrapper over the docx, drive, and
//!   wiki endpoints; every operation takes explicit identifiers.
//! - [`DocumentApi`] is the client's operation contract. The publisher is
//!   generic over it so the orchestration logic is testable with fakes.
//! - [`AssetResolver`] turns image references (local paths or remote URLs)
//!   into local files, caching downloads by a URL hash.
//! - [`DocumentPublisher`] parses a markdown source and walks the block
//!   sequence, interleaving batched appends with image and table calls so
//!   the remote document renders in source order.

mod api;
mod assets;
mod auth;
mod blocks;
mod client;
mod error;
mod publisher;
mod types;

pub use api::DocumentApi;
pub use assets::AssetResolver;
pub use auth::{StaticToken, TokenSource};
pub use blocks::{BlockTypeCode, block_to_json, code_language_id};
pub use client::FeishuClient;
pub use error::FeishuError;
pub use publisher::{
    DocumentPublisher, PublishConfig, PublishError, PublishOutcome, PublishResult, PublishTarget,
};
pub use types::DriveFile;
