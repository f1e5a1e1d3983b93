//! Markdown parsing into an ordered block sequence.
//!
//! This crate converts raw markdown text into the abstract block model that
//! the Feishu client consumes: an ordered list of [`Block`]s plus two side
//! lists ([`PendingImage`], [`PendingTable`]) recording the positions of
//! blocks that need follow-up remote calls. Block order in the sequence is
//! the rendered order of the final document; the position within the
//! sequence is the correlation key used by the writer to reinsert image and
//! table results at the correct point.
//!
//! No vendor wire details live here; numeric block-type codes and JSON
//! payload shapes belong to the client crate.
//!
//! # Example
//!
//! ```
//! use larkdown_parser::{Block, parse};
//!
//! let doc = parse("# Title\n\nSome **bold** text");
//! assert_eq!(doc.blocks.len(), 2);
//! assert!(matches!(doc.blocks[0], Block::Heading { level: 1, .. }));
//! ```

mod block;
mod inline;
mod parser;

pub use block::{Block, Document, ImageOrigin, PendingImage, PendingTable, RunStyle, TextRun};
pub use parser::parse;
