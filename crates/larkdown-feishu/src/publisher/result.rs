//! Publisher result types.

/// Result of a completed publish or update.
#[derive(Debug)]
pub struct PublishResult {
    /// Id of the created or updated document.
    pub document_id: String,
    /// Wiki node token, set when the document was created in a wiki.
    pub node_token: Option<String>,
    /// Number of images uploaded and bound.
    pub uploaded_images: usize,
}

/// Outcome of a publish attempt.
///
/// A duplicate is a distinct outcome, not an error: the caller decides
/// whether to update the existing document instead.
#[derive(Debug)]
pub enum PublishOutcome {
    /// A new document was created and written.
    Published(PublishResult),
    /// A same-named document already exists in the destination folder.
    Duplicate {
        /// Token of the existing item.
        token: String,
        /// The conflicting title.
        title: String,
    },
}
