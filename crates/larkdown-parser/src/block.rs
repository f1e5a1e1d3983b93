//! The abstract block model produced by the parser.

/// A span of literal text with at most one style.
///
/// Runs concatenate to reconstruct the original visual line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    /// Literal text content.
    pub content: String,
    /// Optional style; `None` is a plain run.
    pub style: Option<RunStyle>,
}

impl TextRun {
    /// Create an unstyled run.
    #[must_use]
    pub fn plain(content: &str) -> Self {
        Self {
            content: content.to_owned(),
            style: None,
        }
    }

    /// Create a styled run.
    #[must_use]
    pub fn styled(content: &str, style: RunStyle) -> Self {
        Self {
            content: content.to_owned(),
            style: Some(style),
        }
    }
}

/// Inline style applied to a [`TextRun`].
///
/// Styles never nest; a run carries at most one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStyle {
    Bold,
    Italic,
    InlineCode,
    /// Link with its target URL.
    Link(String),
}

/// Where an image reference points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Path relative to the source file's directory (or absolute).
    Local,
    /// `http://` or `https://` URL, downloaded at write time.
    Remote,
}

/// One discrete structural unit of the document, in rendered order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Heading with depth 1..=9.
    Heading { level: u8, runs: Vec<TextRun> },
    Paragraph { runs: Vec<TextRun> },
    /// Consecutive quote lines merged into one block, newline-joined.
    Quote { runs: Vec<TextRun> },
    /// A single bulleted item; list items are never grouped.
    Bullet { runs: Vec<TextRun> },
    /// A single ordered item.
    Ordered { runs: Vec<TextRun> },
    Divider,
    /// Fenced code with its verbatim content and language tag.
    Code { content: String, language: String },
    /// Image placeholder; resolved and uploaded at write time.
    Image { source: String, origin: ImageOrigin },
    /// Table placeholder with its row-major cell grid.
    Table { grid: Vec<Vec<String>> },
}

/// An image awaiting download/upload, keyed by its block position.
///
/// Created during parse, consumed once when the writer reaches `index`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingImage {
    /// Position in the block sequence.
    pub index: usize,
    /// Local path or remote URL, exactly as written in the source.
    pub source: String,
    pub origin: ImageOrigin,
}

/// A table awaiting cell population, keyed by its block position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTable {
    /// Position in the block sequence.
    pub index: usize,
    /// Row-major cell grid; rows may be ragged.
    pub grid: Vec<Vec<String>>,
}

impl PendingTable {
    /// Table dimensions as `(rows, columns)`.
    ///
    /// Column count is the maximum cell count across rows; writers treat
    /// missing cells in shorter rows as empty.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        let rows = self.grid.len();
        let cols = self.grid.iter().map(Vec::len).max().unwrap_or(0);
        (rows, cols)
    }
}

/// Parse output: the ordered block sequence plus the pending side lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub pending_images: Vec<PendingImage>,
    pub pending_tables: Vec<PendingTable>,
}
