//! Line-oriented markdown parser.
//!
//! Single pass over the input lines, greedy per construct. At each
//! unconsumed line the constructs are tried in a fixed precedence order:
//! heading, fenced code, table, image, quote, bulleted list, ordered list,
//! divider, paragraph. Blank lines emit nothing.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, Document, ImageOrigin, PendingImage, PendingTable};
use crate::inline;

static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!\[.*?\]\((.*?)\)").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s").unwrap());
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s").unwrap());
static DIVIDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*_]{3,}$").unwrap());
static ALIGNMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-:]+$").unwrap());

/// Language tag used when a code fence declares none.
const DEFAULT_LANGUAGE: &str = "plain_text";

/// Parse markdown text into the ordered block sequence.
///
/// Image and table blocks are recorded twice: as placeholder entries in
/// the block sequence and as [`PendingImage`] / [`PendingTable`] entries
/// tagged with their sequence position for the write phase.
#[must_use]
pub fn parse(text: &str) -> Document {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut doc = Document::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        // Heading: every leading '#' counts toward depth, capped at 9.
        if line.starts_with('#') {
            let depth = line.chars().take_while(|&c| c == '#').count();
            let level = depth.min(9) as u8;
            doc.blocks.push(Block::Heading {
                level,
                runs: inline::scan(line[depth..].trim()),
            });
            i += 1;
            continue;
        }

        // Fenced code block; an unclosed fence runs to end of input.
        if line.starts_with("```") {
            let tag = line[3..].trim();
            let language = if tag.is_empty() { DEFAULT_LANGUAGE } else { tag };
            let mut code_lines = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].starts_with("```") {
                code_lines.push(lines[i]);
                i += 1;
            }
            i += 1; // skip the closing fence
            doc.blocks.push(Block::Code {
                content: code_lines.join("\n"),
                language: language.to_owned(),
            });
            continue;
        }

        // Table region: starts at a line with at least two column delimiters.
        let trimmed = line.trim();
        if trimmed.starts_with('|') && trimmed[1..].contains('|') {
            let (grid, consumed) = parse_table(&lines, i);
            if !grid.is_empty() {
                doc.pending_tables.push(PendingTable {
                    index: doc.blocks.len(),
                    grid: grid.clone(),
                });
                doc.blocks.push(Block::Table { grid });
                i += consumed;
                continue;
            }
        }

        // Image reference. Malformed syntax (no closing paren) never
        // matches and the line falls through to paragraph handling.
        if let Some(caps) = IMAGE.captures(line) {
            let source = caps[1].to_owned();
            let origin = if source.starts_with("http://") || source.starts_with("https://") {
                ImageOrigin::Remote
            } else {
                ImageOrigin::Local
            };
            doc.pending_images.push(PendingImage {
                index: doc.blocks.len(),
                source: source.clone(),
                origin,
            });
            doc.blocks.push(Block::Image { source, origin });
            i += 1;
            continue;
        }

        // Block quote: consecutive '>' lines merge into one block.
        if line.starts_with('>') {
            let mut quote_lines = Vec::new();
            while i < lines.len() && lines[i].starts_with('>') {
                quote_lines.push(lines[i][1..].trim());
                i += 1;
            }
            doc.blocks.push(Block::Quote {
                runs: inline::scan(&quote_lines.join("\n")),
            });
            continue;
        }

        // Unordered list: one independent block per item.
        if BULLET.is_match(line) {
            while i < lines.len() && BULLET.is_match(lines[i]) {
                doc.blocks.push(Block::Bullet {
                    runs: inline::scan(&BULLET.replace(lines[i], "")),
                });
                i += 1;
            }
            continue;
        }

        // Ordered list: one independent block per item.
        if ORDERED.is_match(line) {
            while i < lines.len() && ORDERED.is_match(lines[i]) {
                doc.blocks.push(Block::Ordered {
                    runs: inline::scan(&ORDERED.replace(lines[i], "")),
                });
                i += 1;
            }
            continue;
        }

        if DIVIDER.is_match(trimmed) {
            doc.blocks.push(Block::Divider);
            i += 1;
            continue;
        }

        if !trimmed.is_empty() {
            doc.blocks.push(Block::Paragraph {
                runs: inline::scan(line),
            });
        }

        i += 1;
    }

    doc
}

/// Consume a table region starting at `start`.
///
/// Returns the emitted grid and the number of lines consumed. Alignment
/// rows (cells of dashes and colons only) are consumed but never emitted.
fn parse_table(lines: &[&str], start: usize) -> (Vec<Vec<String>>, usize) {
    let mut grid = Vec::new();
    let mut i = start;

    while i < lines.len() {
        let line = lines[i].trim();
        if !line.starts_with('|') {
            break;
        }

        let cells = split_row(line);
        if cells.iter().all(|c| ALIGNMENT.is_match(c)) {
            i += 1;
            continue;
        }

        grid.push(cells);
        i += 1;
    }

    (grid, i - start)
}

/// Split one table row into trimmed cells, dropping the outer delimiters.
fn split_row(line: &str) -> Vec<String> {
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|cell| cell.trim().to_owned()).collect()
}
