//! Wire encoding of parsed blocks.
//!
//! The vendor's numeric block-type and code-language identifiers live only
//! here, as named enumerations and one lookup table, keeping the parser and
//! the client decoupled from wire details.

use larkdown_parser::{Block, RunStyle, TextRun};
use serde_json::{Value, json};

/// Numeric block-type codes of the docx API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BlockTypeCode {
    Text = 2,
    Heading1 = 3,
    Heading2 = 4,
    Heading3 = 5,
    Heading4 = 6,
    Heading5 = 7,
    Heading6 = 8,
    Heading7 = 9,
    Heading8 = 10,
    Heading9 = 11,
    Bullet = 12,
    Ordered = 13,
    Code = 14,
    Quote = 15,
    Divider = 22,
    Image = 27,
    Table = 31,
}

impl BlockTypeCode {
    /// The numeric wire code.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Heading code for a depth in 1..=9.
    #[must_use]
    pub fn heading(level: u8) -> Self {
        match level {
            1 => Self::Heading1,
            2 => Self::Heading2,
            3 => Self::Heading3,
            4 => Self::Heading4,
            5 => Self::Heading5,
            6 => Self::Heading6,
            7 => Self::Heading7,
            8 => Self::Heading8,
            _ => Self::Heading9,
        }
    }
}

/// Language id used when a tag is unknown.
const PLAIN_TEXT_LANGUAGE: u16 = 47;

/// Map a fence language tag to the vendor's numeric language id.
///
/// Unknown tags map to plain text.
#[must_use]
pub fn code_language_id(tag: &str) -> u16 {
    match tag.to_lowercase().as_str() {
        "python" => 49,
        "javascript" | "js" => 22,
        "typescript" | "ts" => 67,
        "java" => 21,
        "go" => 18,
        "c" => 7,
        "cpp" | "c++" => 9,
        "csharp" | "c#" => 10,
        "ruby" => 54,
        "php" => 46,
        "swift" => 64,
        "kotlin" => 27,
        "rust" => 55,
        "sql" => 61,
        "shell" | "bash" => 58,
        "json" => 23,
        "xml" => 73,
        "html" => 20,
        "css" => 11,
        "yaml" => 74,
        "markdown" => 35,
        _ => PLAIN_TEXT_LANGUAGE,
    }
}

/// Encode an ordinary block as a docx child payload.
///
/// Image and table blocks return `None`: they are placeholders that the
/// writer routes through dedicated creation calls, never through the batch
/// append path.
#[must_use]
pub fn block_to_json(block: &Block) -> Option<Value> {
    let value = match block {
        Block::Heading { level, runs } => {
            let mut obj = json!({
                "block_type": BlockTypeCode::heading(*level).code(),
            });
            obj[format!("heading{level}").as_str()] = json!({"elements": elements_json(runs)});
            obj
        }
        Block::Paragraph { runs } => json!({
            "block_type": BlockTypeCode::Text.code(),
            "text": {"elements": elements_json(runs)},
        }),
        Block::Quote { runs } => json!({
            "block_type": BlockTypeCode::Quote.code(),
            "quote": {"elements": elements_json(runs)},
        }),
        Block::Bullet { runs } => json!({
            "block_type": BlockTypeCode::Bullet.code(),
            "bullet": {"elements": elements_json(runs)},
        }),
        Block::Ordered { runs } => json!({
            "block_type": BlockTypeCode::Ordered.code(),
            "ordered": {"elements": elements_json(runs)},
        }),
        Block::Divider => json!({
            "block_type": BlockTypeCode::Divider.code(),
            "divider": {},
        }),
        Block::Code { content, language } => json!({
            "block_type": BlockTypeCode::Code.code(),
            "code": {
                "elements": [{"text_run": {"content": content}}],
                "language": code_language_id(language),
            },
        }),
        Block::Image { .. } | Block::Table { .. } => return None,
    };
    Some(value)
}

/// Encode a paragraph child carrying one plain text run.
///
/// Used for table cell population.
#[must_use]
pub(crate) fn plain_text_child(content: &str) -> Value {
    json!({
        "block_type": BlockTypeCode::Text.code(),
        "text": {"elements": [{"text_run": {"content": content}}]},
    })
}

fn elements_json(runs: &[TextRun]) -> Value {
    Value::Array(runs.iter().map(run_json).collect())
}

fn run_json(run: &TextRun) -> Value {
    let mut text_run = json!({"content": run.content});
    if let Some(style) = &run.style {
        text_run["text_element_style"] = match style {
            RunStyle::Bold => json!({"bold": true}),
            RunStyle::Italic => json!({"italic": true}),
            RunStyle::InlineCode => json!({"inline_code": true}),
            RunStyle::Link(url) => json!({"link": {"url": url}}),
        };
    }
    json!({"text_run": text_run})
}

#[cfg(test)]
mod tests {
    use larkdown_parser::ImageOrigin;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_heading_codes_follow_depth() {
        assert_eq!(BlockTypeCode::heading(1).code(), 3);
        assert_eq!(BlockTypeCode::heading(5).code(), 7);
        assert_eq!(BlockTypeCode::heading(9).code(), 11);
    }

    #[test]
    fn test_heading_json_uses_depth_key() {
        let block = Block::Heading {
            level: 3,
            runs: vec![TextRun::plain("Title")],
        };
        let value = block_to_json(&block).unwrap();
        assert_eq!(value["block_type"], 5);
        assert_eq!(value["heading3"]["elements"][0]["text_run"]["content"], "Title");
    }

    #[test]
    fn test_paragraph_with_styled_runs() {
        let block = Block::Paragraph {
            runs: vec![
                TextRun::plain("go "),
                TextRun::styled("now", RunStyle::Bold),
            ],
        };
        let value = block_to_json(&block).unwrap();
        assert_eq!(value["block_type"], 2);
        let elements = &value["text"]["elements"];
        assert!(elements[0]["text_run"].get("text_element_style").is_none());
        assert_eq!(elements[1]["text_run"]["text_element_style"]["bold"], true);
    }

    #[test]
    fn test_link_run_carries_url() {
        let block = Block::Paragraph {
            runs: vec![TextRun::styled(
                "docs",
                RunStyle::Link("https://docs.rs".to_owned()),
            )],
        };
        let value = block_to_json(&block).unwrap();
        assert_eq!(
            value["text"]["elements"][0]["text_run"]["text_element_style"]["link"]["url"],
            "https://docs.rs"
        );
    }

    #[test]
    fn test_divider_has_empty_body() {
        let value = block_to_json(&Block::Divider).unwrap();
        assert_eq!(value["block_type"], 22);
        assert_eq!(value["divider"], serde_json::json!({}));
    }

    #[test]
    fn test_code_block_language_id() {
        let block = Block::Code {
            content: "fn main() {}".to_owned(),
            language: "rust".to_owned(),
        };
        let value = block_to_json(&block).unwrap();
        assert_eq!(value["block_type"], 14);
        assert_eq!(value["code"]["language"], 55);
        assert_eq!(value["code"]["elements"][0]["text_run"]["content"], "fn main() {}");
    }

    #[test]
    fn test_unknown_language_maps_to_plain_text() {
        assert_eq!(code_language_id("brainfuck"), 47);
        assert_eq!(code_language_id("plain_text"), 47);
    }

    #[test]
    fn test_language_lookup_is_case_insensitive() {
        assert_eq!(code_language_id("Python"), 49);
        assert_eq!(code_language_id("BASH"), 58);
    }

    #[test]
    fn test_placeholders_are_not_encoded() {
        let image = Block::Image {
            source: "x.png".to_owned(),
            origin: ImageOrigin::Local,
        };
        let table = Block::Table { grid: vec![] };
        assert_eq!(block_to_json(&image), None);
        assert_eq!(block_to_json(&table), None);
    }

    #[test]
    fn test_plain_text_child_shape() {
        let value = plain_text_child("cell");
        assert_eq!(value["block_type"], 2);
        assert_eq!(value["text"]["elements"][0]["text_run"]["content"], "cell");
    }
}
