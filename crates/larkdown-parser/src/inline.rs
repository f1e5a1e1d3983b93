//! Inline style scanner.
//!
//! A single left-to-right pass over one line of text, emitting
//! non-overlapping styled runs. First match wins; the bold alternatives are
//! listed before italic so `**x**` never parses as nested italics.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{RunStyle, TextRun};

static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.+?)\*\*|__(.+?)__|`(.+?)`|\*(.+?)\*|_(.+?)_|\[(.+?)\]\((.+?)\)").unwrap()
});

/// Split a line into styled and plain runs.
///
/// Unmatched text between and around styled spans becomes plain runs.
/// Text with no recognized span (including the empty string) yields a
/// single plain run, so every text-bearing block has at least one element.
pub(crate) fn scan(text: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut last_end = 0;

    for caps in INLINE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() > last_end {
            runs.push(TextRun::plain(&text[last_end..whole.start()]));
        }

        if let Some(bold) = caps.get(1).or_else(|| caps.get(2)) {
            runs.push(TextRun::styled(bold.as_str(), RunStyle::Bold));
        } else if let Some(code) = caps.get(3) {
            runs.push(TextRun::styled(code.as_str(), RunStyle::InlineCode));
        } else if let Some(italic) = caps.get(4).or_else(|| caps.get(5)) {
            runs.push(TextRun::styled(italic.as_str(), RunStyle::Italic));
        } else if let (Some(label), Some(url)) = (caps.get(6), caps.get(7)) {
            runs.push(TextRun::styled(
                label.as_str(),
                RunStyle::Link(url.as_str().to_owned()),
            ));
        }

        last_end = whole.end();
    }

    if last_end < text.len() {
        runs.push(TextRun::plain(&text[last_end..]));
    }

    if runs.is_empty() {
        runs.push(TextRun::plain(text));
    }

    runs
}
