//! Word wrapping for styled spans.
//!
//! The response panel needs to know on which screen row each highlight lands
//! so `[` / `]` can scroll it into view, so lines are wrapped here instead of
//! by `Paragraph::wrap`. Breaks happen at whitespace; a word wider than the
//! row is split at character boundaries. Whitespace at the start of a
//! continuation row is dropped.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wraps `spans` into rows at most `width` columns wide.
///
/// `first_prefix` starts the first row and `rest_prefix` every following row;
/// both count against `width`. Always returns at least one row.
pub fn wrap_spans(
    spans: Vec<Span<'static>>,
    width: usize,
    first_prefix: Vec<Span<'static>>,
    rest_prefix: Vec<Span<'static>>,
) -> Vec<Line<'static>> {
    let mut rows = Vec::new();
    let mut row = Row::new(first_prefix);

    for (word, style) in words(&spans) {
        let is_space = word.chars().all(char::is_whitespace);
        let word_width = word.width();

        if is_space {
            if row.is_blank() && !rows.is_empty() {
                continue;
            }
            if row.width + word_width > width {
                rows.push(row.finish());
                row = Row::new(rest_prefix.clone());
                continue;
            }
            row.push(word, style, word_width);
            continue;
        }

        if row.width + word_width > width && !row.is_blank() {
            rows.push(row.finish());
            row = Row::new(rest_prefix.clone());
        }

        if row.width + word_width <= width {
            row.push(word, style, word_width);
            continue;
        }

        // Word wider than a whole row: split it by characters.
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if row.width + ch_width > width && !row.is_blank() {
                rows.push(row.finish());
                row = Row::new(rest_prefix.clone());
            }
            row.push(ch.to_string(), style, ch_width);
        }
    }

    rows.push(row.finish());
    rows
}

fn prefix_width(prefix: &[Span<'_>]) -> usize {
    prefix.iter().map(|s| s.content.width()).sum()
}

/// Splits spans into alternating runs of whitespace and non-whitespace, each
/// tagged with its span's style.
fn words(spans: &[Span<'static>]) -> Vec<(String, Style)> {
    let mut out: Vec<(String, Style)> = Vec::new();
    for span in spans {
        let mut current = String::new();
        let mut current_space = None;
        for ch in span.content.chars() {
            let space = ch.is_whitespace();
            if current_space.is_some_and(|s| s != space) {
                out.push((std::mem::take(&mut current), span.style));
            }
            current_space = Some(space);
            current.push(ch);
        }
        if !current.is_empty() {
            out.push((current, span.style));
        }
    }
    out
}

/// A row under construction.
struct Row {
    spans: Vec<Span<'static>>,
    width: usize,
    prefix_width: usize,
}

impl Row {
    fn new(prefix: Vec<Span<'static>>) -> Self {
        let width = prefix_width(&prefix);
        Self { spans: prefix, width, prefix_width: width }
    }

    /// True while nothing but the prefix has been added.
    fn is_blank(&self) -> bool {
        self.width == self.prefix_width
    }

    fn push(&mut self, text: String, style: Style, width: usize) {
        // Merge into the previous span when the style matches.
        if !self.is_blank() {
            if let Some(last) = self.spans.last_mut() {
                if last.style == style {
                    last.content.to_mut().push_str(&text);
                    self.width += width;
                    return;
                }
            }
        }
        self.spans.push(Span::styled(text, style));
        self.width += width;
    }

    fn finish(self) -> Line<'static> {
        Line::from(self.spans)
    }
}
