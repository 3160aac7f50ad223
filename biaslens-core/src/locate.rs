//! Text locator: finds where a critic's quoted excerpt sits inside the answer.
//!
//! Critics quote answers loosely: whitespace gets reflowed and longer quotes
//! drift into paraphrase. Three tiers are tried in order and the first hit wins:
//!
//! 1. exact substring search;
//! 2. search after collapsing every whitespace run to a single space, with the
//!    hit remapped onto the original answer's offsets;
//! 3. search for the first five words of the quote, reporting a range as long
//!    as the whole quote.
//!
//! Tier 3 is deliberately approximate: the tail of the reported range may cover
//! text the critic never quoted. The highlight splicer tolerates that.

use std::ops::Range;

use crate::types::TextRange;

/// Number of leading words tried by the prefix fallback.
const FALLBACK_WORDS: usize = 5;

/// Locates `needle` inside `haystack`.
///
/// Returns `None` when no tier matches, or when `needle` is empty or
/// whitespace-only. Returned ranges are non-empty, lie within `haystack`, and
/// start and end on character boundaries.
pub fn locate(haystack: &str, needle: &str) -> Option<TextRange> {
    if needle.trim().is_empty() {
        return None;
    }

    if let Some(start) = haystack.find(needle) {
        return Some(TextRange::new(start, start + needle.len()));
    }

    locate_normalized(haystack, needle).or_else(|| locate_by_prefix(haystack, needle))
}

/// One character of a whitespace-collapsed string and the bytes it came from.
#[derive(Debug, Clone)]
struct CharSpan {
    /// Byte offset of this character in the collapsed string.
    normalized: usize,
    /// Byte range in the original string. A collapsed whitespace run maps to
    /// the whole run.
    original: Range<usize>,
}

/// Collapses every whitespace run in `s` to one ASCII space.
///
/// Returns the collapsed string plus one `CharSpan` per collapsed character,
/// sorted by `normalized` offset.
fn collapse_whitespace(s: &str) -> (String, Vec<CharSpan>) {
    let mut out = String::with_capacity(s.len());
    let mut spans = Vec::with_capacity(s.len());
    let mut chars = s.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let mut end = i + c.len_utf8();
        if c.is_whitespace() {
            while let Some(&(j, d)) = chars.peek() {
                if !d.is_whitespace() {
                    break;
                }
                end = j + d.len_utf8();
                chars.next();
            }
            spans.push(CharSpan { normalized: out.len(), original: i..end });
            out.push(' ');
        } else {
            spans.push(CharSpan { normalized: out.len(), original: i..end });
            out.push(c);
        }
    }

    (out, spans)
}

/// Tier 2: whitespace-insensitive search, remapped to original offsets.
fn locate_normalized(haystack: &str, needle: &str) -> Option<TextRange> {
    let (norm_haystack, spans) = collapse_whitespace(haystack);
    let (norm_needle, _) = collapse_whitespace(needle);

    let norm_start = norm_haystack.find(&norm_needle)?;
    let norm_end = norm_start + norm_needle.len();

    let first = spans.binary_search_by_key(&norm_start, |s| s.normalized).ok()?;
    // Last collapsed character that starts before the end of the hit.
    let last = spans.partition_point(|s| s.normalized < norm_end).checked_sub(1)?;

    let range = TextRange::new(spans[first].original.start, spans[last].original.end);
    (!range.is_empty()).then_some(range)
}

/// Tier 3: match the first few words, report the full quote's length.
fn locate_by_prefix(haystack: &str, needle: &str) -> Option<TextRange> {
    let prefix = needle
        .split_whitespace()
        .take(FALLBACK_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    if prefix.is_empty() {
        return None;
    }

    let start = haystack.find(&prefix)?;
    let end = ceil_char_boundary(haystack, start + needle.len());
    Some(TextRange::new(start, end))
}

/// Smallest character boundary `>= index`, capped at `s.len()`.
pub(crate) fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
