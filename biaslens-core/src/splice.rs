//! Highlight splicer: renders an answer into blocks with highlight runs spliced in.
//!
//! Work is line-oriented. Each `\n`-separated line becomes one [`Block`],
//! classified by its markdown prefix. Segments overlapping the line are
//! clipped to it, shifted into the block's displayed text (the line without
//! surrounding whitespace and without its markdown prefix), and emitted as
//! [`Highlight`] nodes between tokenized plain stretches. Tokenizing each
//! stretch separately keeps a highlight boundary from ever splitting a
//! markdown token across two nodes.
//!
//! A segment spanning several lines is highlighted once per line it touches,
//! and every fragment carries the segment's ordinal badge.

use std::ops::Range;

use crate::inline::{plain_text, tokenize, Run};
use crate::locate::ceil_char_boundary;
use crate::resolve::ResolvedSegmentList;
use crate::types::Severity;

/// Markdown block type of one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `#`, `##` or `###` heading; the level is 1 to 3.
    Heading(u8),
    /// `- ` or `* ` bullet.
    ListItem,
    /// Blank line.
    LineBreak,
    Paragraph,
}

/// A highlighted stretch of displayed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    /// Id of the segment this fragment belongs to; reported on activation.
    pub segment_id: String,
    pub severity: Severity,
    pub selected: bool,
    /// 1-based position of the segment in the whole resolved list.
    pub ordinal: usize,
    pub runs: Vec<Run>,
}

/// One piece of a block's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(Vec<Run>),
    Highlight(Highlight),
}

/// A rendered source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub nodes: Vec<Node>,
    /// Byte range of the source line in the answer, newline excluded.
    pub source: Range<usize>,
}

impl Block {
    /// Half-open overlap test between this block's source line and `[start, end)`.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.source.end && end > self.source.start
    }

    pub fn highlights(&self) -> impl Iterator<Item = &Highlight> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Highlight(h) => Some(h),
            Node::Text(_) => None,
        })
    }
}

/// Renders `answer` into one block per line.
///
/// `resolved` supplies the highlight positions and ordinals; the fragment
/// whose segment id equals `selected_id` is flagged as selected. Output is a
/// pure function of the arguments.
pub fn render(answer: &str, resolved: &ResolvedSegmentList, selected_id: Option<&str>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut line_start = 0;

    for line in answer.split('\n') {
        blocks.push(render_line(line, line_start, resolved, selected_id));
        line_start += line.len() + 1;
    }

    blocks
}

/// Classifies a trimmed line. Returns the kind and the prefix length to strip.
pub fn classify(trimmed: &str) -> (BlockKind, usize) {
    if trimmed.is_empty() {
        (BlockKind::LineBreak, 0)
    } else if trimmed.starts_with("# ") {
        (BlockKind::Heading(1), 2)
    } else if trimmed.starts_with("## ") {
        (BlockKind::Heading(2), 3)
    } else if trimmed.starts_with("### ") {
        (BlockKind::Heading(3), 4)
    } else if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
        (BlockKind::ListItem, 2)
    } else {
        (BlockKind::Paragraph, 0)
    }
}

fn render_line(
    line: &str,
    line_start: usize,
    resolved: &ResolvedSegmentList,
    selected_id: Option<&str>,
) -> Block {
    let source = line_start..line_start + line.len();
    let trimmed = line.trim();
    let (kind, prefix_len) = classify(trimmed);

    if kind == BlockKind::LineBreak {
        return Block { kind, nodes: Vec::new(), source };
    }

    let leading = line.len() - line.trim_start().len();
    let display = &trimmed[prefix_len..];
    let nodes = splice_line(display, leading + prefix_len, &source, resolved, selected_id);

    Block { kind, nodes, source }
}

/// Interleaves tokenized plain text and highlights for one line.
///
/// `display_offset` is where `display` starts inside the raw line.
fn splice_line(
    display: &str,
    display_offset: usize,
    line: &Range<usize>,
    resolved: &ResolvedSegmentList,
    selected_id: Option<&str>,
) -> Vec<Node> {
    let line_len = line.end - line.start;
    let mut nodes = Vec::new();
    let mut cursor = 0;

    for (index, seg) in resolved.iter().enumerate() {
        if !seg.range.overlaps(line.start, line.end) {
            continue;
        }

        // Clamp to the line, then shift into the displayed text.
        let start_in_line = seg.range.start.saturating_sub(line.start);
        let end_in_line = (seg.range.end - line.start).min(line_len);
        let start = start_in_line.saturating_sub(display_offset);
        let end = end_in_line.saturating_sub(display_offset).min(display.len());
        if start >= display.len() || end == 0 {
            continue;
        }

        // Overlapping segments: the earlier one keeps the shared text.
        let start = ceil_char_boundary(display, start.max(cursor));
        let end = ceil_char_boundary(display, end);
        if start >= end {
            continue;
        }
        // Only markdown delimiters: leave them to the surrounding text.
        let runs = tokenize(&display[start..end]);
        if plain_text(&runs).is_empty() {
            continue;
        }

        if start > cursor {
            nodes.push(Node::Text(tokenize(&display[cursor..start])));
        }
        nodes.push(Node::Highlight(Highlight {
            segment_id: seg.id().to_owned(),
            severity: seg.segment.severity,
            selected: selected_id == Some(seg.id()),
            ordinal: index + 1,
            runs,
        }));
        cursor = end;
    }

    if cursor < display.len() {
        nodes.push(Node::Text(tokenize(&display[cursor..])));
    }

    nodes
}
