//! Segment resolver: turns critic segments into the ordered highlight list.
//!
//! The resolved list only holds segments with a known position, sorted by start
//! offset (stable on ties, so the critic's own order breaks them). A segment's
//! on-screen ordinal is its 1-based index in this list and is recomputed every
//! time the list is built.

use crate::locate::locate;
use crate::types::{CritiqueSegment, IssueType, Severity, TextRange};

/// A critic segment before it has been positioned in the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    pub text: String,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub short_label: String,
    pub detailed_analysis: String,
}

/// Positions one raw segment, assigning the id `segment-{index}`.
///
/// `index` is the segment's position in the critic's array, so ids stay stable
/// even when neighbouring entries are discarded.
pub fn locate_segment(answer: &str, index: usize, raw: RawSegment) -> CritiqueSegment {
    let range = locate(answer, &raw.text);
    CritiqueSegment {
        id: format!("segment-{index}"),
        text: raw.text,
        issue_type: raw.issue_type,
        severity: raw.severity,
        short_label: raw.short_label,
        detailed_analysis: raw.detailed_analysis,
        range,
    }
}

/// A segment known to sit at `range` within the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSegment {
    pub segment: CritiqueSegment,
    pub range: TextRange,
}

impl ResolvedSegment {
    pub fn id(&self) -> &str {
        &self.segment.id
    }
}

/// Located segments sorted ascending by start offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSegmentList {
    segments: Vec<ResolvedSegment>,
}

impl ResolvedSegmentList {
    /// Builds the display list from already-located segments.
    ///
    /// Unlocated segments are dropped; the caller keeps the full slice for
    /// metrics that do not need positions.
    pub fn from_segments(segments: &[CritiqueSegment]) -> Self {
        let mut resolved: Vec<ResolvedSegment> = segments
            .iter()
            .filter_map(|s| {
                s.range.map(|range| ResolvedSegment { segment: s.clone(), range })
            })
            .collect();
        // `sort_by_key` is stable: ties keep the critic's order.
        resolved.sort_by_key(|s| s.range.start);
        Self { segments: resolved }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at 0-based position `index`.
    pub fn at(&self, index: usize) -> Option<&ResolvedSegment> {
        self.segments.get(index)
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedSegment> {
        self.segments.iter().find(|s| s.id() == id)
    }

    /// 0-based position of the segment with `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.segments.iter().position(|s| s.id() == id)
    }

    /// 1-based display ordinal of the segment with `id`.
    pub fn ordinal(&self, id: &str) -> Option<usize> {
        self.position(id).map(|i| i + 1)
    }
}

impl<'a> IntoIterator for &'a ResolvedSegmentList {
    type Item = &'a ResolvedSegment;
    type IntoIter = std::slice::Iter<'a, ResolvedSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Locates every raw segment in `answer` and returns the display list.
pub fn resolve(answer: &str, raw: &[RawSegment]) -> ResolvedSegmentList {
    let located: Vec<CritiqueSegment> = raw
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, r)| locate_segment(answer, i, r))
        .collect();
    ResolvedSegmentList::from_segments(&located)
}
