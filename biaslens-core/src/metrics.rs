//! Aggregate metrics for the critique summary.
//!
//! Tallies run over the full segment list, including segments that could not
//! be located in the answer: category and severity do not depend on position.

use crate::types::{CritiqueSegment, IssueType, Severity};

/// Per-category and per-severity counts for one critique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueBreakdown {
    /// Counts in [`IssueType::ALL`] order.
    pub by_issue: [(IssueType, usize); 6],
    /// Counts in [`Severity::DISTRIBUTION_ORDER`] order (high first).
    pub by_severity: [(Severity, usize); 3],
    /// Number of segments tallied.
    pub total: usize,
    /// Number of tallied segments that have a position in the answer.
    pub located: usize,
}

impl IssueBreakdown {
    pub fn from_segments(segments: &[CritiqueSegment]) -> Self {
        let mut by_issue = IssueType::ALL.map(|t| (t, 0));
        let mut by_severity = Severity::DISTRIBUTION_ORDER.map(|s| (s, 0));

        for seg in segments {
            if let Some(entry) = by_issue.iter_mut().find(|(t, _)| *t == seg.issue_type) {
                entry.1 += 1;
            }
            if let Some(entry) = by_severity.iter_mut().find(|(s, _)| *s == seg.severity) {
                entry.1 += 1;
            }
        }

        Self {
            by_issue,
            by_severity,
            total: segments.len(),
            located: segments.iter().filter(|s| s.is_located()).count(),
        }
    }

    pub fn issue_count(&self, issue: IssueType) -> usize {
        self.by_issue.iter().find(|(t, _)| *t == issue).map_or(0, |(_, n)| *n)
    }

    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity.iter().find(|(s, _)| *s == severity).map_or(0, |(_, n)| *n)
    }

    /// Categories with at least one segment, in display order.
    pub fn present_issues(&self) -> impl Iterator<Item = (IssueType, usize)> + '_ {
        self.by_issue.iter().copied().filter(|(_, n)| *n > 0)
    }

    /// Bar width for `count` as a percentage of the total.
    pub fn percentage(&self, count: usize) -> f64 {
        percentage(count, self.total)
    }
}

/// `count / total * 100`, or `0.0` when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
