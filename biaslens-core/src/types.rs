use std::fmt;

use serde::Deserialize;

/// The category a critic assigns to a flagged excerpt.
///
/// Read in the kebab-case spelling the critic prompt asks for
/// (`"missing-perspective"`, `"information-asymmetry"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    Assumption,
    Bias,
    MissingPerspective,
    PowerDynamic,
    Language,
    InformationAsymmetry,
}

impl IssueType {
    /// All six categories in display order.
    pub const ALL: [IssueType; 6] = [
        IssueType::Assumption,
        IssueType::Bias,
        IssueType::MissingPerspective,
        IssueType::PowerDynamic,
        IssueType::Language,
        IssueType::InformationAsymmetry,
    ];

    /// Wire spelling, e.g. `"power-dynamic"`.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::Assumption => "assumption",
            IssueType::Bias => "bias",
            IssueType::MissingPerspective => "missing-perspective",
            IssueType::PowerDynamic => "power-dynamic",
            IssueType::Language => "language",
            IssueType::InformationAsymmetry => "information-asymmetry",
        }
    }

    /// Singular label shown on the analysis panel badge.
    pub fn label(self) -> &'static str {
        match self {
            IssueType::Assumption => "Assumption",
            IssueType::Bias => "Bias",
            IssueType::MissingPerspective => "Missing Perspective",
            IssueType::PowerDynamic => "Power Dynamic",
            IssueType::Language => "Language",
            IssueType::InformationAsymmetry => "Information Asymmetry",
        }
    }

    /// Plural label used by the issue breakdown chart.
    pub fn breakdown_label(self) -> &'static str {
        match self {
            IssueType::Assumption => "Assumptions",
            IssueType::Bias => "Biases",
            IssueType::MissingPerspective => "Missing Perspectives",
            IssueType::PowerDynamic => "Power Dynamics",
            IssueType::Language => "Language Issues",
            IssueType::InformationAsymmetry => "Information Gaps",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Impact level of a flagged excerpt. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Display order used by the severity distribution chart (highest first).
    pub const DISTRIBUTION_ORDER: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A half-open byte range `[start, end)` into an answer text.
///
/// Both ends always sit on UTF-8 character boundaries and `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && self.end > start
    }
}

/// One critic-flagged excerpt of an answer.
///
/// `range` is `None` when the quoted `text` could not be found in the answer;
/// such segments still count toward aggregate metrics but are never highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CritiqueSegment {
    pub id: String,           // "segment-{index}", positional
    pub text: String,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub short_label: String,
    pub detailed_analysis: String,
    pub range: Option<TextRange>,
}

impl CritiqueSegment {
    /// Start offset, or `-1` when the segment was not located.
    pub fn start_index(&self) -> i64 {
        self.range.map_or(-1, |r| r.start as i64)
    }

    /// End offset, or `-1` when the segment was not located.
    pub fn end_index(&self) -> i64 {
        self.range.map_or(-1, |r| r.end as i64)
    }

    pub fn is_located(&self) -> bool {
        self.range.is_some()
    }
}

/// The structured result of the critique call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Critique {
    pub segments: Vec<CritiqueSegment>,
    pub overall_summary: String,
    pub positive_aspects: String,
}
