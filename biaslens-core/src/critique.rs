//! Critique payload handling.
//!
//! The critic is asked for bare JSON but frequently wraps it in a fenced code
//! block. [`parse_critique`] unwraps the payload, validates the shape, and
//! positions every segment in the answer. A payload that cannot be parsed is
//! replaced by [`Critique::parse_failure`]: a malformed critique must never
//! hide an answer that was already obtained.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CritiqueParseError;
use crate::resolve::{locate_segment, RawSegment};
use crate::types::{Critique, IssueType, Severity};

/// Summary shown when the critique payload could not be parsed.
pub const PARSE_FAILURE_SUMMARY: &str = "Failed to parse critique response";

impl Critique {
    /// The empty critique substituted for an unparseable payload.
    pub fn parse_failure() -> Self {
        Self {
            segments: Vec::new(),
            overall_summary: PARSE_FAILURE_SUMMARY.to_owned(),
            positive_aspects: String::new(),
        }
    }
}

/// Wire shape of one entry in the critic's `segments` array.
///
/// An unknown issue type or severity fails deserialization, which skips the
/// entry like any other malformed segment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSegment {
    text: String,
    issue_type: IssueType,
    severity: Severity,
    #[serde(default)]
    short_label: String,
    #[serde(default)]
    detailed_analysis: String,
}

/// Extracts the JSON document from a critic payload.
///
/// A fenced ```` ```json ```` block anywhere in the payload wins. Otherwise a
/// trimmed payload that both starts and ends with triple backticks has them
/// stripped. Otherwise the trimmed payload is returned as is.
pub fn unwrap_payload(payload: &str) -> &str {
    let trimmed = payload.trim();
    if let Some(inner) = fenced_json(trimmed) {
        return inner;
    }
    if trimmed.starts_with("```") && trimmed.ends_with("```") {
        if let Some(inner) = trimmed.strip_prefix("```").and_then(|s| s.strip_suffix("```")) {
            return inner.trim();
        }
    }
    trimmed
}

/// Finds the body of the first ```` ```json ```` fence that has a header
/// newline and a closing fence on its own line.
fn fenced_json(text: &str) -> Option<&str> {
    const OPEN: &str = "```json";
    let mut search_from = 0;

    while let Some(found) = text[search_from..].find(OPEN) {
        let after = search_from + found + OPEN.len();
        let rest = &text[after..];
        let leading_ws = &rest[..rest.len() - rest.trim_start().len()];

        if let Some(newline) = leading_ws.rfind('\n') {
            let body_start = after + newline + 1;
            if let Some(end) = text[body_start..].find("\n```") {
                return Some(&text[body_start..body_start + end]);
            }
        }
        search_from = after;
    }
    None
}

/// Parses a critic payload and positions its segments within `answer`.
///
/// Never fails: any parse or structural error is logged and replaced by
/// [`Critique::parse_failure`].
pub fn parse_critique(payload: &str, answer: &str) -> Critique {
    match try_parse_critique(payload, answer) {
        Ok(critique) => {
            debug!(
                segments = critique.segments.len(),
                located = critique.segments.iter().filter(|s| s.is_located()).count(),
                "parsed critique"
            );
            critique
        }
        Err(err) => {
            warn!(error = %err, "failed to parse structured critique");
            Critique::parse_failure()
        }
    }
}

/// Strict variant of [`parse_critique`] that reports why parsing failed.
pub fn try_parse_critique(payload: &str, answer: &str) -> Result<Critique, CritiqueParseError> {
    let value: Value = serde_json::from_str(unwrap_payload(payload))?;
    let entries = value
        .get("segments")
        .and_then(Value::as_array)
        .ok_or(CritiqueParseError::MissingSegments)?;

    let segments = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let raw = raw_segment(index, entry)?;
            Some(locate_segment(answer, index, raw))
        })
        .collect();

    let text_field = |key: &str| {
        value.get(key).and_then(Value::as_str).unwrap_or_default().to_owned()
    };

    Ok(Critique {
        segments,
        overall_summary: text_field("overallSummary"),
        positive_aspects: text_field("positiveAspects"),
    })
}

/// Validates one `segments` entry. Invalid entries are skipped with a warning.
fn raw_segment(index: usize, entry: &Value) -> Option<RawSegment> {
    let wire: WireSegment = match serde_json::from_value(entry.clone()) {
        Ok(w) => w,
        Err(err) => {
            warn!(index, error = %err, "skipping malformed critique segment");
            return None;
        }
    };

    Some(RawSegment {
        text: wire.text,
        issue_type: wire.issue_type,
        severity: wire.severity,
        short_label: wire.short_label,
        detailed_analysis: wire.detailed_analysis,
    })
}

/// Renders a critique as markdown-flavoured plain text.
///
/// Backs the plain-text critique view, which shows the whole critique at once
/// instead of one highlight at a time.
pub fn format_critique_as_text(critique: &Critique) -> String {
    let mut text = String::new();

    if !critique.segments.is_empty() {
        text.push_str("## Identified Issues\n\n");
        for (index, segment) in critique.segments.iter().enumerate() {
            text.push_str(&format!(
                "**{}. {}** ({} severity)\n",
                index + 1,
                segment.short_label,
                segment.severity
            ));
            text.push_str(&format!("> \"{}\"\n\n", segment.text));
            text.push_str(&format!("{}\n\n", segment.detailed_analysis));
        }
    }

    if !critique.overall_summary.is_empty() {
        text.push_str("## Overall Summary\n\n");
        text.push_str(&format!("{}\n\n", critique.overall_summary));
    }

    if !critique.positive_aspects.is_empty() {
        text.push_str("## Positive Aspects\n\n");
        text.push_str(&format!("{}\n\n", critique.positive_aspects));
    }

    text
}
