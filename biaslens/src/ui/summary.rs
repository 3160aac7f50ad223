//! Summary panel renderer for biaslens.
//!
//! Shows the critique of the selected turn at a glance: how many issues were
//! found, a bar per issue category, the severity distribution, and the
//! critic's overall patterns and positive aspects.

use biaslens_core::metrics::IssueBreakdown;
use biaslens_core::turn::{Turn, TurnStatus};
use biaslens_core::Severity;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};
use crate::ui::wrap::wrap_spans;

/// Renders the summary panel for the selected turn.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: the `Rect` for the right panel (includes borders)
/// * `focus`: current panel focus (determines border style)
/// * `state`: mutable app state (scroll offset and line count are written back)
/// * `theme`: active color theme
pub fn render_summary(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let inner = inner_rect(area);
    let lines = build_summary(state.active_turn(), inner.width as usize, theme);

    let line_count = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    state.summary_line_count = line_count;
    state.summary_scroll = state.summary_scroll.min(line_count.saturating_sub(inner.height));

    let block = panel_block("Summary", focus == PanelFocus::Summary, theme);
    frame.render_widget(
        Paragraph::new(lines).block(block).scroll((state.summary_scroll, 0)),
        area,
    );
}

/// Builds the summary lines for `turn`.
pub fn build_summary(turn: Option<&Turn>, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let muted = Style::default().fg(theme.text_muted);
    let Some(turn) = turn else {
        return vec![Line::styled("Ask a question to see its critique.", muted)];
    };
    let (TurnStatus::Complete { critique, .. }, Some(breakdown)) = (&turn.status, turn.breakdown())
    else {
        let note = match turn.status {
            TurnStatus::Error { .. } => "No critique: the turn failed.",
            _ => "Waiting for the critique…",
        };
        return vec![Line::styled(note, muted)];
    };

    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::styled(issue_count_label(breakdown.total), heading)];
    if breakdown.located < breakdown.total {
        lines.push(Line::styled(
            format!("{} highlighted in the answer", breakdown.located),
            muted,
        ));
    }

    if breakdown.total > 0 {
        lines.push(Line::default());
        lines.push(Line::styled("Issue Breakdown", heading));
        for (issue, count) in breakdown.present_issues() {
            lines.push(Line::from(vec![
                Span::raw(issue.breakdown_label()),
                Span::styled(format!("  {count}"), muted),
            ]));
            lines.push(bar_line(&breakdown, count, width, theme.issue(issue), theme));
        }

        lines.push(Line::default());
        lines.push(Line::styled("Severity", heading));
        for (severity, count) in breakdown.by_severity {
            lines.push(severity_line(&breakdown, severity, count, width, theme));
        }
    }

    for (title, body, color) in [
        ("Overall Patterns", &critique.overall_summary, theme.text),
        ("Positive Aspects", &critique.positive_aspects, theme.positive),
    ] {
        if body.is_empty() {
            continue;
        }
        lines.push(Line::default());
        lines.push(Line::styled(title, heading.fg(color)));
        for paragraph in body.split('\n') {
            lines.extend(wrap_spans(
                vec![Span::styled(paragraph.to_owned(), Style::default().fg(color))],
                width,
                Vec::new(),
                Vec::new(),
            ));
        }
    }

    lines
}

/// `"1 issue identified"` / `"N issues identified"`.
pub fn issue_count_label(total: usize) -> String {
    if total == 1 {
        "1 issue identified".to_owned()
    } else {
        format!("{total} issues identified")
    }
}

/// Number of filled cells for `pct` percent of a `width`-cell bar.
pub fn bar_cells(pct: f64, width: usize) -> usize {
    ((pct / 100.0) * width as f64).round().clamp(0.0, width as f64) as usize
}

fn bar_line(
    breakdown: &IssueBreakdown,
    count: usize,
    width: usize,
    color: Color,
    theme: &Theme,
) -> Line<'static> {
    let filled = bar_cells(breakdown.percentage(count), width);
    Line::from(vec![
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled("░".repeat(width - filled), Style::default().fg(theme.text_muted)),
    ])
}

/// `High   ████░░░░ 2`
fn severity_line(
    breakdown: &IssueBreakdown,
    severity: Severity,
    count: usize,
    width: usize,
    theme: &Theme,
) -> Line<'static> {
    const LABEL: usize = 7;
    const COUNT: usize = 4;
    let bar_width = width.saturating_sub(LABEL + COUNT);
    let filled = bar_cells(breakdown.percentage(count), bar_width);
    Line::from(vec![
        Span::raw(format!("{:<width$}", severity.label(), width = LABEL)),
        Span::styled("█".repeat(filled), Style::default().fg(theme.severity(severity))),
        Span::styled("░".repeat(bar_width - filled), Style::default().fg(theme.text_muted)),
        Span::styled(format!("{:>width$}", count, width = COUNT), Style::default().fg(theme.text_muted)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use biaslens_core::turn::TurnUpdate;
    use biaslens_core::{Critique, CritiqueSegment, IssueType};

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn segment(issue_type: IssueType, severity: Severity) -> CritiqueSegment {
        CritiqueSegment {
            id: "segment-0".to_owned(),
            text: String::new(),
            issue_type,
            severity,
            short_label: String::new(),
            detailed_analysis: String::new(),
            range: None,
        }
    }

    #[test]
    fn bar_cells_round_and_clamp() {
        assert_eq!(bar_cells(50.0, 10), 5);
        assert_eq!(bar_cells(66.7, 10), 7);
        assert_eq!(bar_cells(0.0, 10), 0);
        assert_eq!(bar_cells(150.0, 10), 10);
    }

    #[test]
    fn issue_count_is_pluralised() {
        assert_eq!(issue_count_label(1), "1 issue identified");
        assert_eq!(issue_count_label(0), "0 issues identified");
    }

    #[test]
    fn summary_lists_categories_and_texts() {
        let mut turn = Turn::new("q");
        turn.apply(TurnUpdate::Answering).unwrap();
        turn.apply(TurnUpdate::Answered("a".to_owned())).unwrap();
        turn.apply(TurnUpdate::Critiqued(Critique {
            segments: vec![
                segment(IssueType::Bias, Severity::High),
                segment(IssueType::Bias, Severity::Low),
            ],
            overall_summary: "Leans one way.".to_owned(),
            positive_aspects: String::new(),
        }))
        .unwrap();

        let rows = text(&build_summary(Some(&turn), 20, &Theme::dark()));
        assert_eq!(rows[0], "2 issues identified");
        assert_eq!(rows[1], "0 highlighted in the answer");
        assert!(rows.iter().any(|r| r == "Biases  2"));
        assert!(rows.iter().any(|r| r == "Overall Patterns"));
        assert!(!rows.iter().any(|r| r == "Positive Aspects"));
        assert!(rows.iter().any(|r| r.starts_with("High   ") && r.ends_with("   1")));
    }

    #[test]
    fn pending_turn_has_no_summary_yet() {
        let turn = Turn::new("q");
        let rows = text(&build_summary(Some(&turn), 20, &Theme::dark()));
        assert_eq!(rows, vec!["Waiting for the critique…"]);
    }
}
