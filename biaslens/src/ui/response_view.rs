//! Response panel renderer for biaslens.
//!
//! Shows the selected turn: the question, then the answer with critic
//! highlights spliced in and the analysis panel of the selected highlight
//! placed directly beneath the line that holds it. While the pipeline runs the
//! panel shows loading indicators; a failed turn shows an error banner under
//! whatever answer arrived.
//!
//! Lines are wrapped by [`wrap_spans`] so the row of the highlight under the
//! cursor is known and can be scrolled into view.

use biaslens_core::critique::format_critique_as_text;
use biaslens_core::inline::Run;
use biaslens_core::panel::{render_with_panel, RenderItem};
use biaslens_core::resolve::{ResolvedSegment, ResolvedSegmentList};
use biaslens_core::splice::{Block, BlockKind, Highlight, Node};
use biaslens_core::turn::{Turn, TurnStatus};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, CritiqueView, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block, SPINNER};
use crate::ui::wrap::wrap_spans;

/// Wrapped lines of the response panel.
pub struct ResponseContent {
    pub lines: Vec<Line<'static>>,
    /// First row holding a fragment of the highlight under the cursor.
    pub cursor_row: Option<usize>,
}

/// Renders the response panel for the selected turn.
///
/// Caches the line count for `G`, clamps the scroll offset, and scrolls the
/// highlight cursor into view after `[` / `]` / Enter.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: the `Rect` for the centre panel (includes borders)
/// * `focus`: current panel focus (determines border style)
/// * `state`: mutable app state (scroll offset and line count are written back)
/// * `theme`: active color theme
pub fn render_response(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let inner = inner_rect(area);
    let cursor = state.cursor_segment_id();
    let content = build_response(
        state.active_turn(),
        cursor.as_deref(),
        state.critique_view,
        inner.width as usize,
        state.spinner_frame,
        theme,
    );

    let line_count = u16::try_from(content.lines.len()).unwrap_or(u16::MAX);
    state.response_line_count = line_count;

    if state.follow_cursor {
        if let Some(row) = content.cursor_row.and_then(|r| u16::try_from(r).ok()) {
            let visible = state.response_scroll..state.response_scroll.saturating_add(inner.height);
            if !visible.contains(&row) {
                state.response_scroll = row.saturating_sub(inner.height / 3);
            }
        }
        state.follow_cursor = false;
    }
    state.response_scroll = state
        .response_scroll
        .min(line_count.saturating_sub(inner.height));

    let highlights = state.active_segments().len();
    let title = if state.critique_view == CritiqueView::Text {
        "Response (critique as text)".to_owned()
    } else if highlights > 0 {
        format!("Response ({highlights} highlighted)")
    } else {
        "Response".to_owned()
    };
    let block = panel_block(&title, focus == PanelFocus::Response, theme);

    frame.render_widget(
        Paragraph::new(content.lines)
            .block(block)
            .scroll((state.response_scroll, 0)),
        area,
    );
}

/// Builds the wrapped lines for `turn`, or the welcome text when there is none.
///
/// # Arguments
///
/// * `turn`: the turn to show
/// * `cursor`: segment id under the highlight cursor
/// * `view`: highlights, or the critique as plain text once complete
/// * `width`: inner width of the panel
/// * `spinner_frame`: animation frame for loading indicators
/// * `theme`: active color theme
pub fn build_response(
    turn: Option<&Turn>,
    cursor: Option<&str>,
    view: CritiqueView,
    width: usize,
    spinner_frame: usize,
    theme: &Theme,
) -> ResponseContent {
    let mut out = ResponseContent { lines: Vec::new(), cursor_row: None };
    let Some(turn) = turn else {
        out.lines = welcome_lines(width, theme);
        return out;
    };

    let question_style = Style::default().fg(theme.heading).add_modifier(Modifier::BOLD);
    out.lines.extend(wrap_spans(
        vec![Span::styled(turn.question.clone(), question_style)],
        width,
        vec![Span::styled("Q: ", question_style)],
        vec![Span::raw("   ")],
    ));
    out.lines.push(Line::default());

    let spinner = SPINNER[spinner_frame % SPINNER.len()];
    match &turn.status {
        TurnStatus::Pending | TurnStatus::Answering => {
            out.lines.push(loading_line(spinner, "Getting initial response...", theme));
        }
        TurnStatus::Critiquing { answer } => {
            push_plain_answer(&mut out, answer, width, theme);
            out.lines.push(Line::default());
            out.lines.push(loading_line(spinner, "Analyzing for biases and perspectives...", theme));
        }
        TurnStatus::Complete { answer, critique } if view == CritiqueView::Text => {
            push_plain_answer(&mut out, answer, width, theme);
            out.lines.push(Line::default());
            out.lines.push(Line::styled(
                "─".repeat(width.min(40)),
                Style::default().fg(theme.text_muted),
            ));
            out.lines.push(Line::default());
            push_plain_answer(&mut out, &format_critique_as_text(critique), width, theme);
            out.lines.push(Line::styled(
                "t returns to the highlighted answer",
                Style::default().fg(theme.text_muted),
            ));
        }
        TurnStatus::Complete { .. } => {
            let resolved = turn.resolved_segments();
            for item in turn.render_items() {
                match item {
                    RenderItem::Block(block) => {
                        let lines = block_lines(&block, &resolved, cursor, width, theme);
                        if out.cursor_row.is_none() && contains_cursor(&block, cursor) {
                            out.cursor_row = Some(out.lines.len());
                        }
                        out.lines.extend(lines);
                    }
                    RenderItem::Analysis(segment) => {
                        out.lines.extend(analysis_lines(&segment, width, theme));
                    }
                }
            }
            if !resolved.is_empty() {
                out.lines.push(Line::default());
                out.lines.push(Line::styled(
                    "[ / ] move between highlights · Enter opens the analysis · Esc closes it · t shows it as text",
                    Style::default().fg(theme.text_muted),
                ));
            }
        }
        TurnStatus::Error { message, answer } => {
            if let Some(answer) = answer {
                push_plain_answer(&mut out, answer, width, theme);
                out.lines.push(Line::default());
            }
            let error_style = Style::default().fg(theme.turn_error);
            out.lines.push(Line::styled("Error:", error_style.add_modifier(Modifier::BOLD)));
            out.lines.extend(wrap_spans(
                vec![Span::styled(message.clone(), error_style)],
                width,
                Vec::new(),
                Vec::new(),
            ));
        }
    }

    out
}

/// Renders markdown text without highlights.
fn push_plain_answer(out: &mut ResponseContent, answer: &str, width: usize, theme: &Theme) {
    let none = ResolvedSegmentList::default();
    for item in render_with_panel(answer, &none, None) {
        if let RenderItem::Block(block) = item {
            out.lines.extend(block_lines(&block, &none, None, width, theme));
        }
    }
}

fn contains_cursor(block: &Block, cursor: Option<&str>) -> bool {
    cursor.is_some_and(|id| block.highlights().any(|h| h.segment_id == id))
}

fn loading_line(spinner: &str, message: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{spinner} "), Style::default().fg(theme.turn_loading)),
        Span::styled(message, Style::default().fg(theme.text_muted)),
    ])
}

/// Converts one rendered block into wrapped lines.
fn block_lines(
    block: &Block,
    resolved: &ResolvedSegmentList,
    cursor: Option<&str>,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let text = Style::default().fg(theme.text);
    let (base, first, rest) = match block.kind {
        BlockKind::LineBreak => return vec![Line::default()],
        BlockKind::Heading(level) => {
            let mut style = Style::default().fg(theme.heading).add_modifier(Modifier::BOLD);
            if level == 1 {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            (style, Vec::new(), Vec::new())
        }
        BlockKind::ListItem => (
            text,
            vec![Span::styled("  • ", Style::default().fg(theme.text_muted))],
            vec![Span::raw("    ")],
        ),
        BlockKind::Paragraph => (text, Vec::new(), Vec::new()),
    };

    let mut spans = Vec::new();
    for node in &block.nodes {
        match node {
            Node::Text(runs) => spans.extend(runs.iter().map(|r| run_span(r, base, theme))),
            Node::Highlight(h) => {
                let style = highlight_style(h, base, cursor == Some(h.segment_id.as_str()), theme);
                spans.extend(h.runs.iter().map(|r| run_span(r, style, theme)));
                spans.push(badge(h, resolved, theme));
            }
        }
    }

    wrap_spans(spans, width, first, rest)
}

/// Styles one inline run on top of `base`.
///
/// Inside a highlight the background carries the meaning, so code and link
/// colors are only applied to unhighlighted text.
fn run_span(run: &Run, base: Style, theme: &Theme) -> Span<'static> {
    let highlighted = base.bg.is_some();
    let style = match run {
        Run::Plain(_) => base,
        Run::Bold(_) => base.add_modifier(Modifier::BOLD),
        Run::Italic(_) => base.add_modifier(Modifier::ITALIC),
        Run::Code(_) if highlighted => base,
        Run::Code(_) => base.fg(theme.code),
        Run::Link { .. } if highlighted => base.add_modifier(Modifier::UNDERLINED),
        Run::Link { .. } => base.fg(theme.link).add_modifier(Modifier::UNDERLINED),
    };
    Span::styled(run.text().to_owned(), style)
}

fn highlight_style(h: &Highlight, base: Style, under_cursor: bool, theme: &Theme) -> Style {
    let mut style = base.bg(theme.severity(h.severity)).fg(theme.highlight_fg);
    if h.selected {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    if under_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

/// Ordinal badge drawn after every fragment of a highlight.
fn badge(h: &Highlight, resolved: &ResolvedSegmentList, theme: &Theme) -> Span<'static> {
    let color = resolved
        .get(&h.segment_id)
        .map_or(theme.text_muted, |s| theme.severity(s.segment.severity));
    Span::styled(
        format!("[{}]", h.ordinal),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// The inline analysis panel for the selected highlight.
fn analysis_lines(segment: &ResolvedSegment, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let seg = &segment.segment;
    let border = Style::default().fg(theme.border_active);
    let muted = Style::default().fg(theme.text_muted);
    let bar = || vec![Span::styled("│ ", border)];
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("╭─ Analysis ", border.add_modifier(Modifier::BOLD)),
        Span::styled("(Esc to close)", muted),
    ]));
    lines.push(Line::from(vec![
        Span::styled("│ ", border),
        Span::styled(
            seg.issue_type.label(),
            Style::default().fg(theme.issue(seg.issue_type)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" · ", muted),
        Span::styled(
            format!("{} severity", seg.severity.label()),
            Style::default().fg(theme.severity(seg.severity)).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.extend(wrap_spans(
        vec![Span::styled(seg.short_label.clone(), Style::default().add_modifier(Modifier::BOLD))],
        width,
        bar(),
        bar(),
    ));
    lines.push(Line::from(bar()));
    lines.push(Line::from(vec![Span::styled("│ ", border), Span::styled("Quoted text:", muted)]));
    lines.extend(wrap_spans(
        vec![Span::styled(
            format!("\"{}\"", seg.text),
            Style::default().add_modifier(Modifier::ITALIC),
        )],
        width,
        bar(),
        bar(),
    ));
    lines.push(Line::from(bar()));
    lines.push(Line::from(vec![Span::styled("│ ", border), Span::styled("Analysis:", muted)]));
    for paragraph in seg.detailed_analysis.split('\n') {
        lines.extend(wrap_spans(
            vec![Span::styled(paragraph.to_owned(), Style::default().fg(theme.text))],
            width,
            bar(),
            bar(),
        ));
    }
    lines.push(Line::styled("╰─", border));
    lines
}

/// Shown before the first question.
fn welcome_lines(width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let muted = Style::default().fg(theme.text_muted);
    let mut lines = vec![
        Line::styled(
            "Welcome to AI Bias Explorer",
            Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
    ];
    lines.extend(wrap_spans(
        vec![Span::raw(
            "This educational tool helps you understand biases and assumptions in AI \
             responses. Ask any question, and you'll see both a typical AI answer and a \
             critical analysis examining biases, missing perspectives, and power dynamics.",
        )],
        width,
        Vec::new(),
        Vec::new(),
    ));
    lines.push(Line::default());
    lines.push(Line::styled("Example questions to try:", Style::default().add_modifier(Modifier::BOLD)));
    for example in [
        "Should we increase the minimum wage?",
        "What's the best immigration policy?",
        "How should we regulate social media?",
    ] {
        lines.push(Line::from(vec![Span::styled("  • ", muted), Span::raw(example)]));
    }
    lines.push(Line::default());
    lines.push(Line::styled("Press i to ask a question, ? for help.", muted));
    lines
}
