//! Turn list panel renderer for biaslens.
//!
//! Renders the left panel from the conversation. Each entry shows a status
//! badge, the question, the issue count once the critique is in, and the local
//! time the question was asked. When the conversation is empty, shows a
//! placeholder.

use std::fmt::Display;

use biaslens_core::turn::{Turn, TurnStatus};
use chrono::{DateTime, Local, TimeZone};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{panel_block, SPINNER};

/// Renders the turn list from `AppState.conversation`.
///
/// Uses `render_stateful_widget` so the ListState selection highlight is applied.
/// The turn count is shown in the panel title (e.g., "Turns (3)").
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: the `Rect` for the left panel (includes borders)
/// * `focus`: current panel focus (determines border style)
/// * `state`: mutable app state providing the conversation and `turn_list_state`
/// * `theme`: active color theme
pub fn render_turn_list(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Turns;
    let count = state.conversation.len();
    let title = if count > 0 {
        format!("Turns ({count})")
    } else {
        "Turns".to_owned()
    };
    let block = panel_block(&title, is_focused, theme);

    let items: Vec<ListItem> = if state.conversation.is_empty() {
        vec![ListItem::new(Line::styled(
            "No questions yet",
            Style::default().fg(theme.text_muted),
        ))]
    } else {
        let spinner = SPINNER[state.spinner_frame % SPINNER.len()];
        state
            .conversation
            .turns()
            .iter()
            .map(|t| turn_item(t, spinner, theme))
            .collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut state.turn_list_state);
}

/// Converts a turn into a styled ListItem.
///
/// Format: `● Should we…  (4)  14:05` for a complete turn with four issues.
fn turn_item(turn: &Turn, spinner: &'static str, theme: &Theme) -> ListItem<'static> {
    ListItem::new(Line::from(turn_spans(turn, spinner, theme)))
}

fn turn_spans(turn: &Turn, spinner: &'static str, theme: &Theme) -> Vec<Span<'static>> {
    let (badge, color) = match &turn.status {
        TurnStatus::Pending | TurnStatus::Answering | TurnStatus::Critiquing { .. } => {
            (spinner, theme.turn_loading)
        }
        TurnStatus::Complete { .. } => ("●", theme.turn_complete),
        TurnStatus::Error { .. } => ("✗", theme.turn_error),
    };

    let mut spans = vec![
        Span::styled(format!("{badge} "), Style::default().fg(color)),
        Span::raw(truncate(&turn.question, 40)),
    ];
    if let Some(critique) = turn.critique() {
        spans.push(Span::styled(
            format!("  ({})", critique.segments.len()),
            Style::default().fg(theme.text_muted),
        ));
    }
    if let Some(time) = clock_time(turn.timestamp, &Local) {
        spans.push(Span::styled(format!("  {time}"), Style::default().fg(theme.text_muted)));
    }
    spans
}

/// `HH:MM` of a unix-second timestamp in `tz`. `None` when out of range.
fn clock_time<Tz>(timestamp: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc = DateTime::from_timestamp(timestamp, 0)?;
    Some(utc.with_timezone(tz).format("%H:%M").to_string())
}

/// Shortens `text` to at most `max` characters, ending in `…` when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_is_hours_and_minutes() {
        // 2023-11-14 22:13:20 UTC
        assert_eq!(clock_time(1_700_000_000, &chrono::Utc).as_deref(), Some("22:13"));
        let east = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(clock_time(1_700_000_000, &east).as_deref(), Some("00:13"));
        assert_eq!(clock_time(i64::MAX, &chrono::Utc), None);
    }

    #[test]
    fn turn_entry_ends_with_the_time_asked() {
        let theme = Theme::dark();
        let mut turn = Turn::new("Is the sky blue?");
        turn.timestamp = 1_700_000_000;
        let expected = clock_time(turn.timestamp, &Local).unwrap();

        let spans = turn_spans(&turn, SPINNER[0], &theme);
        let last = spans.last().unwrap();
        assert_eq!(spans[1].content, "Is the sky blue?");
        assert_eq!(last.content, format!("  {expected}"));
        assert_eq!(last.style.fg, Some(theme.text_muted));
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }
}
