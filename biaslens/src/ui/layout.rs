//! Screen geometry and the shared panel chrome.
//!
//! Rows, top to bottom: the panels, the 3-row question input, the 1-row status
//! bar. How many panels fit depends on the terminal width:
//!
//! | columns  | panels                                             |
//! |----------|----------------------------------------------------|
//! | ≥ 120    | turns, response, summary (`AppState` percentages)  |
//! | 80..120  | response and summary; `{` / `}` still switch turns |
//! | < 80     | response only                                      |
//!
//! A hidden panel gets a zero-width `Rect` and is skipped by the renderer.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Braille spinner frames advanced by `AppState::tick`.
pub const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

const ALL_PANELS_MIN: u16 = 120;
const SUMMARY_MIN: u16 = 80;
const INPUT_ROWS: u16 = 3;

/// Width constraints for `[turns, response, summary]`.
pub fn panel_constraints(columns: u16, state: &AppState) -> [Constraint; 3] {
    if columns >= ALL_PANELS_MIN {
        [
            Constraint::Percentage(state.left_pct),
            Constraint::Percentage(state.center_pct),
            Constraint::Percentage(state.right_pct),
        ]
    } else if columns >= SUMMARY_MIN {
        let summary = state.right_pct + state.left_pct / 2;
        [
            Constraint::Length(0),
            Constraint::Fill(1),
            Constraint::Percentage(summary),
        ]
    } else {
        [Constraint::Length(0), Constraint::Fill(1), Constraint::Length(0)]
    }
}

/// `[turns, response, summary, input, status]` for this frame.
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 5] {
    let screen = frame.area();
    let [panels, input, status] = screen.layout(&Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(INPUT_ROWS),
        Constraint::Length(1),
    ]));

    // Adjacent borders share a column.
    let columns = Layout::horizontal(panel_constraints(screen.width, state))
        .spacing(Spacing::Overlap(1));
    let [turns, response, summary] = panels.layout(&columns);

    [turns, response, summary, input, status]
}

/// The area inside a panel's 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered panel frame: thick and bright when focused, plain and dim otherwise.
///
/// Borders of neighbouring panels are merged, which needs
/// `MergeStrategy::Fuzzy` because the two border types mix.
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &'a Theme) -> Block<'a> {
    let (border_type, color) = if is_focused {
        (BorderType::Thick, theme.border_active)
    } else {
        (BorderType::Plain, theme.border_inactive)
    };
    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(Style::default().fg(color))
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Status bar: mode badge, focused panel, then a status message, the
/// in-flight spinner, or key hints, in that order of priority.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (badge, badge_color) = match state.mode {
        Mode::Setup => (" SETUP ", theme.status_mode_setup),
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay | Mode::ConfirmQuit => (" NORMAL ", theme.status_mode_normal),
    };

    let tail = if let Some(message) = &state.status_message {
        Span::raw(format!("│ {message}"))
    } else if state.conversation.is_processing() {
        let glyph = SPINNER[state.spinner_frame % SPINNER.len()];
        Span::styled(format!("│ {glyph} working…"), Style::default().fg(theme.turn_loading))
    } else {
        Span::raw("│ ? help  i ask  [ ] highlights  Enter analyse  q quit")
    };

    let line = Line::from(vec![
        Span::styled(badge, Style::default().fg(badge_color).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {} ", state.focus.title())),
        tail,
    ]);
    let bar = Paragraph::new(line)
        .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg));
    frame.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_panels_collapse_as_the_terminal_narrows() {
        let state = AppState::default();
        assert_eq!(
            panel_constraints(150, &state),
            [Constraint::Percentage(20), Constraint::Percentage(55), Constraint::Percentage(25)]
        );
        assert_eq!(
            panel_constraints(100, &state),
            [Constraint::Length(0), Constraint::Fill(1), Constraint::Percentage(35)]
        );
        assert_eq!(
            panel_constraints(60, &state),
            [Constraint::Length(0), Constraint::Fill(1), Constraint::Length(0)]
        );
    }
}
