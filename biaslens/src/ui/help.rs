//! Help overlay renderer for biaslens.
//!
//! Draws a centred modal over the panel layout. `Clear` erases the background
//! first, inside the same `terminal.draw()` closure as the panels.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal on top of the panels.
///
/// Skipped on terminals narrower than 60 columns.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `theme`: active color theme
/// * `help_scroll`: vertical scroll offset; j/k in HelpOverlay mode mutate it
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  · j/k scroll, ? or Esc to dismiss ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let section = Style::default().fg(theme.heading).add_modifier(Modifier::BOLD);
    Text::from(vec![
        Line::styled("Asking", section),
        Line::from("  i or /        Type a question"),
        Line::from("  Enter         Send the question (while typing)"),
        Line::from("  Esc           Stop typing"),
        Line::from("  C             Clear the conversation"),
        Line::from(""),
        Line::styled("Highlights", section),
        Line::from("  [ / ]         Previous / next highlighted passage"),
        Line::from("  Enter         Show / hide the analysis of that passage"),
        Line::from("  Esc           Close the analysis"),
        Line::from("  t             Show the whole critique as text / back to highlights"),
        Line::from(""),
        Line::styled("Navigation", section),
        Line::from("  j / k         Scroll down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from("  Ctrl-f / b    Scroll full page down / up"),
        Line::from("  H / L         Move panel focus left / right"),
        Line::from("  { / }         Previous / next question"),
        Line::from("  < / >         Shrink / grow the response panel by 5%"),
        Line::from(""),
        Line::styled("Highlight colors", section),
        Line::from("  Background shows severity: low, medium, high"),
        Line::from("  [n] marks the passage number used in the summary"),
        Line::from(""),
        Line::styled("General", section),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q             Quit (confirms while a question is processing)"),
    ])
}
