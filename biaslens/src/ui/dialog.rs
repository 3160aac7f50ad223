//! Modal dialogs: the API-key setup form and the quit confirmation.
//!
//! Both are drawn like the help overlay: `Clear` first, then a bordered
//! `Paragraph` centred over the panels, inside the same `terminal.draw()`.

use ratatui::{
    Frame,
    layout::{Constraint, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::config::API_KEY_ENV;
use crate::theme::Theme;
use crate::ui::layout::inner_rect;

/// Renders the API-key form shown until credentials are available.
///
/// The key is masked: one `•` per typed character.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `state`: app state supplying the key buffer and validation message
/// * `theme`: active color theme
pub fn render_setup_form(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = centered(frame.area(), 64, 16);
    frame.render_widget(Clear, area);

    let muted = Style::default().fg(theme.text_muted);
    let masked = "•".repeat(state.key_input.chars().count());
    let key_line = if masked.is_empty() {
        Line::styled("sk-ant-...", muted)
    } else {
        Line::raw(masked.clone())
    };

    let mut lines = vec![
        Line::styled(
            "AI Bias Explorer",
            Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
        ),
        Line::raw("Enter your Anthropic API key to get started"),
        Line::default(),
        Line::styled("Anthropic API Key", Style::default().add_modifier(Modifier::BOLD)),
        key_line,
        Line::default(),
    ];
    if let Some(error) = &state.setup_error {
        lines.push(Line::styled(error.clone(), Style::default().fg(theme.turn_error)));
    }
    lines.extend([
        Line::default(),
        Line::from(vec![
            Span::styled("Don't have an API key? ", muted),
            Span::raw("Get one at console.anthropic.com"),
        ]),
        Line::styled(format!("Set {API_KEY_ENV} to skip this screen."), muted),
        Line::styled("The key is kept in memory only.", muted),
        Line::default(),
        Line::styled("Enter to start · Esc to quit", muted),
    ]);

    let block = Block::bordered()
        .title(" Setup ")
        .border_style(Style::default().fg(theme.border_active));
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(block).wrap(Wrap { trim: false }),
        area,
    );

    // Key line is the fifth row inside the border.
    let inner = inner_rect(area);
    let x = inner.x.saturating_add(masked.chars().count() as u16).min(inner.right().saturating_sub(1));
    frame.set_cursor_position(Position { x, y: inner.y + 4 });
}

/// Renders the quit confirmation shown while a turn is in flight.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `theme`: active color theme
pub fn render_confirm_quit(frame: &mut Frame, theme: &Theme) {
    let area = centered(frame.area(), 50, 5);
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Quit? ")
        .border_style(Style::default().fg(theme.turn_loading));
    let text = Text::from(vec![
        Line::raw("A question is still being processed."),
        Line::styled("Quit anyway? (y/n)", Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), area);
}

/// A `width` × `height` rect centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    area.centered(
        Constraint::Length(width.min(area.width)),
        Constraint::Length(height.min(area.height)),
    )
}
