//! Question input row.
//!
//! A bordered single line under the panels. In Insert mode it shows the text
//! being typed and places the terminal cursor after it; otherwise it shows a
//! placeholder or, while a turn is in flight, that input is blocked.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

const PLACEHOLDER: &str = "Ask a question to explore AI biases and perspectives...";

/// Renders the input row.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: the 3-row `Rect` returned by `compute_layout` (index 3)
/// * `state`: read-only app state supplying the input buffer and mode
/// * `theme`: active color theme
pub fn render_input(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let editing = state.mode == Mode::Insert;
    let title = if editing {
        "Question (Enter to send, Esc to stop typing)"
    } else {
        "Question"
    };
    let block = panel_block(title, editing, theme);
    let inner = inner_rect(area);

    let line = if editing || !state.question_input.is_empty() {
        let visible = visible_tail(&state.question_input, inner.width.saturating_sub(1) as usize);
        if editing {
            let x = inner.x.saturating_add(visible.width() as u16);
            frame.set_cursor_position(Position { x, y: inner.y });
        }
        Line::raw(visible.to_owned())
    } else if state.conversation.is_processing() {
        Line::styled("Waiting for the current question to finish...", Style::default().fg(theme.text_muted))
    } else {
        Line::styled(PLACEHOLDER, Style::default().fg(theme.text_muted))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// The longest suffix of `text` that fits in `width` columns.
pub fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (index, ch) in text.char_indices().rev() {
        used += unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used > width {
            return &text[index + ch.len_utf8()..];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_input_scrolls_to_the_end() {
        assert_eq!(visible_tail("hello world", 5), "world");
        assert_eq!(visible_tail("short", 10), "short");
        assert_eq!(visible_tail("", 10), "");
    }
}
