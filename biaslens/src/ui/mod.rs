//! UI rendering module for biaslens.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each panel
//! has its own renderer, and overlays are drawn last so they sit on top.

mod dialog;
mod help;
mod input;
mod layout;
mod response_view;
mod summary;
mod turn_list;
mod wrap;
pub mod keybindings;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: turn list, response, summary, input row,
/// status bar, and whichever overlay the mode calls for.
///
/// Viewport heights and panel rects are written back into `state` so the
/// next keypress or click can use them. The one-frame lag is imperceptible.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `state`: mutable reference to app state
/// * `theme`: active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [left, center, right, input_row, status_bar] = compute_layout(frame, state);

    state.turns_viewport_height = inner_rect(left).height;
    state.response_viewport_height = inner_rect(center).height;
    state.summary_viewport_height = inner_rect(right).height;
    state.panel_rects = [left, center, right];

    let focus = state.focus;

    if left.width > 0 {
        turn_list::render_turn_list(frame, left, focus, state, theme);
    }
    response_view::render_response(frame, center, focus, state, theme);
    if right.width > 0 {
        summary::render_summary(frame, right, focus, state, theme);
    }
    input::render_input(frame, input_row, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmQuit => dialog::render_confirm_quit(frame, theme),
        Mode::Setup => dialog::render_setup_form(frame, state, theme),
        Mode::Normal | Mode::Insert => {}
    }
}
