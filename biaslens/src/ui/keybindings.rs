//! Keybinding dispatcher for biaslens.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop what to do next. The dispatcher branches
//! first on `state.mode` so that every mode has an isolated handler.

use biaslens_core::provider::ApiKey;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally and request another render.
    Continue,
    /// Exit cleanly.
    Quit,
    /// The setup form was submitted; the event loop builds the client.
    Connect(ApiKey),
}

/// Dispatches a key event to the handler matching the current mode.
///
/// Any key press dismisses the pending status message.
///
/// # Arguments
///
/// * `key`:   the raw crossterm key event (code + modifiers)
/// * `state`: mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    state.status_message = None;
    match state.mode {
        Mode::Setup => handle_setup(key, state),
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

// ---------------------------------------------------------------------------
// Setup mode
// ---------------------------------------------------------------------------

/// Handles the API-key form: typing, Backspace, Enter to submit, Esc to quit.
fn handle_setup(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if is_ctrl_c(&key) {
        return KeyAction::Quit;
    }
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Enter => match ApiKey::new(&state.key_input) {
            Some(api_key) => KeyAction::Connect(api_key),
            None => {
                state.setup_error = Some("Please enter an API key".to_owned());
                KeyAction::Continue
            }
        },
        KeyCode::Backspace => {
            state.key_input.pop();
            KeyAction::Continue
        }
        KeyCode::Char(c) => {
            state.key_input.push(c);
            state.setup_error = None;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event while in Normal mode.
///
/// Scroll keys are tried first, then highlight keys, then focus, turn
/// navigation, panel resize, and mode transitions.
fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if is_ctrl_c(&key) {
        return quit_or_confirm(state);
    }
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    if let Some(action) = handle_highlight_key(key, state) {
        return action;
    }

    match key.code {
        // Panel focus
        KeyCode::Char('H') => {
            state.focus = state.focus.prev();
            KeyAction::Continue
        }
        KeyCode::Char('L') => {
            state.focus = state.focus.next();
            KeyAction::Continue
        }

        // Turn navigation
        KeyCode::Char('{') => { state.prev_turn(); KeyAction::Continue }
        KeyCode::Char('}') => { state.next_turn(); KeyAction::Continue }

        // Response panel resize
        KeyCode::Char('<') => { state.shrink_response_panel(); KeyAction::Continue }
        KeyCode::Char('>') => { state.grow_response_panel(); KeyAction::Continue }

        // Asking
        KeyCode::Char('i') | KeyCode::Char('/') => {
            state.mode = Mode::Insert;
            KeyAction::Continue
        }
        KeyCode::Char('C') => {
            state.clear_conversation();
            KeyAction::Continue
        }
        KeyCode::Char('t') => {
            state.toggle_critique_view();
            KeyAction::Continue
        }

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }

        KeyCode::Char('q') => quit_or_confirm(state),

        _ => KeyAction::Continue,
    }
}

fn quit_or_confirm(state: &mut AppState) -> KeyAction {
    if state.conversation.is_processing() {
        state.mode = Mode::ConfirmQuit;
        KeyAction::Continue
    } else {
        KeyAction::Quit
    }
}

/// Handles highlight keys: `[` / `]` move the cursor, Enter toggles the
/// analysis, Esc closes it.
///
/// Returns `None` when the key should fall through.
fn handle_highlight_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    match key.code {
        KeyCode::Char('[') => state.prev_highlight(),
        KeyCode::Char(']') => state.next_highlight(),
        KeyCode::Enter => state.toggle_highlight(),
        KeyCode::Esc => state.close_analysis(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

/// Handles scroll-related keys in Normal mode: j / k / g / G and Ctrl combos.
///
/// Returns `Some(KeyAction)` when the key was consumed, `None` when the key
/// should fall through to the rest of the Normal handler.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') => state.scroll_top(),
        KeyCode::Char('G') => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('f') if ctrl => state.full_page_down(),
        KeyCode::Char('b') if ctrl => state.full_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Handles typing a question. Enter submits, Esc returns to Normal mode.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if is_ctrl_c(&key) {
        state.mode = Mode::Normal;
        return KeyAction::Continue;
    }
    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Enter => {
            state.submit_question();
        }
        KeyCode::Backspace => {
            state.question_input.pop();
        }
        KeyCode::Char(c) => state.question_input.push(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is visible.
///
/// `?`, `Esc`, or `q` dismisses the overlay. j/k/g/G scroll it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// ConfirmQuit mode
// ---------------------------------------------------------------------------

/// `y` / `Y` quits; `n` / `N` / `Esc` returns to Normal mode.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: click-to-focus and scroll-wheel.
///
/// Left click on a panel sets focus to that panel. The wheel scrolls the
/// focused panel by 3 lines, or the help overlay when it is open.
///
/// # Arguments
///
/// * `mouse`: the crossterm mouse event
/// * `state`: mutable reference to all UI state
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    if matches!(state.mode, Mode::Setup | Mode::ConfirmQuit) {
        return KeyAction::Continue;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_mouse_click(mouse.column, mouse.row, state),
        MouseEventKind::ScrollUp => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            } else {
                state.scroll_up(3);
            }
        }
        MouseEventKind::ScrollDown => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_add(3);
            } else {
                state.scroll_down(3);
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Sets panel focus based on the clicked screen position.
///
/// Collapsed panels (zero width) cannot receive focus via click.
fn handle_mouse_click(col: u16, row: u16, state: &mut AppState) {
    let pos = Position { x: col, y: row };
    let [left, center, right] = state.panel_rects;

    if left.width > 0 && left.contains(pos) {
        state.focus = PanelFocus::Turns;
    } else if center.contains(pos) {
        state.focus = PanelFocus::Response;
    } else if right.width > 0 && right.contains(pos) {
        state.focus = PanelFocus::Summary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CritiqueView;
    use ratatui::layout::Rect;
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(press(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn setup_form_requires_a_key() {
        let mut state = AppState::new(None);
        assert_eq!(state.mode, Mode::Setup);

        assert_eq!(handle_key(press(KeyCode::Enter), &mut state), KeyAction::Continue);
        assert_eq!(state.setup_error.as_deref(), Some("Please enter an API key"));

        type_text(&mut state, " sk-ant-x ");
        assert!(state.setup_error.is_none());
        let action = handle_key(press(KeyCode::Enter), &mut state);
        assert_eq!(action, KeyAction::Connect(ApiKey::new("sk-ant-x").unwrap()));
    }

    #[test]
    fn setup_esc_quits() {
        let mut state = AppState::new(None);
        assert_eq!(handle_key(press(KeyCode::Esc), &mut state), KeyAction::Quit);
    }

    #[test]
    fn typing_and_submitting_a_question() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(Some(tx));

        handle_key(press(KeyCode::Char('i')), &mut state);
        assert_eq!(state.mode, Mode::Insert);
        type_text(&mut state, "Why?x");
        handle_key(press(KeyCode::Backspace), &mut state);
        assert_eq!(state.question_input, "Why?");

        handle_key(press(KeyCode::Enter), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.question_input.is_empty());
        assert_eq!(state.conversation.len(), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn q_confirms_while_a_turn_is_in_flight() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(Some(tx));
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Quit);

        state.question_input = "busy?".to_owned();
        state.submit_question();
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::ConfirmQuit);

        handle_key(press(KeyCode::Char('n')), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        handle_key(press(KeyCode::Char('q')), &mut state);
        assert_eq!(handle_key(press(KeyCode::Char('y')), &mut state), KeyAction::Quit);
    }

    #[test]
    fn focus_cycles_with_h_and_l() {
        let mut state = AppState::default();
        assert_eq!(state.focus, PanelFocus::Response);
        handle_key(press(KeyCode::Char('L')), &mut state);
        assert_eq!(state.focus, PanelFocus::Summary);
        handle_key(press(KeyCode::Char('L')), &mut state);
        assert_eq!(state.focus, PanelFocus::Turns);
        handle_key(press(KeyCode::Char('H')), &mut state);
        assert_eq!(state.focus, PanelFocus::Summary);
    }

    #[test]
    fn help_overlay_opens_scrolls_and_closes() {
        let mut state = AppState::default();
        handle_key(press(KeyCode::Char('?')), &mut state);
        assert_eq!(state.mode, Mode::HelpOverlay);
        handle_key(press(KeyCode::Char('j')), &mut state);
        handle_key(press(KeyCode::Char('j')), &mut state);
        assert_eq!(state.help_scroll, 2);
        handle_key(press(KeyCode::Esc), &mut state);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn t_switches_the_critique_view() {
        let mut state = AppState::default();
        handle_key(press(KeyCode::Char('t')), &mut state);
        assert_eq!(state.critique_view, CritiqueView::Text);
        handle_key(press(KeyCode::Char('t')), &mut state);
        assert_eq!(state.critique_view, CritiqueView::Highlights);
    }

    #[test]
    fn key_press_clears_status_message() {
        let mut state = AppState::default();
        state.status_message = Some("hello".to_owned());
        handle_key(press(KeyCode::Char('j')), &mut state);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn click_focuses_panel() {
        let mut state = AppState::default();
        state.panel_rects = [
            Rect::new(0, 0, 10, 10),
            Rect::new(10, 0, 10, 10),
            Rect::new(20, 0, 10, 10),
        ];
        let click = |column| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(click(3), &mut state);
        assert_eq!(state.focus, PanelFocus::Turns);
        handle_mouse(click(25), &mut state);
        assert_eq!(state.focus, PanelFocus::Summary);
    }
}
