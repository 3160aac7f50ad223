//! Central application state for biaslens.
//!
//! This module owns all mutable UI state: the current mode, which panel has focus,
//! the conversation, per-panel scroll offsets and viewport heights, panel width
//! percentages, and the text being typed. No ratatui rendering logic lives here;
//! `app.rs` is pure state that is read by the render module and mutated by the
//! keybinding dispatcher and the turn-event handler.

use biaslens_core::resolve::ResolvedSegmentList;
use biaslens_core::turn::{Conversation, Turn, TurnUpdate};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::worker::TurnRequest;

/// Editor mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// API-key form shown until credentials are available.
    Setup,
    /// Normal vim-style navigation mode (default).
    #[default]
    Normal,
    /// Typing a question into the input row.
    Insert,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
    /// Quit-confirmation dialog shown while a turn is in flight.
    ConfirmQuit,
}

/// Which panel currently has keyboard focus.
///
/// Navigation cycles through Turns → Response → Summary → Turns via `next()`
/// and in reverse via `prev()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel listing the questions asked so far.
    Turns,
    /// Centre panel showing the selected turn's answer and highlights.
    #[default]
    Response,
    /// Right panel showing the critique summary.
    Summary,
}

impl PanelFocus {
    /// Returns the panel that precedes `self` in the cycle (wraps around).
    pub fn prev(self) -> Self {
        match self {
            PanelFocus::Turns => PanelFocus::Summary,
            PanelFocus::Response => PanelFocus::Turns,
            PanelFocus::Summary => PanelFocus::Response,
        }
    }

    /// Returns the panel that follows `self` in the cycle (wraps around).
    pub fn next(self) -> Self {
        match self {
            PanelFocus::Turns => PanelFocus::Response,
            PanelFocus::Response => PanelFocus::Summary,
            PanelFocus::Summary => PanelFocus::Turns,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PanelFocus::Turns => "Turns",
            PanelFocus::Response => "Response",
            PanelFocus::Summary => "Summary",
        }
    }
}

/// How the response panel presents a finished critique.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CritiqueView {
    /// Excerpts highlighted in the answer, analysis opened one at a time.
    #[default]
    Highlights,
    /// The answer as plain text followed by the whole critique as text (`t`).
    Text,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    /// Current editor mode governing which keybindings are active.
    pub mode: Mode,
    /// Which panel currently receives keyboard scroll/navigation events.
    pub focus: PanelFocus,

    /// Every question asked this session and what came back for it.
    pub conversation: Conversation,
    /// Selection in the turn list; the selected turn is shown in the centre panel.
    pub turn_list_state: ListState,
    /// Index into the shown turn's resolved highlight list, moved with `[` / `]`.
    pub highlight_cursor: Option<usize>,
    /// Set when the highlight cursor moved; the renderer scrolls it into view.
    pub follow_cursor: bool,
    /// Highlighted answer or plain-text critique; kept across turns.
    pub critique_view: CritiqueView,

    /// Vertical scroll offset for the response panel.
    pub response_scroll: u16,
    /// Vertical scroll offset for the summary panel.
    pub summary_scroll: u16,

    /// Inner heights of the panels after borders, cached after each render.
    /// Used by half-page and full-page scroll calculations.
    pub turns_viewport_height: u16,
    pub response_viewport_height: u16,
    pub summary_viewport_height: u16,

    /// Rendered line counts, cached after each render to clamp scrolling.
    pub response_line_count: u16,
    pub summary_line_count: u16,

    /// Width percentage allocated to the left (turns) panel. Default: 20.
    pub left_pct: u16,
    /// Width percentage allocated to the centre (response) panel. Default: 55.
    pub center_pct: u16,
    /// Width percentage allocated to the right (summary) panel. Default: 25.
    pub right_pct: u16,

    /// Question being typed in Insert mode.
    pub question_input: String,
    /// API key being typed in the setup form. Rendered masked.
    pub key_input: String,
    /// Validation message shown under the setup form.
    pub setup_error: Option<String>,
    /// One-line notice shown in the status bar until the next key press.
    pub status_message: Option<String>,

    /// Vertical scroll offset of the help overlay.
    pub help_scroll: u16,
    /// Outer rects of the three panels from the last render, for mouse hit-testing.
    pub panel_rects: [Rect; 3],
    /// Request channel of the turn worker; `None` until credentials are known.
    pub turn_tx: Option<UnboundedSender<TurnRequest>>,
    /// Advanced on every tick to animate loading indicators.
    pub spinner_frame: usize,
}

impl Default for AppState {
    /// Constructs `AppState` with sensible defaults.
    ///
    /// Panel percentages are 20 / 55 / 25 (left / centre / right). All scroll
    /// offsets start at zero and the conversation is empty.
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            conversation: Conversation::new(),
            turn_list_state: ListState::default(),
            highlight_cursor: None,
            follow_cursor: false,
            critique_view: CritiqueView::default(),
            response_scroll: 0,
            summary_scroll: 0,
            turns_viewport_height: 0,
            response_viewport_height: 0,
            summary_viewport_height: 0,
            response_line_count: 0,
            summary_line_count: 0,
            left_pct: 20,
            center_pct: 55,
            right_pct: 25,
            question_input: String::new(),
            key_input: String::new(),
            setup_error: None,
            status_message: None,
            help_scroll: 0,
            panel_rects: [Rect::default(); 3],
            turn_tx: None,
            spinner_frame: 0,
        }
    }
}

impl AppState {
    /// Creates the state for a fresh session.
    ///
    /// Without a turn worker the setup form is shown first.
    pub fn new(turn_tx: Option<UnboundedSender<TurnRequest>>) -> Self {
        let mode = if turn_tx.is_some() { Mode::Normal } else { Mode::Setup };
        Self {
            mode,
            turn_tx,
            ..Self::default()
        }
    }

    /// Installs the turn worker once the user has entered an API key.
    pub fn connect(&mut self, turn_tx: UnboundedSender<TurnRequest>) {
        self.turn_tx = Some(turn_tx);
        self.key_input.clear();
        self.setup_error = None;
        self.mode = Mode::Insert;
    }

    // -----------------------------------------------------------------------
    // Turns
    // -----------------------------------------------------------------------

    /// The turn shown in the response and summary panels.
    pub fn active_turn(&self) -> Option<&Turn> {
        self.turn_list_state
            .selected()
            .and_then(|i| self.conversation.turns().get(i))
    }

    /// Highlight list of the shown turn.
    pub fn active_segments(&self) -> ResolvedSegmentList {
        self.active_turn()
            .map(Turn::resolved_segments)
            .unwrap_or_default()
    }

    /// Id of the segment under the highlight cursor.
    pub fn cursor_segment_id(&self) -> Option<String> {
        let index = self.highlight_cursor?;
        self.active_segments().at(index).map(|s| s.id().to_owned())
    }

    /// Shows the turn at `index`, clamped to the list. Resets per-turn view state.
    pub fn select_turn(&mut self, index: usize) {
        let len = self.conversation.len();
        if len == 0 {
            self.turn_list_state.select(None);
            return;
        }
        let index = index.min(len - 1);
        if self.turn_list_state.selected() == Some(index) {
            return;
        }
        self.turn_list_state.select(Some(index));
        self.highlight_cursor = None;
        self.response_scroll = 0;
        self.summary_scroll = 0;
    }

    /// Shows the previous turn (`{`).
    pub fn prev_turn(&mut self) {
        let current = self.turn_list_state.selected().unwrap_or(0);
        self.select_turn(current.saturating_sub(1));
    }

    /// Shows the next turn (`}`).
    pub fn next_turn(&mut self) {
        let next = self.turn_list_state.selected().map_or(0, |i| i + 1);
        self.select_turn(next);
    }

    /// Submits the typed question and hands it to the turn worker.
    ///
    /// Returns `true` when a turn was started. A blank question, a turn still in
    /// flight, or missing credentials leave the input untouched.
    pub fn submit_question(&mut self) -> bool {
        let Some(tx) = self.turn_tx.clone() else {
            self.status_message = Some("Enter an API key first".to_owned());
            self.mode = Mode::Setup;
            return false;
        };
        if self.conversation.is_processing() {
            self.status_message = Some("Wait for the current question to finish".to_owned());
            return false;
        }
        let Some(turn_id) = self.conversation.submit(&self.question_input) else {
            return false;
        };

        let question = self.question_input.trim().to_owned();
        info!(turn_id = %turn_id, "question submitted");
        if tx
            .send(TurnRequest::Ask { turn_id: turn_id.clone(), question })
            .is_err()
        {
            warn!(turn_id = %turn_id, "turn worker is gone");
            self.apply_turn_update(&turn_id, TurnUpdate::Failed("API error: turn worker stopped".to_owned()));
        }

        self.question_input.clear();
        self.mode = Mode::Normal;
        self.focus = PanelFocus::Response;
        self.select_turn(self.conversation.len() - 1);
        true
    }

    /// Applies a pipeline update received from the turn worker.
    pub fn apply_turn_update(&mut self, turn_id: &str, update: TurnUpdate) {
        if let Err(e) = self.conversation.apply(turn_id, update) {
            warn!(error = %e, "dropping turn update");
        }
    }

    /// Drops every turn (`C`). Refused while a turn is in flight.
    pub fn clear_conversation(&mut self) {
        if self.conversation.clear() {
            info!("conversation cleared");
            self.turn_list_state.select(None);
            self.highlight_cursor = None;
            self.response_scroll = 0;
            self.summary_scroll = 0;
        } else {
            self.status_message = Some("Cannot clear while a question is being processed".to_owned());
        }
    }

    // -----------------------------------------------------------------------
    // Highlights
    // -----------------------------------------------------------------------

    /// Moves the highlight cursor to the previous highlight (`[`).
    ///
    /// Stays on the first highlight when already there.
    pub fn prev_highlight(&mut self) {
        let len = self.active_segments().len();
        if len == 0 {
            return;
        }
        self.highlight_cursor = Some(match self.highlight_cursor {
            Some(i) => i.saturating_sub(1).min(len - 1),
            None => len - 1,
        });
        self.follow_cursor = true;
    }

    /// Moves the highlight cursor to the next highlight (`]`).
    ///
    /// Stays on the last highlight when already there.
    pub fn next_highlight(&mut self) {
        let len = self.active_segments().len();
        if len == 0 {
            return;
        }
        self.highlight_cursor = Some(match self.highlight_cursor {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        });
        self.follow_cursor = true;
    }

    /// Opens or closes the analysis panel of the highlight under the cursor (Enter).
    ///
    /// With no cursor yet, the first highlight is activated.
    pub fn toggle_highlight(&mut self) {
        if self.highlight_cursor.is_none() {
            self.next_highlight();
        }
        let Some(segment_id) = self.cursor_segment_id() else {
            return;
        };
        let Some(turn_id) = self.active_turn().map(|t| t.id.clone()) else {
            return;
        };
        if let Err(e) = self.conversation.select_segment(&turn_id, &segment_id) {
            warn!(error = %e, "cannot toggle segment");
        }
        self.follow_cursor = true;
    }

    /// Closes the analysis panel of the shown turn (Esc).
    pub fn close_analysis(&mut self) {
        let Some(turn_id) = self.active_turn().map(|t| t.id.clone()) else {
            return;
        };
        if let Some(turn) = self.conversation.get_mut(&turn_id) {
            turn.clear_selection();
        }
    }

    /// Switches the response panel between highlights and plain text (`t`).
    pub fn toggle_critique_view(&mut self) {
        self.critique_view = match self.critique_view {
            CritiqueView::Highlights => CritiqueView::Text,
            CritiqueView::Text => CritiqueView::Highlights,
        };
        self.response_scroll = 0;
        self.follow_cursor = self.critique_view == CritiqueView::Highlights;
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    /// Scrolls the focused panel down by `lines` rows.
    ///
    /// For `Turns`: moves the selection down by `lines` turns.
    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Turns => {
                let next = self
                    .turn_list_state
                    .selected()
                    .map_or(0, |i| i.saturating_add(lines as usize));
                self.select_turn(next);
            }
            PanelFocus::Response => {
                self.response_scroll = self.response_scroll.saturating_add(lines);
            }
            PanelFocus::Summary => {
                self.summary_scroll = self.summary_scroll.saturating_add(lines);
            }
        }
    }

    /// Scrolls the focused panel up by `lines` rows.
    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Turns => {
                let prev = self
                    .turn_list_state
                    .selected()
                    .map_or(0, |i| i.saturating_sub(lines as usize));
                self.select_turn(prev);
            }
            PanelFocus::Response => {
                self.response_scroll = self.response_scroll.saturating_sub(lines);
            }
            PanelFocus::Summary => {
                self.summary_scroll = self.summary_scroll.saturating_sub(lines);
            }
        }
    }

    /// Scrolls the focused panel to the very top.
    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Turns => self.select_turn(0),
            PanelFocus::Response => self.response_scroll = 0,
            PanelFocus::Summary => self.summary_scroll = 0,
        }
    }

    /// Scrolls the focused panel to the very bottom.
    ///
    /// Uses the line counts cached from the previous render.
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Turns => self.select_turn(usize::MAX),
            PanelFocus::Response => {
                self.response_scroll = self
                    .response_line_count
                    .saturating_sub(self.response_viewport_height);
            }
            PanelFocus::Summary => {
                self.summary_scroll = self
                    .summary_line_count
                    .saturating_sub(self.summary_viewport_height);
            }
        }
    }

    fn focused_viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Turns => self.turns_viewport_height,
            PanelFocus::Response => self.response_viewport_height,
            PanelFocus::Summary => self.summary_viewport_height,
        }
    }

    /// Scrolls the focused panel down by half its visible height.
    ///
    /// If the cached height is zero (first frame), scrolls by 1 to avoid a no-op.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.focused_viewport_height() / 2).max(1));
    }

    /// Scrolls the focused panel up by half its visible height.
    pub fn half_page_up(&mut self) {
        self.scroll_up((self.focused_viewport_height() / 2).max(1));
    }

    /// Scrolls the focused panel down by its full visible height (one page).
    pub fn full_page_down(&mut self) {
        self.scroll_down(self.focused_viewport_height().max(1));
    }

    /// Scrolls the focused panel up by its full visible height (one page).
    pub fn full_page_up(&mut self) {
        self.scroll_up(self.focused_viewport_height().max(1));
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Shrinks the response (centre) panel by transferring 5% to the side panels.
    ///
    /// The centre panel will not shrink below 20%.
    pub fn shrink_response_panel(&mut self) {
        const MIN_CENTER: u16 = 20;
        const STEP: u16 = 5;
        if self.center_pct <= MIN_CENTER {
            return;
        }
        let transfer = STEP.min(self.center_pct - MIN_CENTER);
        self.center_pct -= transfer;
        let left_gain = transfer / 2;
        let right_gain = transfer - left_gain;
        self.left_pct = self.left_pct.saturating_add(left_gain);
        self.right_pct = self.right_pct.saturating_add(right_gain);
    }

    /// Grows the response (centre) panel by pulling 5% from the side panels.
    ///
    /// The centre panel will not grow above 80%; side panels keep at least 5%.
    pub fn grow_response_panel(&mut self) {
        const MAX_CENTER: u16 = 80;
        const MIN_SIDE: u16 = 5;
        const STEP: u16 = 5;
        if self.center_pct >= MAX_CENTER {
            return;
        }
        let transfer = STEP.min(MAX_CENTER - self.center_pct);
        let left_give = (transfer / 2).min(self.left_pct.saturating_sub(MIN_SIDE));
        let right_give = (transfer - transfer / 2).min(self.right_pct.saturating_sub(MIN_SIDE));
        self.left_pct -= left_give;
        self.right_pct -= right_give;
        self.center_pct += left_give + right_give;
    }

    /// Advances the loading animation.
    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}
