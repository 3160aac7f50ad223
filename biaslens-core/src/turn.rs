//! Conversation turns and their lifecycle.
//!
//! A turn is one question plus the answer and critique produced for it. Its
//! status is a sum type whose variants carry exactly the data valid in that
//! state, so a "complete" turn without an answer cannot be represented.
//!
//! ```text
//! Pending → Answering → Critiquing → Complete
//!    └──────────┴────────────┴─────→ Error
//! ```
//!
//! Transitions only move forward; `Complete` and `Error` are terminal.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::metrics::IssueBreakdown;
use crate::panel::{render_with_panel, toggle_selection, RenderItem};
use crate::resolve::ResolvedSegmentList;
use crate::types::Critique;

/// Lifecycle state of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStatus {
    /// Created, no provider call issued yet.
    Pending,
    /// Waiting for the answer.
    Answering,
    /// Answer received, waiting for the critique.
    Critiquing { answer: String },
    Complete { answer: String, critique: Critique },
    /// A provider call failed. `answer` is kept if the first call succeeded.
    Error { message: String, answer: Option<String> },
}

impl TurnStatus {
    pub fn name(&self) -> &'static str {
        match self {
            TurnStatus::Pending => "pending",
            TurnStatus::Answering => "answering",
            TurnStatus::Critiquing { .. } => "critiquing",
            TurnStatus::Complete { .. } => "complete",
            TurnStatus::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnStatus::Complete { .. } | TurnStatus::Error { .. })
    }
}

/// Progress reported by the turn pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnUpdate {
    /// The answer request has been issued.
    Answering,
    /// The answer arrived; the critique request follows.
    Answered(String),
    /// The critique arrived and was parsed.
    Critiqued(Critique),
    /// A provider call failed; carries the user-facing message.
    Failed(String),
}

impl TurnUpdate {
    /// Name of the status this update moves a turn into.
    fn target(&self) -> &'static str {
        match self {
            TurnUpdate::Answering => "answering",
            TurnUpdate::Answered(_) => "critiquing",
            TurnUpdate::Critiqued(_) => "complete",
            TurnUpdate::Failed(_) => "error",
        }
    }
}

/// One question and everything produced for it.
#[derive(Debug, Clone)]
pub struct Turn {
    pub id: String,           // UUID v4 text
    pub timestamp: i64,       // Unix timestamp seconds
    pub question: String,
    pub status: TurnStatus,
    /// Segment whose analysis panel is open. UI state only.
    pub selected_segment: Option<String>,
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

impl Turn {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: now_secs(),
            question: question.into(),
            status: TurnStatus::Pending,
            selected_segment: None,
        }
    }

    /// Advances the turn with `update`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalTransition`] and leaves the turn untouched when
    /// `update` does not follow from the current status.
    pub fn apply(&mut self, update: TurnUpdate) -> Result<()> {
        let from = self.status.name();
        let to = update.target();
        let current = std::mem::replace(&mut self.status, TurnStatus::Pending);

        let next = match (current, update) {
            (TurnStatus::Pending, TurnUpdate::Answering) => TurnStatus::Answering,
            (TurnStatus::Answering, TurnUpdate::Answered(answer)) => {
                TurnStatus::Critiquing { answer }
            }
            (TurnStatus::Critiquing { answer }, TurnUpdate::Critiqued(critique)) => {
                TurnStatus::Complete { answer, critique }
            }
            (TurnStatus::Pending | TurnStatus::Answering, TurnUpdate::Failed(message)) => {
                TurnStatus::Error { message, answer: None }
            }
            (TurnStatus::Critiquing { answer }, TurnUpdate::Failed(message)) => {
                TurnStatus::Error { message, answer: Some(answer) }
            }
            (current, _) => {
                self.status = current;
                return Err(Error::IllegalTransition { turn_id: self.id.clone(), from, to });
            }
        };
        self.status = next;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The answer, once it has arrived.
    pub fn answer(&self) -> Option<&str> {
        match &self.status {
            TurnStatus::Critiquing { answer } | TurnStatus::Complete { answer, .. } => Some(answer),
            TurnStatus::Error { answer, .. } => answer.as_deref(),
            TurnStatus::Pending | TurnStatus::Answering => None,
        }
    }

    pub fn critique(&self) -> Option<&Critique> {
        match &self.status {
            TurnStatus::Complete { critique, .. } => Some(critique),
            _ => None,
        }
    }

    /// Highlight list for the current critique; empty before completion.
    pub fn resolved_segments(&self) -> ResolvedSegmentList {
        self.critique()
            .map(|c| ResolvedSegmentList::from_segments(&c.segments))
            .unwrap_or_default()
    }

    pub fn breakdown(&self) -> Option<IssueBreakdown> {
        self.critique().map(|c| IssueBreakdown::from_segments(&c.segments))
    }

    /// Renders the answer with highlights and the open analysis panel.
    ///
    /// Empty until the turn is complete.
    pub fn render_items(&self) -> Vec<RenderItem> {
        match &self.status {
            TurnStatus::Complete { answer, critique } => {
                let resolved = ResolvedSegmentList::from_segments(&critique.segments);
                render_with_panel(answer, &resolved, self.selected_segment.as_deref())
            }
            _ => Vec::new(),
        }
    }

    /// Toggles the selection of `segment_id`.
    ///
    /// Returns `false`, changing nothing, when the id names no highlighted
    /// segment of this turn.
    pub fn select_segment(&mut self, segment_id: &str) -> bool {
        if self.resolved_segments().get(segment_id).is_none() {
            return false;
        }
        self.selected_segment = toggle_selection(self.selected_segment.as_deref(), segment_id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected_segment = None;
    }
}

/// Every turn of the session, oldest first.
///
/// Only one turn is in flight at a time: [`Conversation::submit`] refuses new
/// questions while `is_processing` is set.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
    is_processing: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new turn for `question`.
    ///
    /// Returns the new turn's id, or `None` (changing nothing) when the
    /// question is blank or another turn is still in flight.
    pub fn submit(&mut self, question: &str) -> Option<String> {
        let question = question.trim();
        if question.is_empty() || self.is_processing {
            return None;
        }
        let turn = Turn::new(question);
        let id = turn.id.clone();
        self.turns.push(turn);
        self.is_processing = true;
        Some(id)
    }

    /// Applies a pipeline update to the turn `turn_id`.
    ///
    /// Clears the processing flag once the turn reaches a terminal state.
    pub fn apply(&mut self, turn_id: &str, update: TurnUpdate) -> Result<()> {
        let turn = self
            .get_mut(turn_id)
            .ok_or_else(|| Error::UnknownTurn(turn_id.to_owned()))?;
        turn.apply(update)?;
        if turn.is_terminal() {
            self.is_processing = false;
        }
        Ok(())
    }

    /// Toggles a segment selection on one turn.
    pub fn select_segment(&mut self, turn_id: &str, segment_id: &str) -> Result<bool> {
        let turn = self
            .get_mut(turn_id)
            .ok_or_else(|| Error::UnknownTurn(turn_id.to_owned()))?;
        Ok(turn.select_segment(segment_id))
    }

    /// Drops every turn. Refused (returns `false`) while a turn is in flight.
    pub fn clear(&mut self) -> bool {
        if self.is_processing {
            return false;
        }
        self.turns.clear();
        true
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, turn_id: &str) -> Option<&Turn> {
        self.turns.iter().find(|t| t.id == turn_id)
    }

    pub fn get_mut(&mut self, turn_id: &str) -> Option<&mut Turn> {
        self.turns.iter_mut().find(|t| t.id == turn_id)
    }
}
