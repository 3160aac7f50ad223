//! Background task that runs turns against the provider.
//!
//! The UI never awaits the network. It sends a `TurnRequest` and keeps
//! drawing; every step of the pipeline comes back as `AppEvent::Turn`.
//! Requests are handled one at a time, in arrival order.

use std::sync::Arc;

use biaslens_core::provider::{run_turn, Provider};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::event::AppEvent;

/// Work sent from the UI to the turn worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRequest {
    /// Answer and critique `question` for the turn `turn_id`.
    Ask { turn_id: String, question: String },
}

/// Starts the worker on the current runtime and returns its request sender.
///
/// The worker exits when the returned sender is dropped.
pub fn spawn_turn_worker(
    provider: Arc<dyn Provider>,
    event_tx: UnboundedSender<AppEvent>,
) -> UnboundedSender<TurnRequest> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(turn_worker_loop(provider, rx, event_tx));
    tx
}

/// Loops over incoming requests until the channel is closed.
pub async fn turn_worker_loop(
    provider: Arc<dyn Provider>,
    mut rx: UnboundedReceiver<TurnRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    while let Some(request) = rx.recv().await {
        match request {
            TurnRequest::Ask { turn_id, question } => {
                info!(turn_id = %turn_id, "turn started");
                run_turn(provider.as_ref(), &question, |update| {
                    let _ = event_tx.send(AppEvent::Turn {
                        turn_id: turn_id.clone(),
                        update,
                    });
                })
                .await;
            }
        }
    }
    debug!("turn worker stopped");
}
