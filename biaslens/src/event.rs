//! Event bus for biaslens.
//!
//! Terminal input, the two timers, and turn progress from the worker all
//! arrive as one `AppEvent` stream on a tokio unbounded channel, drained by
//! the main loop.
//!
//! The render timer fires every 33 ms (about 30 FPS) and the tick timer every
//! 250 ms to animate the loading spinner.

use biaslens_core::turn::TurnUpdate;
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::interval;
use tracing::debug;

const RENDER_EVERY: Duration = Duration::from_millis(33);
const TICK_EVERY: Duration = Duration::from_millis(250);

/// Everything the main loop reacts to.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press. Release and repeat events never reach the loop.
    Key(KeyEvent),
    /// Click, wheel or motion.
    Mouse(MouseEvent),
    /// New terminal size as (columns, rows).
    Resize(u16, u16),
    /// Spinner tick.
    Tick,
    /// Time to draw a frame.
    Render,
    /// Progress of the turn `turn_id`, sent by the turn worker.
    Turn { turn_id: String, update: TurnUpdate },
    /// The input stream ended; shut down.
    Quit,
}

/// Both ends of the event channel. `tx` is cloned into the producers; `rx`
/// belongs to the main loop.
pub struct EventHandler {
    pub tx: UnboundedSender<AppEvent>,
    pub rx: UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a crossterm event onto the bus. Returns `None` for events the UI ignores.
fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
        Event::Resize(columns, rows) => Some(AppEvent::Resize(columns, rows)),
        _ => None,
    }
}

/// Spawns the task that feeds terminal input and both timers into `tx`.
///
/// A failed or finished input stream sends `Quit` and ends the task. Send
/// errors are ignored: a closed channel means the loop has already exited.
pub fn spawn_event_task(tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut ticks = interval(TICK_EVERY);
        let mut frames = interval(RENDER_EVERY);
        let mut input = EventStream::new();

        loop {
            // fuse() so select! never polls a finished stream future.
            let next_input = input.next().fuse();
            let event = tokio::select! {
                _ = ticks.tick() => AppEvent::Tick,
                _ = frames.tick() => AppEvent::Render,
                maybe = next_input => match maybe {
                    Some(Ok(event)) => match translate(event) {
                        Some(app_event) => app_event,
                        None => continue,
                    },
                    Some(Err(e)) => {
                        debug!(error = %e, "terminal input failed");
                        let _ = tx.send(AppEvent::Quit);
                        break;
                    }
                    None => {
                        let _ = tx.send(AppEvent::Quit);
                        break;
                    }
                },
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    });
}
