//! biaslens: ask an LLM a question, then see its answer critiqued for bias.
//!
//! Entry point for the `biaslens` binary. Wires together logging, config, the
//! terminal lifecycle (`tui`), the event bus (`event`), the turn worker
//! (`worker`), and the UI (`ui`).
//!
//! # Startup sequence
//!
//! 1. Logging to `$XDG_STATE_HOME/biaslens/biaslens.log`; the guard lives until exit.
//! 2. Settings and theme from the XDG config file. Read-only, safe before terminal init.
//! 3. With `ANTHROPIC_API_KEY` set, the client and turn worker start right away;
//!    otherwise the setup form asks for a key.
//! 4. `install_panic_hook()` first, so it is the innermost hook.
//! 5. `register_sigterm()`, polled on the 50 ms heartbeat.
//! 6. `init_tui()`, then the event task.
//!
//! The event loop exits only via `break`, so `restore_tui()` always runs.

mod app;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;
mod worker;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use biaslens_core::provider::{AnthropicClient, ApiKey};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use crate::config::Settings;
use crate::event::AppEvent;
use crate::ui::keybindings::{self, KeyAction};
use crate::worker::TurnRequest;

/// Builds the HTTP client for `api_key` and starts a turn worker on it.
fn start_worker(
    settings: &Settings,
    api_key: ApiKey,
    event_tx: &UnboundedSender<AppEvent>,
) -> biaslens_core::Result<UnboundedSender<TurnRequest>> {
    let client = AnthropicClient::new(settings.client_config(api_key))?;
    info!(model = %settings.model, "provider client ready");
    Ok(worker::spawn_turn_worker(Arc::new(client), event_tx.clone()))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let _log_guard = logging::init_logging()?;
    info!(version = env!("CARGO_PKG_VERSION"), "biaslens starting");

    let settings = config::load_settings(&config::config_path());
    let theme = theme::Theme::from_name(&settings.theme);

    let handler = event::EventHandler::new();
    let event_tx = handler.tx.clone();
    let mut rx = handler.rx;

    let turn_tx = match config::api_key_from_env() {
        Some(api_key) => match start_worker(&settings, api_key, &event_tx) {
            Ok(tx) => Some(tx),
            Err(e) => {
                error!(error = %e, "cannot build provider client");
                None
            }
        },
        None => None,
    };
    let mut state = app::AppState::new(turn_tx);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;
    event::spawn_event_task(event_tx.clone());

    'event_loop: loop {
        tokio::select! {
            // Heartbeat: checks SIGTERM even when no other event arrives.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        // Exactly one draw() call per Render event.
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            error!(error = %e, "draw failed");
                            break 'event_loop;
                        }
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => keybindings::handle_key(key, &mut state),
                    Some(AppEvent::Mouse(mouse)) => keybindings::handle_mouse(mouse, &mut state),
                    Some(AppEvent::Tick) => {
                        state.tick();
                        KeyAction::Continue
                    }
                    Some(AppEvent::Turn { turn_id, update }) => {
                        state.apply_turn_update(&turn_id, update);
                        KeyAction::Continue
                    }
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(AppEvent::Quit) | None => KeyAction::Quit,
                };

                match action {
                    KeyAction::Quit => break 'event_loop,
                    KeyAction::Connect(api_key) => match start_worker(&settings, api_key, &event_tx) {
                        Ok(tx) => state.connect(tx),
                        Err(e) => {
                            error!(error = %e, "cannot build provider client");
                            state.setup_error = Some(format!("Could not start the client: {e}"));
                        }
                    },
                    KeyAction::Continue => {}
                }

                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tui::restore_tui()?;
    info!("biaslens stopped");
    Ok(())
}
