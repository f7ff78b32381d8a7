//! Interactive raw-terminal prompt.

use crate::launch::{self, Outcome};
use crate::render;
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use quiver_core::Launcher;
use quiver_core::sources::ReconcileReport;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Interval between background rescans while the prompt is open.
const REFRESH_INTERVAL: Duration = Duration::from_secs(10);
const TICK: Duration = Duration::from_millis(250);

/// Result of handling one key.
enum KeyAction {
    Redraw,
    Ignore,
    Confirm,
    Quit,
}

fn map_key(launcher: &mut Launcher, key: KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('u') if ctrl => {
            launcher.clear_input();
            KeyAction::Redraw
        }
        KeyCode::Enter => KeyAction::Confirm,
        KeyCode::Backspace => {
            if launcher.pop_char() {
                KeyAction::Redraw
            } else {
                KeyAction::Ignore
            }
        }
        KeyCode::Up | KeyCode::Left | KeyCode::BackTab => {
            launcher.select_previous();
            KeyAction::Redraw
        }
        KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
            launcher.select_next();
            KeyAction::Redraw
        }
        KeyCode::Char(c) if !ctrl => {
            if launcher.push_char(c) {
                KeyAction::Redraw
            } else {
                KeyAction::Ignore
            }
        }
        _ => KeyAction::Ignore,
    }
}

/// Run the prompt until the user quits or launches something.
pub async fn run(launcher: &mut Launcher, config_path: &Path, keep_open: bool) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, launcher, config_path, keep_open).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    launcher: &mut Launcher,
    config_path: &Path,
    keep_open: bool,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);
    let mut pending: Option<JoinHandle<ReconcileReport>> = None;
    // Rescan requested while another pass was running
    let mut queued = false;
    let mut last_refresh = Instant::now();
    let mut status: Option<String> = None;
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal.draw(|f| render::draw(f, launcher, status.as_deref()))?;
            needs_render = false;
        }

        tokio::select! {
            _ = ticker.tick() => {
                if pending.as_ref().is_some_and(JoinHandle::is_finished) {
                    if let Some(handle) = pending.take() {
                        match handle.await {
                            Ok(report) => {
                                if report.changed() {
                                    launcher.rerank();
                                }
                                if !queued {
                                    status = None;
                                }
                                needs_render = true;
                            }
                            Err(e) => error!("Background refresh failed: {}", e),
                        }
                    }
                    last_refresh = Instant::now();
                }
                if pending.is_none() && (queued || last_refresh.elapsed() >= REFRESH_INTERVAL) {
                    pending = launcher.spawn_refresh();
                    queued = false;
                }
            }

            Some(event) = events.next() => {
                let key = match event {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                    Ok(Event::Resize(..)) => {
                        needs_render = true;
                        continue;
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        error!("Event stream error: {}", e);
                        continue;
                    }
                };

                debug!("Key: code={:?}, modifiers={:?}", key.code, key.modifiers);
                match map_key(launcher, key) {
                    KeyAction::Redraw => {
                        status = None;
                        needs_render = true;
                    }
                    KeyAction::Ignore => {}
                    KeyAction::Quit => break,
                    KeyAction::Confirm => {
                        let Some(invocation) = launcher.confirm() else {
                            continue;
                        };
                        needs_render = true;
                        if let Err(e) = launcher.save_usage() {
                            warn!("Failed to save usage: {}", e);
                        }
                        match launch::handle(&invocation, launcher, config_path) {
                            Ok(Outcome::Quit) => break,
                            Ok(Outcome::Launched) if !keep_open => break,
                            Ok(Outcome::Refresh) => {
                                if pending.is_none() {
                                    pending = launcher.spawn_refresh();
                                } else {
                                    queued = true;
                                }
                                status = Some("Rescanning...".to_string());
                            }
                            Ok(_) => status = None,
                            Err(e) => {
                                warn!("{:#}", e);
                                status = Some(format!("{e:#}"));
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
