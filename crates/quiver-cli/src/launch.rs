//! Runs confirmed selections.

use anyhow::{Context, Result};
use quiver_core::config::Config;
use quiver_core::sources::commands;
use quiver_core::{Builtin, Invocation, Launcher};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use tracing::{debug, info};

/// What the caller should do after an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Something was started; a one-shot launcher is done.
    Launched,
    /// Stay open (settings or command list opened for editing).
    Continue,
    /// Sources should be rescanned.
    Refresh,
    Quit,
}

/// Carry out a confirmed selection.
pub fn handle(invocation: &Invocation, launcher: &Launcher, config_path: &Path) -> Result<Outcome> {
    if let Some(command_line) = invocation.command_line() {
        spawn_shell(&command_line)?;
        return Ok(Outcome::Launched);
    }

    let Some(builtin) = invocation.builtin() else {
        return Ok(Outcome::Continue);
    };

    match builtin {
        Builtin::Quit => Ok(Outcome::Quit),
        Builtin::Settings => {
            if !config_path.exists() {
                launcher
                    .config()
                    .save(config_path)
                    .with_context(|| format!("Failed to write {}", config_path.display()))?;
            }
            open_in_editor(config_path, launcher.config())?;
            Ok(Outcome::Continue)
        }
        Builtin::Commands => {
            let path = &launcher.dirs().commands_file;
            commands::write_template(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            open_in_editor(path, launcher.config())?;
            Ok(Outcome::Continue)
        }
        Builtin::Refresh => {
            launcher.invalidate_commands();
            Ok(Outcome::Refresh)
        }
    }
}

/// Start `command_line` through `sh -c`, detached from the terminal.
pub fn spawn_shell(command_line: &str) -> Result<()> {
    info!("Running: {}", command_line);
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    let child = detached(&mut command)
        .spawn()
        .with_context(|| format!("Failed to run {command_line:?}"))?;
    reap(child);
    Ok(())
}

/// Open a file with the configured editor, or the first opener that starts.
fn open_in_editor(path: &Path, config: &Config) -> Result<()> {
    if let Some(editor) = config.editor.as_deref().filter(|e| !e.trim().is_empty()) {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(format!("{editor} \"$1\""))
            .arg("sh")
            .arg(path);
        let child = detached(&mut command)
            .spawn()
            .with_context(|| format!("Failed to start editor {editor:?}"))?;
        reap(child);
        return Ok(());
    }

    let fallbacks: [&[&str]; 3] = [
        &["xdg-open"],
        &["x-terminal-emulator", "-e", "editor"],
        &["xterm", "-e", "vi"],
    ];
    for argv in fallbacks {
        let mut command = Command::new(argv[0]);
        command.args(&argv[1..]).arg(path);
        match detached(&mut command).spawn() {
            Ok(child) => {
                debug!("Opened {} with {}", path.display(), argv[0]);
                reap(child);
                return Ok(());
            }
            Err(e) => debug!("{} unavailable: {}", argv[0], e),
        }
    }

    anyhow::bail!(
        "No editor found for {}; set \"editor\" in config.json",
        path.display()
    )
}

fn detached(command: &mut Command) -> &mut Command {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
}

/// Wait for the child in the background so it does not linger as a zombie
/// while the prompt stays open.
fn reap(mut child: Child) {
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            debug!("Failed to wait for child: {}", e);
        }
    });
}
