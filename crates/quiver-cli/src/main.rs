//! Quiver launcher CLI
//!
//! - Default: interactive prompt in the terminal
//! - Subcommands for one-shot search, run and inspection

mod cli;
mod colors;
mod launch;
mod prompt;
mod render;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use launch::Outcome;
use quiver_core::config::{Config, Directories};
use quiver_core::{Launcher, SourceKind};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Set up logging. The prompt owns the terminal, so it logs to a timestamped
/// file in the temp dir; one-shot commands log to stderr.
fn setup_logging(to_file: bool, debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else if to_file {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quiver={level}")));

    if !to_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
        return;
    }

    let temp_dir = std::env::temp_dir();
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("quiver-{timestamp}.log");
    let log_path = temp_dir.join(&log_filename);

    let symlink_path = temp_dir.join("quiver.log");
    let _ = std::fs::remove_file(&symlink_path);
    let _ = std::os::unix::fs::symlink(&log_path, &symlink_path);

    let file_appender = tracing_appender::rolling::never(&temp_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.command.is_none(), cli.debug);

    let dirs = Directories::new()?;
    dirs.ensure_exists()
        .context("Failed to create quiver directories")?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| dirs.config_file.clone());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let mut launcher = Launcher::new(config, dirs);
    launcher.start();

    let result = match cli.command {
        None => prompt::run(&mut launcher, &config_path, cli.keep_open).await,
        Some(Commands::Search { query }) => {
            search(&mut launcher, &query.join(" "));
            Ok(())
        }
        Some(Commands::Run { query }) => run(&mut launcher, &query.join(" "), &config_path),
        Some(Commands::List) => {
            list(&launcher);
            Ok(())
        }
        Some(Commands::Stats) => {
            stats(&launcher);
            Ok(())
        }
    };

    if let Err(e) = launcher.save_usage() {
        warn!("Failed to save usage: {}", e);
    }
    info!("Quiver exiting");

    result
}

fn search(launcher: &mut Launcher, query: &str) {
    launcher.set_query(query);
    let results = launcher.results();
    if results.is_empty() {
        println!("No match for {:?}", launcher.query());
        return;
    }

    for entry in results {
        if entry.match_hint.is_empty() {
            println!("{:>14}  {}", entry.score, entry.display_name);
        } else {
            println!(
                "{:>14}  {}  ({})",
                entry.score, entry.display_name, entry.match_hint
            );
        }
    }
}

fn run(launcher: &mut Launcher, query: &str, config_path: &Path) -> Result<()> {
    launcher.set_query(query);
    let typed = launcher.query().to_string();
    let Some(invocation) = launcher.confirm() else {
        bail!("No match for {typed:?}");
    };

    println!("{}", invocation.display_name);
    if launch::handle(&invocation, launcher, config_path)? == Outcome::Refresh {
        let report = launcher.refresh_blocking();
        println!(
            "{} added, {} reloaded, {} deactivated",
            report.added, report.reloaded, report.deactivated
        );
    }
    Ok(())
}

fn list(launcher: &Launcher) {
    let store = launcher.store().read();
    let mut actions: Vec<_> = store
        .iter()
        .map(|(_, action)| action)
        .filter(|action| action.active)
        .collect();
    actions.sort_by_key(|action| action.display_name.to_lowercase());

    for action in actions {
        let kind = match action.source_kind() {
            SourceKind::DesktopEntry => "app",
            SourceKind::Command => "cmd",
            SourceKind::Builtin => "builtin",
        };
        let mnemonic = if action.mnemonic.is_empty() {
            String::new()
        } else {
            format!("  [{}]", action.mnemonic)
        };
        println!("{kind:<8} {}{mnemonic}", action.display_name);
    }
}

fn stats(launcher: &Launcher) {
    let stats = launcher.stats();
    println!("Actions:          {} ({} active)", stats.total, stats.active);
    println!("Desktop entries:  {}", stats.desktop_entries);
    println!("Commands:         {}", stats.commands);
    println!("Built-ins:        {}", stats.builtins);
    println!("With mnemonic:    {}", stats.with_mnemonic);
}
