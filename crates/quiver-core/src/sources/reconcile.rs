use super::commands;
use super::desktop::{self, LauncherRecord};
use crate::action::{ActionId, SourceKind};
use crate::config::{Config, Directories};
use crate::index::SharedStore;
use crate::platform::DesktopEnvironment;
use crate::utils::mtime_millis;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Where to look for actions and how to turn them into records.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub application_dirs: Vec<PathBuf>,
    pub commands_file: PathBuf,
    pub match_executable: bool,
    pub show_icons: bool,
}

impl ReconcileOptions {
    #[must_use]
    pub fn from_config(config: &Config, dirs: &Directories) -> Self {
        Self {
            application_dirs: config.sources.resolved_application_dirs(),
            commands_file: dirs.commands_file.clone(),
            match_executable: config.sources.match_executable,
            show_icons: config.icons.show,
        }
    }
}

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Desktop entries seen for the first time.
    pub added: usize,
    /// Known desktop entries whose file changed and were reparsed.
    pub reloaded: usize,
    /// Desktop entries deactivated because their file went away or is now hidden.
    pub deactivated: usize,
    /// Desktop files found but not shown (hidden, `NoDisplay`, other desktop).
    pub filtered: usize,
    /// Whether the command list was reparsed.
    pub commands_reloaded: bool,
    /// Entries in the command list after a reparse.
    pub commands: usize,
}

impl ReconcileReport {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.added > 0 || self.reloaded > 0 || self.deactivated > 0 || self.commands_reloaded
    }
}

/// Keeps the store in agreement with desktop entry directories and the
/// command list.
///
/// Filesystem work happens without holding the store lock; the lock is only
/// taken briefly to read keys and to apply the results.
pub struct Reconciler {
    options: ReconcileOptions,
    desktop: DesktopEnvironment,
    commands_mtime: Option<u64>,
    /// Set when the command list must be reparsed regardless of its mtime.
    /// Shared so it can be raised while a pass holds the reconciler.
    commands_stale: Arc<AtomicBool>,
}

impl Reconciler {
    #[must_use]
    pub fn new(options: ReconcileOptions, desktop: DesktopEnvironment) -> Self {
        Self {
            options,
            desktop,
            commands_mtime: None,
            commands_stale: Arc::new(AtomicBool::new(true)),
        }
    }

    #[must_use]
    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Force the next pass to reparse the command list.
    pub fn invalidate_commands(&self) {
        self.commands_stale.store(true, Ordering::Release);
    }

    /// Flag that forces a command list reparse, settable without locking
    /// the reconciler.
    #[must_use]
    pub fn commands_stale_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.commands_stale)
    }

    /// Run one full pass: staleness check, directory scan, command list.
    pub fn reconcile(&mut self, store: &SharedStore) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        self.refresh_stale(store, &mut report);
        self.scan_directories(store, &mut report);
        self.sync_commands(store, &mut report);

        if report.changed() {
            info!(
                "Reconciled: {} added, {} reloaded, {} deactivated, commands reloaded: {}",
                report.added, report.reloaded, report.deactivated, report.commands_reloaded
            );
        } else {
            debug!("Reconciled: no changes");
        }
        report
    }

    /// Stat the backing file of every desktop-entry action. Missing files
    /// deactivate their action; changed files are reparsed.
    fn refresh_stale(&self, store: &SharedStore, report: &mut ReconcileReport) {
        let backed: Vec<(ActionId, PathBuf, u64, bool)> = {
            let store = store.read();
            store
                .iter()
                .filter_map(|(id, action)| {
                    action
                        .runner
                        .desktop_file()
                        .map(|path| (id, path.clone(), action.source_time, action.active))
                })
                .collect()
        };

        let mut missing = HashSet::new();
        let mut reloads: Vec<(ActionId, Option<LauncherRecord>)> = Vec::new();
        for (id, path, source_time, active) in backed {
            match mtime_millis(&path) {
                None => {
                    if active {
                        debug!("Backing file gone: {}", path.display());
                        missing.insert(path);
                    }
                }
                Some(mtime) if mtime != source_time || !active => {
                    reloads.push((id, desktop::load(&path, &self.desktop)));
                }
                Some(_) => {}
            }
        }

        if missing.is_empty() && reloads.is_empty() {
            return;
        }

        let mut store = store.write();
        report.deactivated += store.deactivate_if_stale(|action| {
            action
                .runner
                .desktop_file()
                .is_some_and(|path| missing.contains(path))
        });

        for (id, record) in reloads {
            match record {
                Some(record) if record.is_visible() => {
                    store.upsert(
                        &record.key(),
                        record.to_fields(self.options.match_executable, self.options.show_icons),
                    );
                    report.reloaded += 1;
                }
                _ => {
                    if store.deactivate(id) {
                        report.deactivated += 1;
                    }
                }
            }
        }
    }

    /// Add desktop files not yet in the store. Files that are hidden or not
    /// shown in this session are never inserted.
    fn scan_directories(&self, store: &SharedStore, report: &mut ReconcileReport) {
        let mut candidates = Vec::new();
        for dir in &self.options.application_dirs {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("Skipping application dir {}: {}", dir.display(), e);
                    continue;
                }
            };
            candidates.extend(
                entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|path| desktop::is_desktop_file(path) && path.is_file()),
            );
        }
        candidates.sort();

        let unknown: Vec<PathBuf> = {
            let store = store.read();
            candidates
                .into_iter()
                .filter(|path| !store.contains(&path.to_string_lossy()))
                .collect()
        };
        if unknown.is_empty() {
            return;
        }

        let parsed: Vec<LauncherRecord> = unknown
            .iter()
            .filter_map(|path| desktop::load(path, &self.desktop))
            .collect();

        let mut store = store.write();
        for record in parsed {
            if record.is_visible() {
                store.upsert(
                    &record.key(),
                    record.to_fields(self.options.match_executable, self.options.show_icons),
                );
                report.added += 1;
            } else {
                debug!("Not shown: {}", record.path.display());
                report.filtered += 1;
            }
        }
    }

    /// Reparse the command list if its modification time changed or a reparse
    /// was requested.
    fn sync_commands(&mut self, store: &SharedStore, report: &mut ReconcileReport) {
        let path = &self.options.commands_file;
        let mtime = mtime_millis(path);
        let forced = self.commands_stale.swap(false, Ordering::AcqRel);
        if !forced && mtime == self.commands_mtime {
            return;
        }

        let entries = if mtime.is_some() {
            commands::load(path)
        } else {
            Vec::new()
        };

        {
            let mut store = store.write();
            store.deactivate_if_stale(|action| action.source_kind() == SourceKind::Command);
            for entry in &entries {
                store.upsert(&entry.key(), entry.to_fields(self.options.show_icons));
            }
        }

        debug!("Loaded {} commands from {}", entries.len(), path.display());
        report.commands_reloaded = true;
        report.commands = entries.len();
        self.commands_mtime = mtime;
    }
}
