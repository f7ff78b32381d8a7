mod refresh;

use crate::Result;
use crate::action::{ActionId, Invocation};
use crate::config::{Config, Directories};
use crate::index::{ActionStore, SharedStore, StoreStats, shared};
use crate::platform::DesktopEnvironment;
use crate::search::ResultList;
use crate::sources::{ReconcileOptions, ReconcileReport, Reconciler, register_builtins};
use crate::usage;
use crate::utils::now_millis;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What the UI should show for the current input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// Nothing typed yet.
    Welcome,
    /// Input present but no action matches.
    NoMatch,
    Selected {
        name: String,
        icon: String,
        index: usize,
        total: usize,
    },
}

/// One row of the ranked result list with its display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub id: ActionId,
    pub key: String,
    pub display_name: String,
    pub match_hint: String,
    pub icon_ref: String,
    pub score: u64,
    pub selected: bool,
}

/// Drives the per-keystroke cycle: input editing, ranking, selection,
/// confirmation and background reconciliation.
pub struct Launcher {
    dirs: Directories,
    config: Config,
    store: SharedStore,
    reconciler: Arc<Mutex<Reconciler>>,
    commands_stale: Arc<AtomicBool>,
    refreshing: Arc<AtomicBool>,
    query: String,
    results: ResultList,
}

impl Launcher {
    /// Create a launcher for the given configuration, detecting the current
    /// desktop session. The store starts with only the built-ins; call
    /// [`Launcher::start`] to populate it.
    #[must_use]
    pub fn new(config: Config, dirs: Directories) -> Self {
        let options = ReconcileOptions::from_config(&config, &dirs);
        let desktop = DesktopEnvironment::detect();
        debug!("Desktop session: {:?}", desktop.names());
        let reconciler = Reconciler::new(options, desktop);
        Self::with_reconciler(config, dirs, reconciler)
    }

    #[must_use]
    pub fn with_reconciler(config: Config, dirs: Directories, reconciler: Reconciler) -> Self {
        let mut store = ActionStore::new();
        register_builtins(&mut store);

        Self {
            dirs,
            config,
            store: shared(store),
            commands_stale: reconciler.commands_stale_flag(),
            reconciler: Arc::new(Mutex::new(reconciler)),
            refreshing: Arc::new(AtomicBool::new(false)),
            query: String::new(),
            results: ResultList::new(),
        }
    }

    /// Load `config.json` from `dirs` and create a launcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load(dirs: Directories) -> Result<Self> {
        let config = Config::load(&dirs.config_file)?;
        Ok(Self::new(config, dirs))
    }

    /// Populate the store from all sources, then restore usage memory.
    pub fn start(&mut self) -> ReconcileReport {
        let report = self.refresh_blocking();
        self.load_usage();
        let stats = self.stats();
        info!(
            "Indexed {} actions ({} desktop entries, {} commands)",
            stats.active, stats.desktop_entries, stats.commands
        );
        report
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn dirs(&self) -> &Directories {
        &self.dirs
    }

    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Append a character. Returns false if it was rejected: input is full,
    /// a leading space, or a control character.
    pub fn push_char(&mut self, c: char) -> bool {
        if c.is_control()
            || (self.query.is_empty() && c == ' ')
            || self.query.chars().count() >= self.config.input.max_length
        {
            return false;
        }
        self.query.push(c);
        self.refilter();
        true
    }

    /// Remove the last character. Returns false if the input was empty.
    pub fn pop_char(&mut self) -> bool {
        if self.query.pop().is_none() {
            return false;
        }
        self.refilter();
        true
    }

    pub fn clear_input(&mut self) {
        self.query.clear();
        self.results.clear();
    }

    /// Replace the whole input, applying the same rules as typing it.
    pub fn set_query(&mut self, query: &str) {
        self.clear_input();
        for c in query.chars() {
            self.push_char(c);
        }
    }

    pub fn select_next(&mut self) {
        self.results.select_next();
    }

    pub fn select_previous(&mut self) {
        self.results.select_previous();
    }

    #[must_use]
    pub fn selection(&self) -> usize {
        self.results.selection()
    }

    #[must_use]
    pub fn display(&self) -> DisplayState {
        if self.query.is_empty() {
            return DisplayState::Welcome;
        }
        let Some(selected) = self.results.selected() else {
            return DisplayState::NoMatch;
        };
        let store = self.store.read();
        match store.get(selected.id) {
            Some(action) => DisplayState::Selected {
                name: action.display_name.clone(),
                icon: action.icon_ref.clone(),
                index: self.results.selection(),
                total: self.results.len(),
            },
            None => DisplayState::NoMatch,
        }
    }

    /// The ranked result list for the current input.
    #[must_use]
    pub fn results(&self) -> Vec<RankedEntry> {
        let store = self.store.read();
        let selection = self.results.selection();
        self.results
            .items()
            .iter()
            .enumerate()
            .filter_map(|(index, ranked)| {
                store.get(ranked.id).map(|action| RankedEntry {
                    id: ranked.id,
                    key: action.key.clone(),
                    display_name: action.display_name.clone(),
                    match_hint: action.match_hint.clone(),
                    icon_ref: action.icon_ref.clone(),
                    score: ranked.score,
                    selected: index == selection,
                })
            })
            .collect()
    }

    /// Confirm the current selection: remember the mnemonic, hand back what
    /// to run and clear the input. `None` if nothing is selected or the
    /// selection was deactivated since the last ranking.
    pub fn confirm(&mut self) -> Option<Invocation> {
        let selected = *self.results.selected()?;

        let invocation = {
            let mut store = self.store.write();
            let invocation = store
                .get(selected.id)
                .filter(|action| action.active)
                .map(|action| Invocation {
                    key: action.key.clone(),
                    display_name: action.display_name.clone(),
                    runner: action.runner.clone(),
                    query: self.query.clone(),
                });
            if invocation.is_some() {
                usage::record_selection(&mut store, selected.id, &self.query, now_millis());
            }
            invocation
        };

        let Some(invocation) = invocation else {
            debug!("Selected action was deactivated, re-ranking");
            self.rerank();
            return None;
        };

        info!("Confirmed {} for {:?}", invocation.key, invocation.query);
        self.clear_input();
        Some(invocation)
    }

    /// Re-rank after the store changed underneath, keeping the selected
    /// action selected if it still matches.
    pub fn rerank(&mut self) {
        let previous = self.results.selected().map(|r| r.id);
        self.refilter();
        if let Some(previous) = previous {
            let position = self.results.items().iter().position(|r| r.id == previous);
            for _ in 0..position.unwrap_or(0) {
                self.results.select_next();
            }
        }
    }

    fn refilter(&mut self) {
        let store = self.store.read();
        self.results.refilter(&store, &self.query);
    }

    /// Reconcile on the calling thread and re-rank.
    pub fn refresh_blocking(&mut self) -> ReconcileReport {
        let report = self.reconciler.lock().reconcile(&self.store);
        self.rerank();
        report
    }

    /// Reconcile on the blocking thread pool. Returns `None` if a refresh is
    /// already running. Must be called within a tokio runtime.
    pub fn spawn_refresh(&self) -> Option<JoinHandle<ReconcileReport>> {
        refresh::spawn(
            Arc::clone(&self.store),
            Arc::clone(&self.reconciler),
            Arc::clone(&self.refreshing),
        )
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Reparse the command list on the next refresh even if unchanged.
    ///
    /// Never waits for a refresh in flight; a pass that has already synced
    /// commands leaves the request for the next one.
    pub fn invalidate_commands(&self) {
        self.commands_stale.store(true, Ordering::Release);
    }

    /// Restore persisted usage. Failures are logged and leave usage empty.
    pub fn load_usage(&mut self) -> usize {
        let restored = {
            let mut store = self.store.write();
            match usage::load(&mut store, &self.dirs.usage_file) {
                Ok(restored) => restored,
                Err(e) => {
                    warn!("Failed to load usage: {}", e);
                    0
                }
            }
        };
        if restored > 0 {
            self.rerank();
        }
        restored
    }

    /// Persist usage if it changed. Returns true if the file was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the usage file cannot be written.
    pub fn save_usage(&self) -> Result<bool> {
        let snapshot = {
            let store = self.store.read();
            if !store.is_dirty() {
                return Ok(false);
            }
            usage::snapshot(&store)
        };
        usage::write_file(&snapshot, &self.dirs.usage_file)?;
        self.store.write().mark_clean();
        Ok(true)
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        self.store.read().stats()
    }
}
