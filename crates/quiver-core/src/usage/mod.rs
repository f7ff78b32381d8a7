//! Usage memory: learned mnemonics and last-used times.
//!
//! Only actions with a non-empty mnemonic are persisted. On load, entries are
//! matched against the current store by key; keys that no longer exist are
//! dropped silently.

use crate::Result;
use crate::action::ActionId;
use crate::index::ActionStore;
use crate::utils::{first_word, now_millis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

const USAGE_VERSION: u32 = 1;

/// Persisted usage for one action key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    pub mnemonic: String,
    #[serde(default)]
    pub last_used: u64,
}

/// On-disk usage file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(rename = "savedAt", default)]
    pub saved_at: u64,
    #[serde(default)]
    pub entries: BTreeMap<String, UsageEntry>,
}

fn default_version() -> u32 {
    USAGE_VERSION
}

/// Record a confirmed selection: the first word of `query` becomes the
/// action's mnemonic and `timestamp` its last use.
pub fn record_selection(store: &mut ActionStore, id: ActionId, query: &str, timestamp: u64) -> bool {
    store.record_usage(id, first_word(query), timestamp)
}

/// Snapshot the usage of every action that has a mnemonic.
#[must_use]
pub fn snapshot(store: &ActionStore) -> UsageFile {
    let entries = store
        .iter()
        .filter(|(_, action)| !action.mnemonic.is_empty())
        .map(|(_, action)| {
            (
                action.key.clone(),
                UsageEntry {
                    mnemonic: action.mnemonic.clone(),
                    last_used: action.last_used,
                },
            )
        })
        .collect();

    UsageFile {
        version: USAGE_VERSION,
        saved_at: now_millis(),
        entries,
    }
}

/// Write usage to `path`, replacing the previous file atomically.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn save(store: &mut ActionStore, path: &Path) -> Result<()> {
    write_file(&snapshot(store), path)?;
    store.mark_clean();
    Ok(())
}

/// Write a snapshot taken earlier with [`snapshot`].
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_file(usage: &UsageFile, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(usage)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;

    debug!("Saved usage for {} actions", usage.entries.len());
    Ok(())
}

/// Save only when usage changed since the last save or load.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_if_dirty(store: &mut ActionStore, path: &Path) -> Result<bool> {
    if !store.is_dirty() {
        return Ok(false);
    }
    save(store, path)?;
    Ok(true)
}

/// Restore persisted usage into `store`. Returns how many keys were restored.
///
/// A missing or corrupt file restores nothing.
///
/// # Errors
///
/// Returns an error only if an existing file cannot be read.
pub fn load(store: &mut ActionStore, path: &Path) -> Result<usize> {
    if !path.exists() {
        debug!("Usage file not found at {}", path.display());
        return Ok(0);
    }

    let content = std::fs::read_to_string(path)?;
    let usage: UsageFile = match serde_json::from_str(&content) {
        Ok(usage) => usage,
        Err(e) => {
            warn!(
                "Failed to parse usage file: {} (at line {}, column {})",
                e,
                e.line(),
                e.column()
            );
            return Ok(0);
        }
    };

    Ok(apply(store, &usage))
}

/// Apply a usage snapshot to the store, skipping unknown keys.
pub fn apply(store: &mut ActionStore, usage: &UsageFile) -> usize {
    let mut restored = 0;
    for (key, entry) in &usage.entries {
        if store.restore_usage(key, &entry.mnemonic, entry.last_used) {
            restored += 1;
        } else {
            debug!("Dropping usage for unknown key {}", key);
        }
    }
    info!(
        "Restored usage for {} of {} actions",
        restored,
        usage.entries.len()
    );
    restored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionFields, Builtin};

    #[test]
    fn test_record_selection_uses_first_word() {
        let mut store = ActionStore::new();
        let id = store.upsert(Builtin::Quit.key(), ActionFields::builtin(Builtin::Quit));
        assert!(record_selection(&mut store, id, "qu now", 5));
        let action = store.get(id).unwrap();
        assert_eq!(action.mnemonic, "qu");
        assert_eq!(action.last_used, 5);
    }

    #[test]
    fn test_snapshot_skips_actions_without_mnemonic() {
        let mut store = ActionStore::new();
        let quit = store.upsert(Builtin::Quit.key(), ActionFields::builtin(Builtin::Quit));
        store.upsert(Builtin::Refresh.key(), ActionFields::builtin(Builtin::Refresh));
        store.record_usage(quit, "q", 10);

        let usage = snapshot(&store);
        assert_eq!(usage.entries.len(), 1);
        assert_eq!(usage.entries["quit quiver"].mnemonic, "q");
    }

    #[test]
    fn test_usage_file_format() {
        let json = r#"{"version":1,"savedAt":3,"entries":{"cmd:top":{"mnemonic":"to","lastUsed":9}}}"#;
        let usage: UsageFile = serde_json::from_str(json).unwrap();
        assert_eq!(usage.saved_at, 3);
        assert_eq!(usage.entries["cmd:top"].last_used, 9);
    }

    #[test]
    fn test_save_if_dirty_skips_clean_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("usage.json");
        let mut store = ActionStore::new();
        assert!(!save_if_dirty(&mut store, &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_marks_clean() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("usage.json");
        let mut store = ActionStore::new();
        let id = store.upsert(Builtin::Quit.key(), ActionFields::builtin(Builtin::Quit));
        store.record_usage(id, "q", 1);

        assert!(save_if_dirty(&mut store, &path).unwrap());
        assert!(!store.is_dirty());
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
