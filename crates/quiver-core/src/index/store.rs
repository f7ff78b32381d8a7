use super::StoreStats;
use crate::action::{Action, ActionFields, ActionId, SourceKind};
use crate::utils::now_millis;
use std::collections::HashMap;
use tracing::debug;

/// Canonical set of candidate actions, keyed by a stable identifier.
///
/// Records are only ever appended, never removed, so an [`ActionId`] held by
/// a result list always refers to the same record. A key that disappears from
/// its source is deactivated instead and keeps its usage history until the
/// source comes back.
pub struct ActionStore {
    actions: Vec<Action>,
    by_key: HashMap<String, ActionId>,
    dirty: bool,
    /// Timestamp (ms) when usage data was last modified
    last_dirty_at: u64,
}

impl ActionStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            by_key: HashMap::new(),
            dirty: false,
            last_dirty_at: 0,
        }
    }

    /// Insert a new record or refresh the source-owned fields of an existing one.
    ///
    /// Mnemonic and last-used time of an existing record are left untouched.
    pub fn upsert(&mut self, key: &str, fields: ActionFields) -> ActionId {
        if let Some(&id) = self.by_key.get(key) {
            self.actions[id.0].refresh(fields);
            return id;
        }

        let id = ActionId(self.actions.len());
        self.actions.push(Action::new(key.to_string(), fields));
        self.by_key.insert(key.to_string(), id);
        debug!("Added action {}", key);
        id
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    #[must_use]
    pub fn find(&self, key: &str) -> Option<ActionId> {
        self.by_key.get(key).copied()
    }

    #[must_use]
    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    #[must_use]
    pub fn get_by_key(&self, key: &str) -> Option<&Action> {
        self.find(key).and_then(|id| self.get(id))
    }

    /// Mark a single record inactive. Returns true if it was active.
    pub fn deactivate(&mut self, id: ActionId) -> bool {
        match self.actions.get_mut(id.0) {
            Some(action) if action.active => {
                action.active = false;
                true
            }
            _ => false,
        }
    }

    /// Deactivate every active record for which `is_missing` returns true.
    /// Returns the number of records deactivated.
    pub fn deactivate_if_stale<F>(&mut self, mut is_missing: F) -> usize
    where
        F: FnMut(&Action) -> bool,
    {
        let mut count = 0;
        for action in &mut self.actions {
            if action.active && is_missing(action) {
                action.active = false;
                count += 1;
            }
        }
        if count > 0 {
            debug!("Deactivated {} actions", count);
        }
        count
    }

    /// Read-only traversal over every record, active or not.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(ActionId, &Action),
    {
        for (i, action) in self.actions.iter().enumerate() {
            visitor(ActionId(i), action);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &Action)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, action)| (ActionId(i), action))
    }

    /// Record a confirmed selection on an action.
    pub fn record_usage(&mut self, id: ActionId, mnemonic: &str, timestamp: u64) -> bool {
        let Some(action) = self.actions.get_mut(id.0) else {
            return false;
        };
        action.mnemonic = mnemonic.to_string();
        action.last_used = timestamp;
        debug!(
            "Recorded usage: {} (mnemonic={:?})",
            action.key, action.mnemonic
        );
        self.mark_dirty();
        true
    }

    /// Restore persisted usage for `key`. Returns false if the key is unknown.
    pub fn restore_usage(&mut self, key: &str, mnemonic: &str, last_used: u64) -> bool {
        let Some(id) = self.find(key) else {
            return false;
        };
        let action = &mut self.actions[id.0];
        action.mnemonic = mnemonic.to_string();
        action.last_used = last_used;
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.actions.iter().filter(|a| a.active).count()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn last_dirty_at(&self) -> u64 {
        self.last_dirty_at
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.last_dirty_at = now_millis();
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats {
            total: self.actions.len(),
            ..StoreStats::default()
        };
        for action in self.actions.iter().filter(|a| a.active) {
            stats.active += 1;
            match action.source_kind() {
                SourceKind::DesktopEntry => stats.desktop_entries += 1,
                SourceKind::Command => stats.commands += 1,
                SourceKind::Builtin => stats.builtins += 1,
            }
            if !action.mnemonic.is_empty() {
                stats.with_mnemonic += 1;
            }
        }
        stats
    }
}

impl Default for ActionStore {
    fn default() -> Self {
        Self::new()
    }
}
