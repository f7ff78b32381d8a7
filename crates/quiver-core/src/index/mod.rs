mod store;

pub use store::ActionStore;

use parking_lot::RwLock;
use std::sync::Arc;

/// Store shared between the interactive path (read) and background
/// reconciliation (write).
pub type SharedStore = Arc<RwLock<ActionStore>>;

#[must_use]
pub fn shared(store: ActionStore) -> SharedStore {
    Arc::new(RwLock::new(store))
}

/// Counts reported by `ActionStore::stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total: usize,
    pub active: usize,
    pub desktop_entries: usize,
    pub commands: usize,
    pub builtins: usize,
    pub with_mnemonic: usize,
}
