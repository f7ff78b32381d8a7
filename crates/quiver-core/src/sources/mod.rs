//! External sources of actions.
//!
//! Two collaborators feed the store: directories of desktop entries and the
//! user's command list. Parsing lives in [`desktop`] and [`commands`]; the
//! [`Reconciler`] brings the store in line with both.

pub mod commands;
pub mod desktop;
mod reconcile;

pub use commands::CommandEntry;
pub use desktop::LauncherRecord;
pub use reconcile::{ReconcileOptions, ReconcileReport, Reconciler};

use crate::action::{ActionFields, Builtin};
use crate::index::ActionStore;

/// Insert the launcher's own functions. Safe to call repeatedly.
pub fn register_builtins(store: &mut ActionStore) {
    for builtin in Builtin::ALL {
        store.upsert(builtin.key(), ActionFields::builtin(builtin));
    }
}
