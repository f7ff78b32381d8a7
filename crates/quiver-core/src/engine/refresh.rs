use crate::index::SharedStore;
use crate::sources::{ReconcileReport, Reconciler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tracing::debug;

/// Clears the in-flight flag when the refresh finishes, even by panic.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub(super) fn spawn(
    store: SharedStore,
    reconciler: Arc<Mutex<Reconciler>>,
    in_flight: Arc<AtomicBool>,
) -> Option<JoinHandle<ReconcileReport>> {
    if in_flight
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        debug!("Refresh already running");
        return None;
    }

    let guard = InFlight(in_flight);
    Some(tokio::task::spawn_blocking(move || {
        let _guard = guard;
        reconciler.lock().reconcile(&store)
    }))
}
