//! Latest-request-wins state for views that re-fetch on filter or tab change.
//!
//! Each fetch takes a ticket; only the response carrying the newest ticket
//! is applied, so a slow earlier request can no longer overwrite a newer one.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one fetch issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// A view's data slot guarded by a generation counter.
#[derive(Debug)]
pub struct ViewSlot<T> {
    name: &'static str,
    generation: AtomicU64,
    value: Mutex<Option<T>>,
}

impl<T: Clone> ViewSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: AtomicU64::new(0),
            value: Mutex::new(None),
        }
    }

    /// Starts a fetch, superseding every ticket issued before it.
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Stores `value` if `ticket` is still the latest. Returns whether it was applied.
    pub fn apply(&self, ticket: FetchTicket, value: T) -> bool {
        let Ok(mut slot) = self.value.lock() else {
            return false;
        };
        // checked under the lock so a newer apply cannot interleave
        if !self.is_current(ticket) {
            tracing::debug!(
                "[View] Dropping stale response for {} (ticket {:?})",
                self.name,
                ticket
            );
            return false;
        }
        *slot = Some(value);
        true
    }

    pub fn get(&self) -> Option<T> {
        self.value.lock().ok().and_then(|slot| slot.clone())
    }
}
