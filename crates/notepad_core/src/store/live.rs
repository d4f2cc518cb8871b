//! Live-query subscriptions.
//!
//! Each subscription holds at most one pending snapshot: a newer snapshot
//! replaces an unread older one, so a slow reader costs one listing of memory
//! and a writer never waits on it.

use crate::model::note::Note;
use crate::repo::note_repo::NoteOrder;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct SlotState {
    pending: Option<Vec<Note>>,
    store_alive: bool,
    reader_alive: bool,
}

struct Slot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Store-side half of one subscription.
pub(super) struct Subscriber {
    pub(super) order: NoteOrder,
    slot: Arc<Slot>,
}

impl Subscriber {
    /// Replaces the pending snapshot. Returns `false` once the reader is gone.
    pub(super) fn push(&self, snapshot: Vec<Note>) -> bool {
        let mut state = self.slot.lock();
        if !state.reader_alive {
            return false;
        }
        state.pending = Some(snapshot);
        self.slot.ready.notify_all();
        true
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.slot.lock().store_alive = false;
        self.slot.ready.notify_all();
    }
}

/// Creates a connected subscriber/reader pair for `order`.
pub(super) fn channel(order: NoteOrder) -> (Subscriber, LiveNotes) {
    let slot = Arc::new(Slot {
        state: Mutex::new(SlotState {
            pending: None,
            store_alive: true,
            reader_alive: true,
        }),
        ready: Condvar::new(),
    });
    (
        Subscriber {
            order,
            slot: Arc::clone(&slot),
        },
        LiveNotes { order, slot },
    )
}

/// Continuously updated note listing.
///
/// The first snapshot is available right after subscribing. After every
/// successful insert, replace or delete the pending snapshot is replaced by a
/// fresh one; readers always see the newest state, and snapshots they read
/// follow write order. Dropping the value ends the subscription.
pub struct LiveNotes {
    order: NoteOrder,
    slot: Arc<Slot>,
}

impl LiveNotes {
    /// Ordering of every snapshot delivered on this subscription.
    pub fn order(&self) -> NoteOrder {
        self.order
    }

    /// Blocks until a snapshot is pending. Returns `None` once the store is
    /// gone and nothing is left to read.
    pub fn recv(&self) -> Option<Vec<Note>> {
        let state = self.slot.lock();
        let mut state = self
            .slot
            .ready
            .wait_while(state, |state| state.pending.is_none() && state.store_alive)
            .unwrap_or_else(PoisonError::into_inner);
        state.pending.take()
    }

    /// Waits up to `timeout` for a pending snapshot.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Vec<Note>> {
        let state = self.slot.lock();
        let (mut state, _) = self
            .slot
            .ready
            .wait_timeout_while(state, timeout, |state| {
                state.pending.is_none() && state.store_alive
            })
            .unwrap_or_else(PoisonError::into_inner);
        state.pending.take()
    }

    /// Takes the pending snapshot without waiting.
    pub fn try_recv(&self) -> Option<Vec<Note>> {
        self.slot.lock().pending.take()
    }

    /// Returns whether a snapshot is waiting to be read.
    pub fn has_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }
}

impl Drop for LiveNotes {
    fn drop(&mut self) {
        let mut state = self.slot.lock();
        state.reader_alive = false;
        state.pending = None;
    }
}

impl Iterator for LiveNotes {
    type Item = Vec<Note>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}
