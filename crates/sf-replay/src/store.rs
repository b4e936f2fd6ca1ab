//! # Replay Store
//!
//! Identity → window mapping with get-or-create semantics.
//!
//! Each sender's window carries its own lock. Unrelated senders never contend
//! beyond the brief map lookup; the map's write lock is taken only to insert a
//! new sender or evict one.

use crate::errors::ReplayError;
use crate::window::{ReplayVerdict, ReplayWindow, DEFAULT_WINDOW_WIDTH};
use parking_lot::{Mutex, RwLock};
use sf_types::SenderPublicKey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Shared handle to one sender's window.
pub type WindowHandle = Arc<Mutex<ReplayWindow>>;

/// Collaborator owning per-sender replay state.
///
/// Eviction policy belongs to the implementation; the verifier only needs
/// get-or-create lookup and an atomic check-and-update.
pub trait ReplayStore: Send + Sync {
    /// Window for `sender`, created empty on first use.
    fn window(&self, sender: &SenderPublicKey) -> WindowHandle;

    /// Atomically check `seq` and record it when fresh.
    fn check(&self, sender: &SenderPublicKey, seq: u64) -> ReplayVerdict {
        let handle = self.window(sender);
        let verdict = handle.lock().check_and_mark(seq);
        self.record(verdict);
        verdict
    }

    /// Forget a sender. Returns whether it was tracked.
    fn evict(&self, sender: &SenderPublicKey) -> bool;

    /// Number of senders currently tracked.
    fn tracked(&self) -> usize;

    /// Account for a final verdict reached outside [`ReplayStore::check`].
    fn record(&self, _verdict: ReplayVerdict) {}
}

impl<T: ReplayStore + ?Sized> ReplayStore for Arc<T> {
    fn window(&self, sender: &SenderPublicKey) -> WindowHandle {
        (**self).window(sender)
    }

    fn check(&self, sender: &SenderPublicKey, seq: u64) -> ReplayVerdict {
        (**self).check(sender, seq)
    }

    fn evict(&self, sender: &SenderPublicKey) -> bool {
        (**self).evict(sender)
    }

    fn tracked(&self) -> usize {
        (**self).tracked()
    }

    fn record(&self, verdict: ReplayVerdict) {
        (**self).record(verdict)
    }
}

/// Replay store statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStoreStats {
    /// Verdicts recorded
    pub checked: u64,
    /// Sequence numbers accepted
    pub accepted: u64,
    /// Duplicates rejected
    pub duplicates: u64,
    /// Rejected as behind the window
    pub too_old: u64,
    /// Senders tracked
    pub tracked: usize,
}

/// In-memory replay store.
pub struct InMemoryReplayStore {
    width: u32,
    windows: RwLock<HashMap<SenderPublicKey, WindowHandle>>,
    checked: AtomicU64,
    accepted: AtomicU64,
    duplicates: AtomicU64,
    too_old: AtomicU64,
}

impl InMemoryReplayStore {
    /// Create a store whose windows track `width` sequence numbers.
    pub fn new(width: u32) -> Result<Self, ReplayError> {
        // Validate once here so window creation below cannot fail.
        ReplayWindow::new(width)?;
        Ok(Self {
            width,
            windows: RwLock::new(HashMap::new()),
            checked: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            too_old: AtomicU64::new(0),
        })
    }

    /// Window width used for new senders.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Snapshot of counters.
    pub fn stats(&self) -> ReplayStoreStats {
        ReplayStoreStats {
            checked: self.checked.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            too_old: self.too_old.load(Ordering::Relaxed),
            tracked: self.tracked(),
        }
    }

    /// Drop every tracked sender.
    pub fn clear(&self) {
        self.windows.write().clear();
    }

    fn new_window(&self) -> ReplayWindow {
        ReplayWindow::new(self.width).unwrap_or_default()
    }
}

impl Default for InMemoryReplayStore {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            windows: RwLock::new(HashMap::new()),
            checked: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            too_old: AtomicU64::new(0),
        }
    }
}

impl ReplayStore for InMemoryReplayStore {
    fn window(&self, sender: &SenderPublicKey) -> WindowHandle {
        if let Some(handle) = self.windows.read().get(sender) {
            return Arc::clone(handle);
        }

        let mut windows = self.windows.write();
        // Another thread may have inserted between the two locks.
        let handle = windows.entry(*sender).or_insert_with(|| {
            debug!(sender = %sender.fingerprint(), width = self.width, "Tracking new sender");
            Arc::new(Mutex::new(self.new_window()))
        });
        Arc::clone(handle)
    }

    fn evict(&self, sender: &SenderPublicKey) -> bool {
        self.windows.write().remove(sender).is_some()
    }

    fn tracked(&self) -> usize {
        self.windows.read().len()
    }

    fn record(&self, verdict: ReplayVerdict) {
        self.checked.fetch_add(1, Ordering::Relaxed);
        let counter = match verdict {
            ReplayVerdict::Accept => &self.accepted,
            ReplayVerdict::RejectDuplicate => &self.duplicates,
            ReplayVerdict::RejectTooOld => &self.too_old,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
