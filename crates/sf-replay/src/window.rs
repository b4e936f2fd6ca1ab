//! # Replay Window
//!
//! Fixed-size sliding bitmap over the most recent `width` sequence numbers of
//! one sender.
//!
//! ```text
//!            base                       highest
//!             │<──────── width ────────>│
//! ... too old │ . x x . x x x . x x x x │ ahead (always fresh)
//! ```
//!
//! Slots are addressed by `seq % capacity`, so advancing the window only
//! clears the slots that newly enter it. Senders whose gaps exceed `width`
//! lose their old-but-valid messages; that is the price of bounded memory.

use crate::errors::ReplayError;

/// Default number of sequence numbers tracked behind the highest.
pub const DEFAULT_WINDOW_WIDTH: u32 = 64;

/// Largest supported window width.
pub const MAX_WINDOW_WIDTH: u32 = 65_536;

/// Outcome of checking a sequence number against a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplayVerdict {
    /// Fresh; accepting it is safe.
    Accept,
    /// Already accepted once.
    RejectDuplicate,
    /// Behind the trackable window (or zero).
    RejectTooOld,
}

impl ReplayVerdict {
    /// Whether the sequence number may be accepted.
    pub fn is_accept(self) -> bool {
        matches!(self, ReplayVerdict::Accept)
    }
}

/// Per-sender replay state.
#[derive(Debug, Clone)]
pub struct ReplayWindow {
    width: u64,
    highest: u64,
    bitmap: Vec<u64>,
}

impl ReplayWindow {
    /// Create an empty window tracking `width` sequence numbers.
    pub fn new(width: u32) -> Result<Self, ReplayError> {
        if width == 0 || width > MAX_WINDOW_WIDTH {
            return Err(ReplayError::InvalidWidth {
                width,
                max: MAX_WINDOW_WIDTH,
            });
        }
        let words = (width as usize).div_ceil(64);
        Ok(Self {
            width: u64::from(width),
            highest: 0,
            bitmap: vec![0u64; words],
        })
    }

    /// Window width.
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Highest sequence number accepted so far (0 if none).
    pub fn highest(&self) -> u64 {
        self.highest
    }

    /// Lowest sequence number still trackable.
    pub fn base(&self) -> u64 {
        (self.highest.saturating_sub(self.width) + 1).max(1)
    }

    /// Classify `seq` without changing the window.
    pub fn check(&self, seq: u64) -> ReplayVerdict {
        if seq == 0 {
            return ReplayVerdict::RejectTooOld;
        }
        if seq > self.highest {
            return ReplayVerdict::Accept;
        }
        if self.highest - seq >= self.width {
            return ReplayVerdict::RejectTooOld;
        }
        if self.is_set(seq) {
            ReplayVerdict::RejectDuplicate
        } else {
            ReplayVerdict::Accept
        }
    }

    /// Record `seq` as accepted.
    ///
    /// Call only after `check(seq)` returned `Accept`; sequence numbers outside
    /// the window are ignored.
    pub fn mark(&mut self, seq: u64) {
        if seq == 0 {
            return;
        }
        if seq > self.highest {
            self.advance_to(seq);
        } else if self.highest - seq >= self.width {
            return;
        }
        self.set(seq);
    }

    /// Check and, on `Accept`, record `seq` in one step.
    pub fn check_and_mark(&mut self, seq: u64) -> ReplayVerdict {
        let verdict = self.check(seq);
        if verdict.is_accept() {
            self.mark(seq);
        }
        verdict
    }

    fn capacity(&self) -> u64 {
        self.bitmap.len() as u64 * 64
    }

    fn slot(&self, seq: u64) -> (usize, u64) {
        let idx = seq % self.capacity();
        ((idx / 64) as usize, 1u64 << (idx % 64))
    }

    fn is_set(&self, seq: u64) -> bool {
        let (word, mask) = self.slot(seq);
        self.bitmap[word] & mask != 0
    }

    fn set(&mut self, seq: u64) {
        let (word, mask) = self.slot(seq);
        self.bitmap[word] |= mask;
    }

    fn clear(&mut self, seq: u64) {
        let (word, mask) = self.slot(seq);
        self.bitmap[word] &= !mask;
    }

    // Slots entering the window are cleared so stale bits from a previous lap
    // of the ring never read as "seen".
    fn advance_to(&mut self, seq: u64) {
        let shift = seq - self.highest;
        if shift >= self.capacity() {
            self.bitmap.fill(0);
        } else {
            for s in (self.highest + 1)..=seq {
                self.clear(s);
            }
        }
        self.highest = seq;
    }
}

impl Default for ReplayWindow {
    fn default() -> Self {
        Self {
            width: u64::from(DEFAULT_WINDOW_WIDTH),
            highest: 0,
            bitmap: vec![0u64; 1],
        }
    }
}
