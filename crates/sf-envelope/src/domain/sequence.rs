//! # Sequence Counter
//!
//! Per-identity monotonic counter. Starts at 1, advances by exactly one per
//! successful build and never goes back. The owner serializes access; the
//! counter itself is not synchronized.

use crate::domain::errors::BuildError;

/// Next sequence number for one sender identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceCounter {
    // `None` once `u64::MAX` has been issued.
    next: Option<u64>,
}

impl SequenceCounter {
    /// Fresh counter starting at 1.
    pub fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Resume from a persisted position.
    pub fn starting_at(next: u64) -> Result<Self, BuildError> {
        if next == 0 {
            return Err(BuildError::InvalidSequence(0));
        }
        Ok(Self { next: Some(next) })
    }

    /// Sequence number the next build will use.
    pub fn peek(&self) -> Result<u64, BuildError> {
        self.next.ok_or(BuildError::SequenceExhausted)
    }

    /// Consume the current number after a successful build.
    pub fn advance(&mut self) {
        self.next = self.next.and_then(|n| n.checked_add(1));
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}
