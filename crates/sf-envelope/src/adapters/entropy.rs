//! # Nonce Sources
//!
//! - [`OsNonceSource`]: 24 bytes straight from the OS CSPRNG
//! - [`CounterNonceSource`]: `be_u64(counter) ‖ 16 random bytes`
//!
//! Counter prefixes never repeat within one process; the random suffix
//! separates processes that restart the counter from the same value.

use crate::ports::outbound::{EntropyError, NonceSource};
use sf_crypto::NONCE_LEN;
use sf_types::EnvelopeNonce;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::error;

fn random_into(buf: &mut [u8]) -> Result<(), EntropyError> {
    sf_crypto::fill_random(buf).map_err(|_| {
        error!("OS random source failed; refusing to generate nonce");
        EntropyError
    })
}

/// Fully random nonces.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn next_nonce(&self) -> Result<EnvelopeNonce, EntropyError> {
        let mut nonce = [0u8; NONCE_LEN];
        random_into(&mut nonce)?;
        Ok(EnvelopeNonce::from_bytes(nonce))
    }
}

/// Monotonic counter prefix plus random suffix.
#[derive(Debug, Default)]
pub struct CounterNonceSource {
    counter: AtomicU64,
}

impl CounterNonceSource {
    /// Counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter resuming at `start`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }

    /// Nonces issued so far (plus the starting offset).
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl NonceSource for CounterNonceSource {
    fn next_nonce(&self) -> Result<EnvelopeNonce, EntropyError> {
        let mut nonce = [0u8; NONCE_LEN];
        random_into(&mut nonce[8..])?;
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        nonce[..8].copy_from_slice(&count.to_be_bytes());
        Ok(EnvelopeNonce::from_bytes(nonce))
    }
}
