//! # BLAKE3 Hashing
//!
//! Message identifiers and key fingerprints.
//!
//! ## Message identifier
//!
//! `id = BLAKE3(public_key ‖ le_u64(sequence_number) ‖ nonce)`
//!
//! The id does not depend on payload or associated data. Endianness is
//! explicit so every platform produces the same bytes.

use blake3::Hasher;

/// BLAKE3 hash output (256-bit).
pub type Hash = [u8; 32];

/// Stateful BLAKE3 hasher.
pub struct Blake3Hasher {
    inner: Hasher,
}

impl Blake3Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Hasher::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(&self) -> Hash {
        let hash = self.inner.finalize();
        *hash.as_bytes()
    }
}

impl Default for Blake3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with BLAKE3 (one-shot).
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Compute the message identifier for `(public_key, sequence_number, nonce)`.
pub fn message_id(public_key: &[u8; 32], sequence_number: u64, nonce: &[u8; 24]) -> Hash {
    let mut hasher = Blake3Hasher::new();
    hasher
        .update(public_key)
        .update(&sequence_number.to_le_bytes())
        .update(nonce);
    hasher.finalize()
}

/// Short, log-safe handle for a public key (first 8 bytes of its hash, hex).
pub fn fingerprint(public_key: &[u8; 32]) -> String {
    hex::encode(&blake3_hash(public_key)[..8])
}
