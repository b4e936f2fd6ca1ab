//! # SF Crypto - Envelope Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `aead` | XChaCha20-Poly1305 | Payload encryption with associated data |
//! | `signatures` | Ed25519 | Envelope signing |
//! | `hashing` | BLAKE3 | Message identifiers, key fingerprints |
//!
//! ## Security Properties
//!
//! - **XChaCha20**: 192-bit nonce, constant-time, side-channel immune
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - **BLAKE3**: Fixed 256-bit output, explicit little-endian encoding of integers
//!
//! All functions here are pure and hold no shared mutable state; they may be
//! called from any number of threads at once.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aead;
pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use aead::{
    decrypt, decrypt_detached, encrypt, encrypt_detached, SymmetricKey, KEY_LEN, NONCE_LEN,
    TAG_LEN,
};
pub use errors::CryptoError;
pub use hashing::{blake3_hash, fingerprint, message_id, Blake3Hasher, Hash};
pub use signatures::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, PUBLIC_KEY_LEN, SECRET_KEY_LEN,
    SIGNATURE_LEN,
};

use rand::{rngs::OsRng, RngCore};

/// Fill `buf` from the operating system CSPRNG.
///
/// There is no fallback source; failure is reported as `EntropyUnavailable`.
pub fn fill_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|_| CryptoError::EntropyUnavailable)
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
