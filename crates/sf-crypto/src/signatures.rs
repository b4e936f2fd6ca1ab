//! # Ed25519 Signatures
//!
//! Twisted Edwards curve signatures with deterministic nonces.
//!
//! ## Security Properties
//!
//! - No RNG dependency when signing (deterministic nonce from message)
//! - Verification uses `verify_strict` (rejects small-order keys and
//!   non-canonical signatures)
//! - Wrong-length keys and signatures are rejected before any curve arithmetic

use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

/// Public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Secret seed length in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// Signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; PUBLIC_KEY_LEN]);

impl Ed25519PublicKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Result<Self, CryptoError> {
        // Validate it's a valid point
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Verify a signature.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);

        verifying_key
            .verify_strict(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 signature (64 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Signature([u8; SIGNATURE_LEN]);

impl Ed25519Signature {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, rejecting anything but 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let sig: [u8; SIGNATURE_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureFormat(bytes.len()))?;
        Ok(Self(sig))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

/// Ed25519 keypair.
///
/// `SigningKey` zeroizes its secret scalar on drop.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate a random keypair from the OS random source.
    ///
    /// Fails with `EntropyUnavailable` rather than falling back to a weaker source.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut seed = [0u8; SECRET_KEY_LEN];
        crate::fill_random(&mut seed)?;
        let pair = Self::from_seed(seed);
        zeroize::Zeroize::zeroize(&mut seed);
        Ok(pair)
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; SECRET_KEY_LEN]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Create from a seed slice, rejecting anything but 32 bytes.
    pub fn from_slice(seed: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; SECRET_KEY_LEN] =
            seed.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: SECRET_KEY_LEN,
                actual: seed.len(),
            })?;
        Ok(Self::from_seed(bytes))
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        let verifying_key = self.signing_key.verifying_key();
        Ed25519PublicKey(verifying_key.to_bytes())
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        let sig = self.signing_key.sign(message);
        Ed25519Signature(sig.to_bytes())
    }

    /// Sign the concatenation of several parts.
    pub fn sign_parts(&self, parts: &[&[u8]]) -> Ed25519Signature {
        self.sign(&parts.concat())
    }

    /// Get secret seed (for serialization).
    pub fn to_seed(&self) -> [u8; SECRET_KEY_LEN] {
        self.signing_key.to_bytes()
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &hex::encode(self.public_key().as_bytes()))
            .finish_non_exhaustive()
    }
}

/// Sign `message` with a raw 32-byte secret seed.
///
/// # Errors
///
/// `InvalidKeyLength` if `secret_key` is not 32 bytes.
pub fn sign(secret_key: &[u8], message: &[u8]) -> Result<[u8; SIGNATURE_LEN], CryptoError> {
    let pair = Ed25519KeyPair::from_slice(secret_key)?;
    Ok(*pair.sign(message).as_bytes())
}

/// Verify `signature` over `message` with a raw public key.
///
/// Returns `false` for wrong-length or undecodable inputs without touching
/// the curve.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(pk) = <[u8; PUBLIC_KEY_LEN]>::try_from(public_key) else {
        return false;
    };
    let Ok(sig) = Ed25519Signature::from_slice(signature) else {
        return false;
    };

    match Ed25519PublicKey::from_bytes(pk) {
        Ok(pk) => pk.verify(message, &sig).is_ok(),
        Err(_) => false,
    }
}
