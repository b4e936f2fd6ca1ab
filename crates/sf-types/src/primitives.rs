//! # Fixed-Size Envelope Fields
//!
//! Newtypes for the byte fields of an envelope. A value of these types always
//! has the protocol length; wrong-length input is rejected by `from_slice`
//! and by deserialization.

use crate::errors::EnvelopeError;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use sf_crypto::{NONCE_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN};
use std::fmt;
use std::str::FromStr;

/// Message id length in bytes (BLAKE3-256).
pub const MESSAGE_ID_LEN: usize = 32;

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr, $field:literal) => {
        $(#[$meta])*
        #[serde_as]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(#[serde_as(as = "Hex")] [u8; $len]);

        impl $name {
            /// Length in bytes.
            pub const LEN: usize = $len;

            /// Wrap an array of the exact length.
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Copy from a slice, rejecting any other length.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
                let arr: [u8; $len] =
                    bytes.try_into().map_err(|_| EnvelopeError::Malformed {
                        field: $field,
                        expected: $len,
                        actual: bytes.len(),
                    })?;
                Ok(Self(arr))
            }

            /// Borrow the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Lowercase hex rendering.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

fixed_bytes!(
    /// Ed25519 public key of the signing sender (32 bytes).
    SenderPublicKey,
    PUBLIC_KEY_LEN,
    "sender_public_key"
);

fixed_bytes!(
    /// Ed25519 signature over `associated_data ‖ payload` (64 bytes).
    EnvelopeSignature,
    SIGNATURE_LEN,
    "signature"
);

fixed_bytes!(
    /// XChaCha20 nonce, unique per sender key (24 bytes).
    EnvelopeNonce,
    NONCE_LEN,
    "nonce"
);

impl SenderPublicKey {
    /// Log-safe short handle.
    pub fn fingerprint(&self) -> String {
        sf_crypto::fingerprint(&self.0)
    }
}

impl fmt::Debug for SenderPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SenderPublicKey({})", self.to_hex())
    }
}

impl fmt::Display for SenderPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for EnvelopeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnvelopeSignature({})", self.to_hex())
    }
}

impl fmt::Debug for EnvelopeNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnvelopeNonce({})", self.to_hex())
    }
}

/// Message identifier: BLAKE3(sender_public_key ‖ le_u64(seq) ‖ nonce).
///
/// Textual form is 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId([u8; MESSAGE_ID_LEN]);

impl MessageId {
    /// Compute the id for a sender, sequence number and nonce.
    pub fn compute(sender: &SenderPublicKey, sequence_number: u64, nonce: &EnvelopeNonce) -> Self {
        Self(sf_crypto::message_id(
            sender.as_bytes(),
            sequence_number,
            nonce.as_bytes(),
        ))
    }

    /// Wrap a raw digest.
    pub const fn from_bytes(bytes: [u8; MESSAGE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse the 64-character hex form.
    pub fn from_hex(s: &str) -> Result<Self, EnvelopeError> {
        if s.len() != MESSAGE_ID_LEN * 2 {
            return Err(EnvelopeError::InvalidMessageId);
        }
        let mut bytes = [0u8; MESSAGE_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| EnvelopeError::InvalidMessageId)?;
        Ok(Self(bytes))
    }

    /// Borrow the raw digest.
    pub fn as_bytes(&self) -> &[u8; MESSAGE_ID_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.to_hex())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for MessageId {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for MessageId {
    type Error = EnvelopeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.to_hex()
    }
}
