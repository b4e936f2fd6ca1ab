//! # Domain Entities
//!
//! Inputs to a build and outputs of a verification.

use crate::domain::errors::Rejection;
use sf_types::{AadExtra, AssociatedData, MessageId, SenderPublicKey};

/// What a sender wants to publish, before nonce and sequence number are
/// assigned.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeDraft<'a> {
    /// Logical channel
    pub topic: &'a str,
    /// Plaintext application message
    pub payload: &'a [u8],
    /// Symmetric key epoch; 0 sends the payload in the clear (still signed)
    pub key_version: u32,
    /// Optional associated-data fields
    pub extra: &'a AadExtra,
}

impl<'a> EnvelopeDraft<'a> {
    /// Unencrypted draft (key version 0) carrying `extra` in its associated data.
    pub fn plaintext(topic: &'a str, payload: &'a [u8], extra: &'a AadExtra) -> Self {
        Self {
            topic,
            payload,
            key_version: 0,
            extra,
        }
    }

    /// Set the key version.
    pub fn with_key_version(mut self, key_version: u32) -> Self {
        self.key_version = key_version;
        self
    }
}

/// A verified envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Decrypted application message
    pub plaintext: Vec<u8>,
    /// Message id (cross-checked unless disabled)
    pub message_id: MessageId,
    /// Authenticated sender
    pub sender: SenderPublicKey,
    /// Sender sequence number
    pub sequence_number: u64,
    /// Topic bound by the signature
    pub topic: String,
    /// Decoded associated data
    pub associated_data: AssociatedData,
}

/// Result of verifying one envelope.
pub type VerifyOutcome = Result<Accepted, Rejection>;
