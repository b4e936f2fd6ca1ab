//! # Envelope Errors
//!
//! Builder-side failures and verifier-side rejections.
//!
//! Rejections carry the sender public key (public) and the sequence number.
//! Nothing here ever renders key material, AEAD state or plaintext.

use sf_replay::ReplayVerdict;
use sf_types::SenderPublicKey;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while building an envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    /// Signing or symmetric key unusable (wrong length, unknown version)
    #[error("Key error: {0}")]
    Key(String),

    /// Payload larger than the configured maximum
    #[error("Payload of {size} bytes exceeds maximum of {max} bytes")]
    Size { size: usize, max: usize },

    /// Secure random source unavailable; never retried with a weaker source
    #[error("Entropy source unavailable")]
    Entropy,

    /// Sequence counter cannot advance past `u64::MAX`
    #[error("Sequence counter exhausted; rotate the signing key")]
    SequenceExhausted,

    /// Sequence numbers start at 1
    #[error("Invalid sequence number {0}: sequence numbers start at 1")]
    InvalidSequence(u64),

    /// Associated data could not be serialized
    #[error("Associated data: {0}")]
    AssociatedData(String),

    /// AEAD encryption failed
    #[error("Encryption failed: {0}")]
    Encryption(String),
}

impl BuildError {
    /// Stable metric label.
    pub fn label(&self) -> &'static str {
        match self {
            BuildError::Key(_) => "key",
            BuildError::Size { .. } => "size",
            BuildError::Entropy => "entropy",
            BuildError::SequenceExhausted => "sequence_exhausted",
            BuildError::InvalidSequence(_) => "invalid_sequence",
            BuildError::AssociatedData(_) => "associated_data",
            BuildError::Encryption(_) => "encryption",
        }
    }
}

/// Why an envelope was rejected.
///
/// Every rejection is terminal for that envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Wrong field length, oversized payload or unparsable associated data
    MalformedEnvelope,
    /// Signature does not verify over `associated_data ‖ payload`
    BadSignature,
    /// Signed associated data disagrees with the envelope's topic or key version
    AadMismatch,
    /// Sequence number already accepted
    Replay,
    /// Sequence number behind the replay window (or zero)
    WindowUnderflow,
    /// No symmetric key for the envelope's key version
    UnknownKeyVersion,
    /// AEAD authentication failed
    Tamper,
    /// Transmitted message id differs from the recomputed one
    IdMismatch,
}

impl RejectReason {
    /// Stable snake_case label for metrics and logs.
    pub fn label(self) -> &'static str {
        match self {
            RejectReason::MalformedEnvelope => "malformed_envelope",
            RejectReason::BadSignature => "bad_signature",
            RejectReason::AadMismatch => "aad_mismatch",
            RejectReason::Replay => "replay",
            RejectReason::WindowUnderflow => "window_underflow",
            RejectReason::UnknownKeyVersion => "unknown_key_version",
            RejectReason::Tamper => "tamper",
            RejectReason::IdMismatch => "id_mismatch",
        }
    }

    /// Reason for a non-accepting replay verdict.
    pub fn from_verdict(verdict: ReplayVerdict) -> Option<Self> {
        match verdict {
            ReplayVerdict::Accept => None,
            ReplayVerdict::RejectDuplicate => Some(RejectReason::Replay),
            ReplayVerdict::RejectTooOld => Some(RejectReason::WindowUnderflow),
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rejected envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Envelope rejected ({reason}): sender {}, seq {sequence_number}", sender_label(.sender))]
pub struct Rejection {
    /// Why it was rejected
    pub reason: RejectReason,
    /// Sender, when the public key field was well-formed
    pub sender: Option<SenderPublicKey>,
    /// Sequence number as transmitted
    pub sequence_number: u64,
}

impl Rejection {
    /// Rejection attributed to a known sender.
    pub fn new(reason: RejectReason, sender: SenderPublicKey, sequence_number: u64) -> Self {
        Self {
            reason,
            sender: Some(sender),
            sequence_number,
        }
    }

    /// Short sender handle for logs.
    pub fn sender_fingerprint(&self) -> String {
        self.sender
            .map(|s| s.fingerprint())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn sender_label(sender: &Option<SenderPublicKey>) -> String {
    match sender {
        Some(pk) => pk.to_hex(),
        None => "<malformed>".to_string(),
    }
}

/// Configuration rejected by `validate()`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Replay window width outside the supported range
    #[error("Invalid replay window width {width} (must be 1..={max})")]
    InvalidWindowWidth { width: u32, max: u32 },

    /// Maximum payload size must be positive
    #[error("max_payload_bytes must be at least 1")]
    ZeroPayloadLimit,

    /// Environment variable present but unparsable
    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}
