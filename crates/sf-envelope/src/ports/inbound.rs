//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of the envelope core.

use crate::domain::entities::{EnvelopeDraft, VerifyOutcome};
use crate::domain::errors::BuildError;
use sf_replay::ReplayVerdict;
use sf_types::{Envelope, RawEnvelope, SenderPublicKey};

/// Envelope construction for one sender identity.
///
/// Implementations serialize builds internally, so concurrent callers never
/// receive the same sequence number.
pub trait EnvelopeBuildApi: Send + Sync {
    /// Build the next envelope for `draft`.
    ///
    /// # Errors
    /// * `BuildError::Size` - payload over the configured limit
    /// * `BuildError::Key` - no symmetric key for `draft.key_version`
    /// * `BuildError::Entropy` - nonce generation failed (fatal)
    /// * `BuildError::SequenceExhausted` - counter reached `u64::MAX`
    fn build_envelope(&self, draft: &EnvelopeDraft<'_>) -> Result<Envelope, BuildError>;

    /// Identity envelopes are signed with.
    fn public_key(&self) -> SenderPublicKey;

    /// Sequence number the next successful build will carry.
    fn next_sequence(&self) -> Result<u64, BuildError>;
}

/// Envelope verification across all senders.
pub trait EnvelopeVerifyApi: Send + Sync {
    /// Verify one envelope, updating the sender's replay window on acceptance.
    fn verify_envelope(&self, envelope: &Envelope) -> VerifyOutcome;

    /// Structurally validate a wire envelope, then verify it.
    fn verify_raw(&self, raw: RawEnvelope) -> VerifyOutcome;

    /// Verify many envelopes in parallel; results keep input order.
    fn verify_batch(&self, envelopes: &[Envelope]) -> Vec<VerifyOutcome>;

    /// Check-and-record `seq` for `sender` without any cryptography.
    fn check_replay(&self, sender: &SenderPublicKey, seq: u64) -> ReplayVerdict;
}
