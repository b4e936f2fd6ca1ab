//! # Envelope Builder
//!
//! Pure construction of an envelope from a draft, a fresh nonce and an
//! assigned sequence number.
//!
//! ## Steps
//!
//! 1. Serialize associated data canonically from `{topic, key_version, extra}`
//! 2. Encrypt the payload when `key_version != 0`
//! 3. Sign `associated_data ‖ payload_as_transmitted`
//! 4. Compute the message id from `(public_key, seq, nonce)`
//!
//! Nonce generation and counter bookkeeping live in the sender service.

use crate::domain::config::EnvelopeConfig;
use crate::domain::entities::EnvelopeDraft;
use crate::domain::errors::BuildError;
use sf_crypto::{Ed25519KeyPair, SymmetricKey};
use sf_types::{
    AssociatedData, Envelope, EnvelopeNonce, EnvelopeSignature, MessageId, SenderPublicKey,
};

/// Seals drafts into envelopes.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    max_payload_bytes: usize,
}

impl EnvelopeBuilder {
    /// Builder applying `config`'s payload limit.
    pub fn new(config: &EnvelopeConfig) -> Self {
        Self {
            max_payload_bytes: config.max_payload_bytes,
        }
    }

    /// Seal `draft` for `sequence_number` under `nonce`.
    ///
    /// `key` must be the symmetric key for `draft.key_version` and is ignored
    /// when the version is 0. The caller guarantees `nonce` was never used
    /// with `keypair` before.
    pub fn seal(
        &self,
        keypair: &Ed25519KeyPair,
        draft: &EnvelopeDraft<'_>,
        sequence_number: u64,
        nonce: EnvelopeNonce,
        key: Option<&SymmetricKey>,
    ) -> Result<Envelope, BuildError> {
        if draft.payload.len() > self.max_payload_bytes {
            return Err(BuildError::Size {
                size: draft.payload.len(),
                max: self.max_payload_bytes,
            });
        }
        if sequence_number == 0 {
            return Err(BuildError::InvalidSequence(0));
        }

        let associated_data =
            AssociatedData::with_extra(draft.topic, draft.key_version, draft.extra)
                .to_canonical_bytes()
                .map_err(|e| BuildError::AssociatedData(e.to_string()))?;

        let payload = if draft.key_version == 0 {
            draft.payload.to_vec()
        } else {
            let key = key.ok_or_else(|| {
                BuildError::Key(format!("no symmetric key for version {}", draft.key_version))
            })?;
            sf_crypto::encrypt(key, nonce.as_bytes(), &associated_data, draft.payload)
                .map_err(|e| BuildError::Encryption(e.to_string()))?
        };

        let signature = keypair.sign_parts(&[associated_data.as_slice(), payload.as_slice()]);
        let sender_public_key = SenderPublicKey::from_bytes(*keypair.public_key().as_bytes());
        let message_id = MessageId::compute(&sender_public_key, sequence_number, &nonce);

        Ok(Envelope {
            sender_public_key,
            signature: EnvelopeSignature::from_bytes(*signature.as_bytes()),
            nonce,
            associated_data,
            payload,
            sequence_number,
            message_id,
            key_version: draft.key_version,
            topic: draft.topic.to_string(),
        })
    }
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self::new(&EnvelopeConfig::default())
    }
}
