//! # Envelope
//!
//! The signed, possibly encrypted unit exchanged between a sender and its
//! receivers.
//!
//! Two shapes exist:
//!
//! - [`RawEnvelope`] mirrors the transport schema: loosely typed byte vectors
//!   and a hex message id, exactly as decoded off the wire.
//! - [`Envelope`] is the validated record. Byte fields have their protocol
//!   lengths by construction; `TryFrom<RawEnvelope>` is the structural check.
//!
//! JSON for both is the wire shape with hex-encoded bytes.

use crate::aad::AssociatedData;
use crate::errors::EnvelopeError;
use crate::primitives::{EnvelopeNonce, EnvelopeSignature, MessageId, SenderPublicKey};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

/// Wire-shaped envelope as received from a transport.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEnvelope {
    /// Sender public key (32 bytes expected).
    #[serde_as(as = "Hex")]
    pub pubkey: Vec<u8>,
    /// Signature over `aad ‖ payload` (64 bytes expected).
    #[serde_as(as = "Hex")]
    pub sig: Vec<u8>,
    /// AEAD nonce (24 bytes expected).
    #[serde_as(as = "Hex")]
    pub nonce: Vec<u8>,
    /// Serialized associated data.
    #[serde_as(as = "Hex")]
    pub aad: Vec<u8>,
    /// Ciphertext, or plaintext when `key_version == 0`.
    #[serde_as(as = "Hex")]
    pub payload: Vec<u8>,
    /// Sender sequence number.
    pub seq: u64,
    /// Hex message id.
    pub msg_id: String,
    /// Symmetric key epoch.
    pub key_version: u32,
    /// Transport topic.
    pub topic: String,
}

/// Validated envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope", into = "RawEnvelope")]
pub struct Envelope {
    pub sender_public_key: SenderPublicKey,
    pub signature: EnvelopeSignature,
    pub nonce: EnvelopeNonce,
    pub associated_data: Vec<u8>,
    pub payload: Vec<u8>,
    pub sequence_number: u64,
    pub message_id: MessageId,
    pub key_version: u32,
    pub topic: String,
}

impl Envelope {
    /// Bytes covered by the signature: `associated_data ‖ payload`.
    pub fn signed_message(&self) -> Vec<u8> {
        let mut msg = Vec::with_capacity(self.associated_data.len() + self.payload.len());
        msg.extend_from_slice(&self.associated_data);
        msg.extend_from_slice(&self.payload);
        msg
    }

    /// Message id recomputed from this envelope's own fields.
    pub fn computed_message_id(&self) -> MessageId {
        MessageId::compute(&self.sender_public_key, self.sequence_number, &self.nonce)
    }

    /// Whether the payload is ciphertext.
    pub fn is_encrypted(&self) -> bool {
        self.key_version != 0
    }

    /// Decode the signed associated data.
    pub fn decode_associated_data(&self) -> Result<AssociatedData, EnvelopeError> {
        AssociatedData::parse(&self.associated_data)
    }
}

impl TryFrom<RawEnvelope> for Envelope {
    type Error = EnvelopeError;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        Ok(Self {
            sender_public_key: SenderPublicKey::from_slice(&raw.pubkey)?,
            signature: EnvelopeSignature::from_slice(&raw.sig)?,
            nonce: EnvelopeNonce::from_slice(&raw.nonce)?,
            message_id: MessageId::from_hex(&raw.msg_id)?,
            associated_data: raw.aad,
            payload: raw.payload,
            sequence_number: raw.seq,
            key_version: raw.key_version,
            topic: raw.topic,
        })
    }
}

impl From<Envelope> for RawEnvelope {
    fn from(env: Envelope) -> Self {
        Self {
            pubkey: env.sender_public_key.as_bytes().to_vec(),
            sig: env.signature.as_bytes().to_vec(),
            nonce: env.nonce.as_bytes().to_vec(),
            aad: env.associated_data,
            payload: env.payload,
            seq: env.sequence_number,
            msg_id: env.message_id.to_hex(),
            key_version: env.key_version,
            topic: env.topic,
        }
    }
}
