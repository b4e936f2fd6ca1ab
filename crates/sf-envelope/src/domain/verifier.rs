//! # Verification Stages
//!
//! Pure checks applied by the receiver, in this fixed order:
//!
//! | Stage | Failure |
//! |-------|---------|
//! | structure (lengths, payload size) | `MalformedEnvelope` |
//! | signature over `aad ‖ payload` | `BadSignature` |
//! | associated-data binding | `AadMismatch` / `MalformedEnvelope` |
//! | replay window (service layer) | `Replay` / `WindowUnderflow` |
//! | decryption | `UnknownKeyVersion` / `Tamper` |
//! | message id cross-check | `IdMismatch` |
//!
//! Signature precedes replay precedes decryption, so a party without the
//! signing key learns nothing from replay state or decryption timing.

use crate::domain::errors::RejectReason;
use sf_crypto::{Ed25519PublicKey, Ed25519Signature, SymmetricKey, TAG_LEN};
use sf_types::{AssociatedData, Envelope};
use subtle::ConstantTimeEq;

/// Reject payloads longer than the largest plaintext plus one tag.
pub fn check_payload_size(
    envelope: &Envelope,
    max_payload_bytes: usize,
) -> Result<(), RejectReason> {
    if envelope.payload.len() > max_payload_bytes.saturating_add(TAG_LEN) {
        return Err(RejectReason::MalformedEnvelope);
    }
    Ok(())
}

/// Verify the sender's signature over `associated_data ‖ payload`.
pub fn check_signature(envelope: &Envelope) -> Result<(), RejectReason> {
    let public_key = Ed25519PublicKey::from_bytes(*envelope.sender_public_key.as_bytes())
        .map_err(|_| RejectReason::BadSignature)?;
    let signature = Ed25519Signature::from_bytes(*envelope.signature.as_bytes());

    public_key
        .verify(&envelope.signed_message(), &signature)
        .map_err(|_| RejectReason::BadSignature)
}

/// Decode the signed associated data and require it to agree with the
/// envelope's transport fields.
pub fn check_binding(envelope: &Envelope) -> Result<AssociatedData, RejectReason> {
    let aad = envelope
        .decode_associated_data()
        .map_err(|_| RejectReason::MalformedEnvelope)?;

    if aad.topic != envelope.topic || aad.key_version != envelope.key_version {
        return Err(RejectReason::AadMismatch);
    }
    Ok(aad)
}

/// Recover the plaintext.
///
/// `key` is the resolved key for `envelope.key_version`; it is not consulted
/// for version 0.
pub fn open_payload(
    envelope: &Envelope,
    key: Option<&SymmetricKey>,
) -> Result<Vec<u8>, RejectReason> {
    if !envelope.is_encrypted() {
        return Ok(envelope.payload.clone());
    }
    let key = key.ok_or(RejectReason::UnknownKeyVersion)?;
    sf_crypto::decrypt(
        key,
        envelope.nonce.as_bytes(),
        &envelope.associated_data,
        &envelope.payload,
    )
    .map_err(|_| RejectReason::Tamper)
}

/// Compare the transmitted message id with the recomputed one in constant time.
pub fn check_message_id(envelope: &Envelope) -> Result<(), RejectReason> {
    let expected = envelope.computed_message_id();
    if bool::from(expected.as_bytes()[..].ct_eq(&envelope.message_id.as_bytes()[..])) {
        Ok(())
    } else {
        Err(RejectReason::IdMismatch)
    }
}
