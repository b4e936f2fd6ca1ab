//! # Tampering
//!
//! Single-bit modifications of every envelope field, post-signing.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, keyring};
    use proptest::prelude::*;
    use sf_crypto::SymmetricKey;
    use sf_envelope::{EnvelopeVerifyApi, InMemoryKeyring, RejectReason};
    use sf_types::{EnvelopeNonce, EnvelopeSignature, MessageId, SenderPublicKey};
    use std::sync::Arc;

    fn flip(bytes: &mut [u8], bit: usize) {
        let bit = bit % (bytes.len() * 8);
        bytes[bit / 8] ^= 1 << (bit % 8);
    }

    #[test]
    fn test_signature_bit_flip() {
        let keys = keyring();
        let sender = fixtures::sender(20, keys.clone());
        let receiver = fixtures::receiver(keys);
        let mut envelope = fixtures::build(&sender, "t", b"payload", 1);

        let mut sig = *envelope.signature.as_bytes();
        flip(&mut sig, 200);
        envelope.signature = EnvelopeSignature::from_bytes(sig);
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::BadSignature
        );
    }

    #[test]
    fn test_public_key_swap_breaks_signature() {
        let keys = keyring();
        let sender = fixtures::sender(21, keys.clone());
        let receiver = fixtures::receiver(keys);
        let mut envelope = fixtures::build(&sender, "t", b"payload", 0);

        let mut pk = *envelope.sender_public_key.as_bytes();
        flip(&mut pk, 3);
        envelope.sender_public_key = SenderPublicKey::from_bytes(pk);
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::BadSignature
        );
    }

    #[test]
    fn test_nonce_flip_fails_decryption() {
        // The nonce is not signed, so only the AEAD stands between the
        // attacker and a garbled plaintext.
        let keys = keyring();
        let sender = fixtures::sender(22, keys.clone());
        let receiver = fixtures::receiver(keys);
        let honest = fixtures::build(&sender, "t", b"payload", 1);
        let mut envelope = honest.clone();

        let mut nonce = *envelope.nonce.as_bytes();
        flip(&mut nonce, 17);
        envelope.nonce = EnvelopeNonce::from_bytes(nonce);
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::Tamper
        );
        // The sequence number was not consumed by the forgery.
        assert!(receiver.verify_envelope(&honest).is_ok());
    }

    #[test]
    fn test_nonce_flip_on_plaintext_caught_by_id() {
        let keys = keyring();
        let sender = fixtures::sender(23, keys.clone());
        let receiver = fixtures::receiver(keys);
        let mut envelope = fixtures::build(&sender, "t", b"payload", 0);

        let mut nonce = *envelope.nonce.as_bytes();
        flip(&mut nonce, 0);
        envelope.nonce = EnvelopeNonce::from_bytes(nonce);
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::IdMismatch
        );
    }

    #[test]
    fn test_forged_message_id() {
        let keys = keyring();
        let sender = fixtures::sender(24, keys.clone());
        let receiver = fixtures::receiver(keys);
        let mut envelope = fixtures::build(&sender, "t", b"payload", 1);

        let mut id = *envelope.message_id.as_bytes();
        flip(&mut id, 255);
        envelope.message_id = MessageId::from_bytes(id);
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::IdMismatch
        );
    }

    #[test]
    fn test_wrong_key_for_version_is_tamper() {
        let keys = keyring();
        let sender = fixtures::sender(25, keys);
        let envelope = fixtures::build(&sender, "t", b"secret", 1);

        let impostor_keys = InMemoryKeyring::new();
        impostor_keys
            .insert(1, SymmetricKey::from_bytes([0x99; 32]))
            .unwrap();
        let receiver = fixtures::receiver(Arc::new(impostor_keys));
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::Tamper
        );
    }

    #[test]
    fn test_oversized_payload_rejected_before_signature() {
        let keys = keyring();
        let sender = fixtures::sender(26, keys.clone());
        let receiver = fixtures::receiver_with(
            keys,
            sf_envelope::EnvelopeConfig::default().with_max_payload_bytes(16),
        );
        let mut envelope = fixtures::build(&sender, "t", b"small", 0);
        envelope.payload = vec![0u8; 16 + sf_crypto::TAG_LEN + 1];
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::MalformedEnvelope
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_any_bit_of_payload_or_aad(
            payload in proptest::collection::vec(any::<u8>(), 1..128),
            bit in any::<usize>(),
            in_aad in any::<bool>(),
        ) {
            let keys = keyring();
            let sender = fixtures::sender(27, keys.clone());
            let receiver = fixtures::receiver(keys);
            let mut envelope = fixtures::build(&sender, "t", &payload, 1);

            if in_aad {
                flip(&mut envelope.associated_data, bit);
            } else {
                flip(&mut envelope.payload, bit);
            }
            let rejection = receiver.verify_envelope(&envelope).unwrap_err();
            prop_assert_eq!(rejection.reason, RejectReason::BadSignature);
        }
    }
}
