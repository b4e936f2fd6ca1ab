//! # End-to-End Envelope Flow
//!
//! Sender builds, receiver verifies, with and without encryption.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, keyring};
    use sf_crypto::hashing::message_id;
    use sf_envelope::{EnvelopeBuildApi, EnvelopeDraft, EnvelopeVerifyApi, RejectReason};
    use sf_types::{AadExtra, Envelope, RawEnvelope};

    #[test]
    fn test_hello_plaintext_roundtrip() {
        let keys = keyring();
        let sender = fixtures::sender(1, keys.clone());
        let receiver = fixtures::receiver(keys);

        let envelope = fixtures::build(&sender, "demo.messages", b"Hello from JavaScript!", 0);
        assert_eq!(envelope.sequence_number, 1);
        assert_eq!(envelope.payload, b"Hello from JavaScript!");

        let expected_id = message_id(
            envelope.sender_public_key.as_bytes(),
            1,
            envelope.nonce.as_bytes(),
        );
        assert_eq!(envelope.message_id.as_bytes(), &expected_id);

        let accepted = receiver.verify_envelope(&envelope).unwrap();
        assert_eq!(accepted.plaintext, b"Hello from JavaScript!");
        assert_eq!(accepted.message_id, envelope.message_id);
        assert_eq!(accepted.sender, sender.public_key());
    }

    #[test]
    fn test_message_id_independent_of_payload() {
        let keys = keyring();
        let sender = fixtures::sender(1, keys);
        let envelope = fixtures::build(&sender, "demo.messages", b"one payload", 0);

        let mut other = envelope.clone();
        other.payload = b"entirely different".to_vec();
        assert_eq!(other.computed_message_id(), envelope.message_id);
    }

    #[test]
    fn test_flipped_payload_fails_at_signature() {
        let keys = keyring();
        let sender = fixtures::sender(1, keys.clone());
        let receiver = fixtures::receiver(keys);

        let mut envelope = fixtures::build(&sender, "demo.messages", b"Hello from JavaScript!", 0);
        envelope.payload[3] ^= 0x20;

        let rejection = receiver.verify_envelope(&envelope).unwrap_err();
        assert_eq!(rejection.reason, RejectReason::BadSignature);
        // Nothing was recorded for the sender.
        assert_eq!(receiver.replay_store().stats().checked, 0);
    }

    #[test]
    fn test_encrypted_roundtrip_with_extra_aad() {
        let keys = keyring();
        let sender = fixtures::sender(2, keys.clone());
        let receiver = fixtures::receiver(keys);

        let extra = AadExtra::default()
            .with_tenant_id("acme")
            .with_content_type("application/json");
        let draft =
            EnvelopeDraft::plaintext("orders.eu", br#"{"order": 42}"#, &extra).with_key_version(2);
        let envelope = sender.build_envelope(&draft).unwrap();
        assert!(envelope.is_encrypted());
        assert_ne!(envelope.payload, br#"{"order": 42}"#);

        let accepted = receiver.verify_envelope(&envelope).unwrap();
        assert_eq!(accepted.plaintext, br#"{"order": 42}"#);
        assert_eq!(accepted.associated_data.tenant_id.as_deref(), Some("acme"));
        assert_eq!(
            accepted.associated_data.content_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn test_json_wire_roundtrip() {
        let keys = keyring();
        let sender = fixtures::sender(3, keys.clone());
        let receiver = fixtures::receiver(keys);

        let envelope = fixtures::build(&sender, "wire", b"over the wire", 1);
        let json = serde_json::to_string(&envelope).unwrap();
        let decoded: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, envelope);

        let raw: RawEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(receiver.verify_raw(raw).unwrap().plaintext, b"over the wire");
    }

    #[test]
    fn test_sequence_of_messages_all_accepted_once() {
        let keys = keyring();
        let sender = fixtures::sender(4, keys.clone());
        let receiver = fixtures::receiver(keys);

        let envelopes: Vec<Envelope> = (0..100)
            .map(|i| fixtures::build(&sender, "stream", format!("m{i}").as_bytes(), 1))
            .collect();
        for (i, envelope) in envelopes.iter().enumerate() {
            let accepted = receiver.verify_envelope(envelope).unwrap();
            assert_eq!(accepted.sequence_number, i as u64 + 1);
        }
        for envelope in &envelopes[36..] {
            assert_eq!(
                receiver.verify_envelope(envelope).unwrap_err().reason,
                RejectReason::Replay
            );
        }
        assert_eq!(
            receiver.verify_envelope(&envelopes[0]).unwrap_err().reason,
            RejectReason::WindowUnderflow
        );
    }
}
