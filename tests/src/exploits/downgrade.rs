//! # Key-Version Downgrade
//!
//! The relay rewrites `key_version` so the receiver treats ciphertext as
//! plaintext, or points it at an older key epoch.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, keyring};
    use sf_envelope::{EnvelopeVerifyApi, RejectReason};

    #[test]
    fn test_downgrade_to_unencrypted_rejected() {
        let keys = keyring();
        let sender = fixtures::sender(40, keys.clone());
        let receiver = fixtures::receiver(keys);

        let mut envelope = fixtures::build(&sender, "secrets", b"launch codes", 2);
        envelope.key_version = 0;
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::AadMismatch
        );
    }

    #[test]
    fn test_switch_to_other_epoch_rejected() {
        let keys = keyring();
        let sender = fixtures::sender(41, keys.clone());
        let receiver = fixtures::receiver(keys);

        let mut envelope = fixtures::build(&sender, "secrets", b"rotate me", 2);
        envelope.key_version = 1;
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::AadMismatch
        );
    }

    #[test]
    fn test_upgrade_of_plaintext_rejected() {
        let keys = keyring();
        let sender = fixtures::sender(42, keys.clone());
        let receiver = fixtures::receiver(keys);

        let mut envelope = fixtures::build(&sender, "public", b"hello", 0);
        envelope.key_version = 1;
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::AadMismatch
        );
    }

    #[test]
    fn test_retired_key_version() {
        let keys = keyring();
        let sender = fixtures::sender(43, keys.clone());
        let envelope = fixtures::build(&sender, "t", b"old epoch", 1);

        keys.remove(1);
        let receiver = fixtures::receiver(keys);
        assert_eq!(
            receiver.verify_envelope(&envelope).unwrap_err().reason,
            RejectReason::UnknownKeyVersion
        );
    }
}
