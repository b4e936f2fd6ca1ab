//! # Concurrency
//!
//! Per-sender atomicity of the replay check, serialized sequence assignment,
//! and independence of unrelated senders.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, keyring};
    use rayon::prelude::*;
    use sf_envelope::{EnvelopeVerifyApi, RejectReason, ReplayStore};
    use sf_types::Envelope;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_same_envelope_accepted_exactly_once_across_threads() {
        let keys = keyring();
        let sender = fixtures::sender(1, keys.clone());
        let receiver = Arc::new(fixtures::receiver(keys));
        let envelope = Arc::new(fixtures::build(&sender, "race", b"only once", 1));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let receiver = Arc::clone(&receiver);
                let envelope = Arc::clone(&envelope);
                thread::spawn(move || receiver.verify_envelope(&envelope))
            })
            .collect();

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let accepted = outcomes.iter().filter(|o| o.is_ok()).count();
        assert_eq!(accepted, 1);
        for outcome in outcomes.iter().filter(|o| o.is_err()) {
            assert_eq!(outcome.as_ref().unwrap_err().reason, RejectReason::Replay);
        }
    }

    #[test]
    fn test_concurrent_builds_verify_cleanly() {
        let keys = keyring();
        let sender = Arc::new(fixtures::sender(2, keys.clone()));
        let receiver = fixtures::receiver(keys);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let sender = Arc::clone(&sender);
                thread::spawn(move || {
                    (0..16)
                        .map(|i| fixtures::build(&*sender, "t", format!("{t}-{i}").as_bytes(), 1))
                        .collect::<Vec<Envelope>>()
                })
            })
            .collect();
        let mut envelopes: Vec<Envelope> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        let seqs: HashSet<u64> = envelopes.iter().map(|e| e.sequence_number).collect();
        assert_eq!(seqs.len(), 64);
        let nonces: HashSet<_> = envelopes.iter().map(|e| e.nonce).collect();
        assert_eq!(nonces.len(), 64);

        // All 64 fit in one window, in any order.
        envelopes.reverse();
        let outcomes = receiver.verify_batch(&envelopes);
        assert!(outcomes.iter().all(|o| o.is_ok()));
    }

    #[test]
    fn test_unrelated_senders_in_parallel() {
        let keys = keyring();
        let receiver = fixtures::receiver(keys.clone());

        let senders: Vec<_> = (1..=32u8)
            .map(|seed| fixtures::sender(seed, keys.clone()))
            .collect();
        let envelopes: Vec<Envelope> = senders
            .iter()
            .flat_map(|s| (0..8).map(move |_| fixtures::build(s, "fleet", b"status", 0)))
            .collect();

        let accepted = envelopes
            .par_iter()
            .filter(|e| receiver.verify_envelope(e).is_ok())
            .count();
        assert_eq!(accepted, 32 * 8);
        assert_eq!(receiver.replay_store().tracked(), 32);

        let outcomes = receiver.verify_batch(&envelopes);
        assert!(outcomes
            .iter()
            .all(|o| o.as_ref().unwrap_err().reason == RejectReason::Replay));
    }
}
