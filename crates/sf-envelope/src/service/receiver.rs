//! # Envelope Receiver
//!
//! Runs the verification stages against the replay store and keyring.
//!
//! The sender's window lock is taken at the replay check and released only
//! after the window is marked, so two verifications of the same sequence
//! number from one sender can never both be accepted. Other senders are not
//! blocked.

use crate::domain::config::EnvelopeConfig;
use crate::domain::entities::{Accepted, VerifyOutcome};
use crate::domain::errors::{ConfigError, RejectReason, Rejection};
use crate::domain::verifier;
use crate::ports::inbound::EnvelopeVerifyApi;
use crate::ports::outbound::{ReplayStore, SymmetricKeyProvider};
use rayon::prelude::*;
use sf_replay::{InMemoryReplayStore, ReplayVerdict};
use sf_telemetry::{log_envelope_event, metrics};
use sf_types::{Envelope, RawEnvelope, SenderPublicKey};

const COMPONENT: &str = "verifier";

/// Envelope verification service.
pub struct EnvelopeReceiver<K: SymmetricKeyProvider, R: ReplayStore> {
    keys: K,
    replay: R,
    config: EnvelopeConfig,
}

impl<K: SymmetricKeyProvider> EnvelopeReceiver<K, InMemoryReplayStore> {
    /// Receiver with an in-memory replay store sized from `config`.
    pub fn with_default_store(keys: K, config: EnvelopeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let replay = InMemoryReplayStore::new(config.replay_window_width).map_err(|_| {
            ConfigError::InvalidWindowWidth {
                width: config.replay_window_width,
                max: sf_replay::MAX_WINDOW_WIDTH,
            }
        })?;
        Ok(Self {
            keys,
            replay,
            config,
        })
    }
}

impl<K: SymmetricKeyProvider, R: ReplayStore> EnvelopeReceiver<K, R> {
    /// Create a receiver over an existing replay store.
    ///
    /// The store's own window width applies; `config.replay_window_width` is
    /// only validated.
    pub fn new(keys: K, replay: R, config: EnvelopeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            keys,
            replay,
            config,
        })
    }

    /// Access the replay store.
    pub fn replay_store(&self) -> &R {
        &self.replay
    }

    /// Access the configuration.
    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    fn run_stages(&self, envelope: &Envelope) -> Result<Accepted, RejectReason> {
        verifier::check_payload_size(envelope, self.config.max_payload_bytes)?;
        verifier::check_signature(envelope)?;
        let associated_data = verifier::check_binding(envelope)?;

        let handle = self.replay.window(&envelope.sender_public_key);
        let mut window = handle.lock();

        let verdict = window.check(envelope.sequence_number);
        if let Some(reason) = RejectReason::from_verdict(verdict) {
            self.replay.record(verdict);
            return Err(reason);
        }

        let key = if envelope.is_encrypted() {
            Some(
                self.keys
                    .key(envelope.key_version)
                    .map_err(|_| RejectReason::UnknownKeyVersion)?,
            )
        } else {
            None
        };
        let plaintext = verifier::open_payload(envelope, key.as_deref())?;

        if self.config.verify_message_id {
            verifier::check_message_id(envelope)?;
        }

        window.mark(envelope.sequence_number);
        drop(window);
        self.replay.record(ReplayVerdict::Accept);

        Ok(Accepted {
            plaintext,
            message_id: envelope.message_id,
            sender: envelope.sender_public_key,
            sequence_number: envelope.sequence_number,
            topic: envelope.topic.clone(),
            associated_data,
        })
    }
}

impl<K: SymmetricKeyProvider, R: ReplayStore> EnvelopeVerifyApi for EnvelopeReceiver<K, R> {
    fn verify_envelope(&self, envelope: &Envelope) -> VerifyOutcome {
        let _timer = metrics::verify_timer();
        let fingerprint = envelope.sender_public_key.fingerprint();

        let outcome = match self.run_stages(envelope) {
            Ok(accepted) => {
                metrics::record_verification(None);
                log_envelope_event!(
                    debug,
                    COMPONENT,
                    "Envelope accepted",
                    fingerprint,
                    envelope.sequence_number,
                    topic = %envelope.topic
                );
                Ok(accepted)
            }
            Err(reason) => {
                metrics::record_verification(Some(reason.label()));
                log_envelope_event!(
                    warn,
                    COMPONENT,
                    "Envelope rejected",
                    fingerprint,
                    envelope.sequence_number,
                    reason = reason.label()
                );
                Err(Rejection::new(
                    reason,
                    envelope.sender_public_key,
                    envelope.sequence_number,
                ))
            }
        };

        metrics::set_windows_tracked(self.replay.tracked());
        outcome
    }

    fn verify_raw(&self, raw: RawEnvelope) -> VerifyOutcome {
        let sender = SenderPublicKey::from_slice(&raw.pubkey).ok();
        let sequence_number = raw.seq;

        match Envelope::try_from(raw) {
            Ok(envelope) => self.verify_envelope(&envelope),
            Err(err) => {
                let reason = RejectReason::MalformedEnvelope;
                metrics::record_verification(Some(reason.label()));
                log_envelope_event!(
                    warn,
                    COMPONENT,
                    "Malformed envelope",
                    sender.map(|pk| pk.fingerprint()).unwrap_or_default(),
                    sequence_number,
                    error = %err
                );
                Err(Rejection {
                    reason,
                    sender,
                    sequence_number,
                })
            }
        }
    }

    fn verify_batch(&self, envelopes: &[Envelope]) -> Vec<VerifyOutcome> {
        envelopes
            .par_iter()
            .map(|envelope| self.verify_envelope(envelope))
            .collect()
    }

    fn check_replay(&self, sender: &SenderPublicKey, seq: u64) -> ReplayVerdict {
        self.replay.check(sender, seq)
    }
}
