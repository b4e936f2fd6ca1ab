//! # Envelope Sender
//!
//! Owns one signing identity and its sequence counter. The counter lock is
//! held for the whole build, so concurrent callers are serialized and each
//! successful build consumes exactly one sequence number.

use crate::domain::builder::EnvelopeBuilder;
use crate::domain::config::EnvelopeConfig;
use crate::domain::entities::EnvelopeDraft;
use crate::domain::errors::BuildError;
use crate::domain::sequence::SequenceCounter;
use crate::ports::inbound::EnvelopeBuildApi;
use crate::ports::outbound::{NonceSource, SymmetricKeyProvider};
use parking_lot::Mutex;
use sf_crypto::Ed25519KeyPair;
use sf_telemetry::{log_envelope_event, metrics};
use sf_types::{Envelope, SenderPublicKey};

const COMPONENT: &str = "builder";

/// Envelope construction service for one sender identity.
pub struct EnvelopeSender<N: NonceSource, K: SymmetricKeyProvider> {
    keypair: Ed25519KeyPair,
    public_key: SenderPublicKey,
    counter: Mutex<SequenceCounter>,
    nonces: N,
    keys: K,
    builder: EnvelopeBuilder,
}

impl<N: NonceSource, K: SymmetricKeyProvider> EnvelopeSender<N, K> {
    /// Create a sender whose first envelope carries sequence number 1.
    ///
    /// # Arguments
    /// * `keypair` - Signing identity
    /// * `nonces` - Nonce source; must never repeat for `keypair`
    /// * `keys` - Symmetric keys for encrypted drafts
    /// * `config` - Payload limit
    pub fn new(keypair: Ed25519KeyPair, nonces: N, keys: K, config: &EnvelopeConfig) -> Self {
        let public_key = SenderPublicKey::from_bytes(*keypair.public_key().as_bytes());
        Self {
            keypair,
            public_key,
            counter: Mutex::new(SequenceCounter::new()),
            nonces,
            keys,
            builder: EnvelopeBuilder::new(config),
        }
    }

    /// Create a sender from a 32-byte Ed25519 secret key.
    ///
    /// # Errors
    /// * `BuildError::Key` - secret key has the wrong length
    pub fn from_secret_key(
        secret_key: &[u8],
        nonces: N,
        keys: K,
        config: &EnvelopeConfig,
    ) -> Result<Self, BuildError> {
        let keypair =
            Ed25519KeyPair::from_slice(secret_key).map_err(|e| BuildError::Key(e.to_string()))?;
        Ok(Self::new(keypair, nonces, keys, config))
    }

    /// Replace the counter, e.g. to resume from a persisted position.
    pub fn with_counter(self, counter: SequenceCounter) -> Self {
        *self.counter.lock() = counter;
        self
    }

    /// Access the symmetric key provider.
    pub fn keys(&self) -> &K {
        &self.keys
    }

    fn build_locked(
        &self,
        counter: &SequenceCounter,
        draft: &EnvelopeDraft<'_>,
    ) -> Result<Envelope, BuildError> {
        let sequence_number = counter.peek()?;

        let key = if draft.key_version == 0 {
            None
        } else {
            Some(
                self.keys
                    .key(draft.key_version)
                    .map_err(|e| BuildError::Key(e.to_string()))?,
            )
        };

        let nonce = self.nonces.next_nonce().map_err(|_| {
            log_envelope_event!(
                error,
                COMPONENT,
                "Entropy source failed; envelope not built",
                self.public_key.fingerprint(),
                sequence_number
            );
            BuildError::Entropy
        })?;

        self.builder
            .seal(&self.keypair, draft, sequence_number, nonce, key.as_deref())
    }
}

impl<N: NonceSource, K: SymmetricKeyProvider> EnvelopeBuildApi for EnvelopeSender<N, K> {
    fn build_envelope(&self, draft: &EnvelopeDraft<'_>) -> Result<Envelope, BuildError> {
        let mut counter = self.counter.lock();

        match self.build_locked(&counter, draft) {
            Ok(envelope) => {
                counter.advance();
                metrics::record_built();
                log_envelope_event!(
                    debug,
                    COMPONENT,
                    "Envelope built",
                    self.public_key.fingerprint(),
                    envelope.sequence_number,
                    topic = %envelope.topic,
                    key_version = envelope.key_version
                );
                Ok(envelope)
            }
            Err(err) => {
                metrics::record_build_failure(err.label());
                log_envelope_event!(
                    warn,
                    COMPONENT,
                    "Envelope build failed",
                    self.public_key.fingerprint(),
                    counter.peek().unwrap_or(u64::MAX),
                    reason = err.label()
                );
                Err(err)
            }
        }
    }

    fn public_key(&self) -> SenderPublicKey {
        self.public_key
    }

    fn next_sequence(&self) -> Result<u64, BuildError> {
        self.counter.lock().peek()
    }
}
