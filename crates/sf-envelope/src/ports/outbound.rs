//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the envelope core depends on:
//! - a secure random source for nonces
//! - a key-version → symmetric-key resolver
//! - an identity → replay-window store (see `sf_replay::ReplayStore`)
//! - the fabric node that routes envelopes

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use sf_crypto::SymmetricKey;
use sf_types::{EnvelopeNonce, RawEnvelope};
use std::sync::Arc;
use thiserror::Error;

pub use sf_replay::ReplayStore;

/// Error from key resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyLookupError {
    /// No key registered for this version
    #[error("No symmetric key for version {0}")]
    NotFound(u32),

    /// Version 0 means "unencrypted" and never has a key
    #[error("Key version 0 is reserved for unencrypted payloads")]
    Reserved,
}

/// Resolves symmetric keys by version.
pub trait SymmetricKeyProvider: Send + Sync {
    /// Key for `version`.
    fn key(&self, version: u32) -> Result<Arc<SymmetricKey>, KeyLookupError>;
}

impl<T: SymmetricKeyProvider + ?Sized> SymmetricKeyProvider for Arc<T> {
    fn key(&self, version: u32) -> Result<Arc<SymmetricKey>, KeyLookupError> {
        (**self).key(version)
    }
}

/// The random source could not produce bytes.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Secure random source unavailable")]
pub struct EntropyError;

/// Produces nonces that never repeat for one signing key.
pub trait NonceSource: Send + Sync {
    /// Next nonce.
    ///
    /// # Errors
    /// * `EntropyError` - the secure random source failed; implementations
    ///   must not substitute a weaker source
    fn next_nonce(&self) -> Result<EnvelopeNonce, EntropyError>;
}

/// Error from node operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NodeError {
    /// Node refused the envelope
    #[error("Envelope rejected by node: {reason}")]
    Rejected { reason: String },

    /// Node unreachable or the stream closed
    #[error("Node unavailable: {0}")]
    Unavailable(String),
}

/// Operational statistics reported by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    /// Connected peers
    pub peers: u64,
    /// 95th percentile routing latency in milliseconds
    pub p95_latency_ms: f64,
    /// Node software version
    pub version: String,
    /// Commit the node was built from
    pub git_sha: String,
    /// Build timestamp
    pub built: String,
    /// Compiler version
    pub rustc: String,
}

/// Stream of envelopes delivered for a subscription.
pub type EnvelopeStream = BoxStream<'static, RawEnvelope>;

/// Gateway to the fabric node.
///
/// Transport framing, authentication and retries belong to the adapter.
#[async_trait::async_trait]
pub trait FabricNode: Send + Sync {
    /// Submit an envelope for routing.
    ///
    /// # Errors
    /// * `NodeError::Rejected` - node refused the envelope
    /// * `NodeError::Unavailable` - node unreachable
    async fn submit(&self, envelope: RawEnvelope) -> Result<(), NodeError>;

    /// Subscribe to envelopes published on `topic`.
    async fn subscribe(&self, topic: &str) -> Result<EnvelopeStream, NodeError>;

    /// Fetch operational statistics.
    async fn stats(&self) -> Result<NodeStats, NodeError>;
}

#[async_trait::async_trait]
impl<T: FabricNode + ?Sized> FabricNode for Arc<T> {
    async fn submit(&self, envelope: RawEnvelope) -> Result<(), NodeError> {
        (**self).submit(envelope).await
    }

    async fn subscribe(&self, topic: &str) -> Result<EnvelopeStream, NodeError> {
        (**self).subscribe(topic).await
    }

    async fn stats(&self) -> Result<NodeStats, NodeError> {
        (**self).stats().await
    }
}
