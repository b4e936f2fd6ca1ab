//! # Publisher / Subscriber
//!
//! Thin façade joining the envelope services to a `FabricNode`.

use crate::domain::entities::{EnvelopeDraft, VerifyOutcome};
use crate::domain::errors::BuildError;
use crate::ports::inbound::{EnvelopeBuildApi, EnvelopeVerifyApi};
use crate::ports::outbound::{FabricNode, NodeError, NodeStats};
use futures::stream::{BoxStream, StreamExt};
use sf_telemetry::log_envelope_event;
use sf_types::{MessageId, RawEnvelope};
use std::sync::Arc;
use thiserror::Error;

/// Errors from `Publisher::publish`.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Envelope could not be built
    #[error("Build failed: {0}")]
    Build(#[from] BuildError),

    /// Node refused or was unreachable
    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Builds envelopes and submits them to a node.
pub struct Publisher<B: EnvelopeBuildApi, F: FabricNode> {
    sender: B,
    node: F,
}

impl<B: EnvelopeBuildApi, F: FabricNode> Publisher<B, F> {
    /// Create a publisher.
    pub fn new(sender: B, node: F) -> Self {
        Self { sender, node }
    }

    /// Build and submit one message. Returns its message id.
    pub async fn publish(&self, draft: &EnvelopeDraft<'_>) -> Result<MessageId, PublishError> {
        let envelope = self.sender.build_envelope(draft)?;
        let message_id = envelope.message_id;
        let sequence_number = envelope.sequence_number;

        self.node.submit(RawEnvelope::from(envelope)).await?;
        log_envelope_event!(
            debug,
            "publisher",
            "Envelope published",
            self.sender.public_key().fingerprint(),
            sequence_number,
            topic = %draft.topic,
            msg_id = %message_id
        );
        Ok(message_id)
    }

    /// Access the sender.
    pub fn sender(&self) -> &B {
        &self.sender
    }

    /// Node statistics.
    pub async fn stats(&self) -> Result<NodeStats, NodeError> {
        self.node.stats().await
    }
}

/// Subscribes to topics and verifies every delivered envelope.
pub struct Subscriber<V: EnvelopeVerifyApi + 'static, F: FabricNode> {
    verifier: Arc<V>,
    node: F,
}

impl<V: EnvelopeVerifyApi + 'static, F: FabricNode> Subscriber<V, F> {
    /// Create a subscriber.
    pub fn new(verifier: Arc<V>, node: F) -> Self {
        Self { verifier, node }
    }

    /// Stream of verification outcomes for `topic`, in delivery order.
    pub async fn subscribe(
        &self,
        topic: &str,
    ) -> Result<BoxStream<'static, VerifyOutcome>, NodeError> {
        let deliveries = self.node.subscribe(topic).await?;
        let verifier = Arc::clone(&self.verifier);
        Ok(deliveries
            .map(move |raw| verifier.verify_raw(raw))
            .boxed())
    }

    /// Access the verifier.
    pub fn verifier(&self) -> &Arc<V> {
        &self.verifier
    }

    /// Node statistics.
    pub async fn stats(&self) -> Result<NodeStats, NodeError> {
        self.node.stats().await
    }
}
