//! # Loopback Node
//!
//! In-process `FabricNode` for tests and demos. Envelopes submitted on a topic
//! are delivered to every subscriber of exactly that topic. Nothing is
//! verified here; receivers verify what they get.

use crate::ports::outbound::{EnvelopeStream, FabricNode, NodeError, NodeStats};
use async_trait::async_trait;
use parking_lot::Mutex;
use sf_types::RawEnvelope;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;
use tracing::{debug, warn};

/// Default channel capacity.
pub const DEFAULT_LOOPBACK_CAPACITY: usize = 1024;

/// Latency samples kept for the p95 estimate.
const LATENCY_SAMPLES: usize = 1024;

/// Broadcast-backed in-process node.
pub struct LoopbackNode {
    sender: broadcast::Sender<RawEnvelope>,
    submitted: AtomicU64,
    latencies_ms: Mutex<VecDeque<f64>>,
}

impl LoopbackNode {
    /// Node with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOOPBACK_CAPACITY)
    }

    /// Node whose subscribers may lag by up to `capacity` envelopes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            submitted: AtomicU64::new(0),
            latencies_ms: Mutex::new(VecDeque::with_capacity(LATENCY_SAMPLES)),
        }
    }

    /// Envelopes submitted so far.
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    fn record_latency(&self, ms: f64) {
        let mut samples = self.latencies_ms.lock();
        if samples.len() == LATENCY_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(ms);
    }

    fn p95_latency_ms(&self) -> f64 {
        let mut samples: Vec<f64> = self.latencies_ms.lock().iter().copied().collect();
        if samples.is_empty() {
            return 0.0;
        }
        samples.sort_by(|a, b| a.total_cmp(b));
        let rank = ((samples.len() as f64) * 0.95).ceil() as usize;
        samples[rank.saturating_sub(1).min(samples.len() - 1)]
    }
}

impl Default for LoopbackNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FabricNode for LoopbackNode {
    async fn submit(&self, envelope: RawEnvelope) -> Result<(), NodeError> {
        let start = Instant::now();
        let topic = envelope.topic.clone();
        self.submitted.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(envelope) {
            Ok(receivers) => debug!(topic = %topic, receivers, "Envelope routed"),
            // No subscribers: the fabric drops it, like a real node would.
            Err(_) => debug!(topic = %topic, "Envelope dropped, no subscribers"),
        }

        self.record_latency(start.elapsed().as_secs_f64() * 1000.0);
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<EnvelopeStream, NodeError> {
        let topic = topic.to_string();
        debug!(topic = %topic, "New loopback subscription");

        let stream = BroadcastStream::new(self.sender.subscribe()).filter_map(move |item| {
            match item {
                Ok(envelope) if envelope.topic == topic => Some(envelope),
                Ok(_) => None,
                Err(BroadcastStreamRecvError::Lagged(count)) => {
                    warn!(topic = %topic, lagged = count, "Subscriber lagged, envelopes dropped");
                    None
                }
            }
        });
        Ok(Box::pin(stream))
    }

    async fn stats(&self) -> Result<NodeStats, NodeError> {
        Ok(NodeStats {
            peers: self.sender.receiver_count() as u64,
            p95_latency_ms: self.p95_latency_ms(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_sha: option_env!("SF_GIT_SHA").unwrap_or("unknown").to_string(),
            built: option_env!("SF_BUILD_TIME").unwrap_or("unknown").to_string(),
            rustc: option_env!("SF_RUSTC_VERSION").unwrap_or("unknown").to_string(),
        })
    }
}
