//! # Publish / Subscribe over a Node
//!
//! Publisher and Subscriber joined through `LoopbackNode`, plus node
//! failures surfacing through the publisher.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, keyring};
    use async_trait::async_trait;
    use futures::StreamExt;
    use parking_lot::Mutex;
    use sf_envelope::{
        EnvelopeBuildApi, EnvelopeDraft, EnvelopeStream, EnvelopeVerifyApi, FabricNode,
        LoopbackNode, NodeError, NodeStats, PublishError, Publisher, RejectReason, Subscriber,
    };
    use sf_types::{AadExtra, RawEnvelope};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    /// Node that records submissions and refuses everything after `limit`.
    struct RecordingNode {
        submitted: Mutex<Vec<RawEnvelope>>,
        limit: usize,
    }

    #[async_trait]
    impl FabricNode for RecordingNode {
        async fn submit(&self, envelope: RawEnvelope) -> Result<(), NodeError> {
            let mut submitted = self.submitted.lock();
            if submitted.len() >= self.limit {
                return Err(NodeError::Rejected {
                    reason: "quota exceeded".into(),
                });
            }
            submitted.push(envelope);
            Ok(())
        }

        async fn subscribe(&self, _topic: &str) -> Result<EnvelopeStream, NodeError> {
            Err(NodeError::Unavailable("subscriptions not supported".into()))
        }

        async fn stats(&self) -> Result<NodeStats, NodeError> {
            Err(NodeError::Unavailable("no stats".into()))
        }
    }

    #[tokio::test]
    async fn test_publish_and_receive_in_order() {
        let keys = keyring();
        let node = Arc::new(LoopbackNode::new());
        let subscriber = Subscriber::new(Arc::new(fixtures::receiver(keys.clone())), node.clone());
        let mut stream = subscriber.subscribe("demo.messages").await.unwrap();
        let publisher = Publisher::new(fixtures::sender(1, keys), node.clone());

        let extra = AadExtra::default();
        let mut ids = Vec::new();
        for i in 0..10u32 {
            let body = format!("message {i}");
            let draft = EnvelopeDraft::plaintext("demo.messages", body.as_bytes(), &extra)
                .with_key_version(1);
            ids.push(publisher.publish(&draft).await.unwrap());
        }

        for (i, id) in ids.iter().enumerate() {
            let accepted = timeout(Duration::from_secs(1), stream.next())
                .await
                .unwrap()
                .unwrap()
                .unwrap();
            assert_eq!(&accepted.message_id, id);
            assert_eq!(accepted.sequence_number, i as u64 + 1);
            assert_eq!(accepted.plaintext, format!("message {i}").as_bytes());
        }
        assert_eq!(node.submitted(), 10);
    }

    #[tokio::test]
    async fn test_topics_are_isolated() {
        let keys = keyring();
        let node = Arc::new(LoopbackNode::new());
        let receiver = Arc::new(fixtures::receiver(keys.clone()));
        let subscriber = Subscriber::new(receiver, node.clone());
        let mut alerts = subscriber.subscribe("alerts").await.unwrap();
        let publisher = Publisher::new(fixtures::sender(2, keys), node.clone());

        let extra = AadExtra::default();
        publisher
            .publish(&EnvelopeDraft::plaintext("metrics", b"cpu=3", &extra))
            .await
            .unwrap();
        publisher
            .publish(&EnvelopeDraft::plaintext("alerts", b"disk full", &extra))
            .await
            .unwrap();

        let accepted = alerts.next().await.unwrap().unwrap();
        assert_eq!(accepted.topic, "alerts");
        assert_eq!(accepted.plaintext, b"disk full");
        assert_eq!(accepted.sequence_number, 2);
    }

    #[tokio::test]
    async fn test_two_subscribers_share_nothing() {
        let keys = keyring();
        let node = Arc::new(LoopbackNode::new());
        let first = Subscriber::new(Arc::new(fixtures::receiver(keys.clone())), node.clone());
        let second = Subscriber::new(Arc::new(fixtures::receiver(keys.clone())), node.clone());
        let mut a = first.subscribe("t").await.unwrap();
        let mut b = second.subscribe("t").await.unwrap();

        let publisher = Publisher::new(fixtures::sender(3, keys), node.clone());
        let extra = AadExtra::default();
        publisher
            .publish(&EnvelopeDraft::plaintext("t", b"fan-out", &extra))
            .await
            .unwrap();

        // Independent replay stores: each receiver accepts its copy once.
        assert!(a.next().await.unwrap().is_ok());
        assert!(b.next().await.unwrap().is_ok());

        let stats = publisher.stats().await.unwrap();
        assert_eq!(stats.peers, 2);
    }

    #[tokio::test]
    async fn test_malformed_delivery_is_rejected_not_fatal() {
        let keys = keyring();
        let node = Arc::new(LoopbackNode::new());
        let subscriber = Subscriber::new(Arc::new(fixtures::receiver(keys.clone())), node.clone());
        let mut stream = subscriber.subscribe("t").await.unwrap();

        let sender = fixtures::sender(4, keys);
        let mut broken = RawEnvelope::from(fixtures::build(&sender, "t", b"x", 0));
        broken.sig.truncate(10);
        node.submit(broken).await.unwrap();
        node.submit(RawEnvelope::from(fixtures::build(&sender, "t", b"y", 0)))
            .await
            .unwrap();

        let first = stream.next().await.unwrap().unwrap_err();
        assert_eq!(first.reason, RejectReason::MalformedEnvelope);
        assert_eq!(stream.next().await.unwrap().unwrap().plaintext, b"y");
    }

    #[tokio::test]
    async fn test_node_rejection_surfaces_and_sequence_is_spent() {
        let keys = keyring();
        let node = Arc::new(RecordingNode {
            submitted: Mutex::new(Vec::new()),
            limit: 1,
        });
        let publisher = Publisher::new(fixtures::sender(5, keys.clone()), node.clone());
        let extra = AadExtra::default();
        let draft = EnvelopeDraft::plaintext("t", b"x", &extra);

        publisher.publish(&draft).await.unwrap();
        let err = publisher.publish(&draft).await.unwrap_err();
        assert!(matches!(err, PublishError::Node(NodeError::Rejected { .. })));

        // The envelope was built before the node refused it.
        assert_eq!(publisher.sender().next_sequence(), Ok(3));

        let receiver = fixtures::receiver(keys);
        let recorded = node.submitted.lock()[0].clone();
        assert_eq!(receiver.verify_raw(recorded).unwrap().sequence_number, 1);
    }
}
