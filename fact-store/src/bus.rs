//! Event bus boundary
//!
//! Topic-addressed pub/sub interface. Transport concerns (wire framing,
//! partitioning, topic provisioning) live with the bus implementation,
//! not here; the in-memory bus exists so higher layers can be exercised
//! without one.

use crate::error::Result;
use crate::metrics::BUS_PUBLISH_TOTAL;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Closed set of bus topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// A new attestation became durable
    AttestationStored,
    /// A ledger transaction was applied
    TransactionApplied,
    /// A ledger entry was posted
    LedgerEntryPosted,
    /// A checkpoint was written to the state store
    CheckpointWritten,
}

impl Topic {
    /// Subject name for this topic
    pub fn subject(&self) -> &'static str {
        match self {
            Topic::AttestationStored => "credence.attestation.stored",
            Topic::TransactionApplied => "credence.transaction.applied",
            Topic::LedgerEntryPosted => "credence.ledger.entry.posted",
            Topic::CheckpointWritten => "credence.checkpoint.written",
        }
    }
}

/// Publish/subscribe boundary
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a keyed payload to a topic
    async fn publish(&self, topic: Topic, key: &str, payload: &[u8]) -> Result<()>;

    /// Register a consumer group on a topic
    async fn subscribe(&self, topic: Topic, group: &str) -> Result<()>;
}

/// A message captured by the in-memory bus
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    /// Topic it was published to
    pub topic: Topic,
    /// Partition/routing key
    pub key: String,
    /// Raw payload bytes
    pub payload: Vec<u8>,
    /// Publish time
    pub published_at: DateTime<Utc>,
}

/// In-memory reference bus; records everything for inspection
#[derive(Debug, Default)]
pub struct MemoryEventBus {
    messages: RwLock<Vec<PublishedMessage>>,
    groups: RwLock<HashSet<(Topic, String)>>,
}

impl MemoryEventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published to a topic, in publish order
    pub fn published(&self, topic: Topic) -> Vec<PublishedMessage> {
        self.messages
            .read()
            .iter()
            .filter(|m| m.topic == topic)
            .cloned()
            .collect()
    }

    /// Whether a consumer group is registered on a topic
    pub fn subscribed(&self, topic: Topic, group: &str) -> bool {
        self.groups.read().contains(&(topic, group.to_string()))
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, topic: Topic, key: &str, payload: &[u8]) -> Result<()> {
        self.messages.write().push(PublishedMessage {
            topic,
            key: key.to_string(),
            payload: payload.to_vec(),
            published_at: Utc::now(),
        });

        tracing::debug!(subject = topic.subject(), key, "message published");
        BUS_PUBLISH_TOTAL
            .with_label_values(&[topic.subject(), "published"])
            .inc();
        Ok(())
    }

    async fn subscribe(&self, topic: Topic, group: &str) -> Result<()> {
        self.groups.write().insert((topic, group.to_string()));
        tracing::debug!(subject = topic.subject(), group, "group subscribed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_subjects_are_namespaced() {
        assert_eq!(Topic::AttestationStored.subject(), "credence.attestation.stored");
        assert_eq!(Topic::CheckpointWritten.subject(), "credence.checkpoint.written");
    }

    #[tokio::test]
    async fn test_publish_records_in_order() {
        let bus = MemoryEventBus::new();
        bus.publish(Topic::AttestationStored, "k1", b"one").await.unwrap();
        bus.publish(Topic::AttestationStored, "k2", b"two").await.unwrap();
        bus.publish(Topic::TransactionApplied, "k3", b"three").await.unwrap();

        let stored = bus.published(Topic::AttestationStored);
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].key, "k1");
        assert_eq!(stored[1].payload, b"two");
        assert_eq!(bus.published(Topic::TransactionApplied).len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_registers_group() {
        let bus = MemoryEventBus::new();
        bus.subscribe(Topic::LedgerEntryPosted, "risk-workers").await.unwrap();

        assert!(bus.subscribed(Topic::LedgerEntryPosted, "risk-workers"));
        assert!(!bus.subscribed(Topic::LedgerEntryPosted, "other"));
    }
}
