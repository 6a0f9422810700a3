//! In-memory consensus log.
//!
//! Used by tests and local runs. Assigns per-topic monotonically increasing
//! sequence numbers, fabricates consensus timestamps from the system clock,
//! and supports failure injection plus submission introspection so tests
//! can assert call counts and degraded paths.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use shared_types::{Receipt, TopicId};

use crate::domain::ConsensusError;
use crate::ports::ConsensusLogClient;

/// A message accepted by the in-memory log.
#[derive(Debug, Clone)]
pub struct SubmittedMessage {
    pub topic_id: TopicId,
    pub sequence_number: u64,
    pub message: Vec<u8>,
}

#[derive(Default)]
struct LogState {
    /// Next sequence number per topic.
    sequences: HashMap<String, u64>,
    accepted: Vec<SubmittedMessage>,
    /// When set, every submission fails with this error.
    failure: Option<ConsensusError>,
    /// Total submit calls, including failed ones.
    calls: usize,
}

/// In-memory [`ConsensusLogClient`].
#[derive(Default)]
pub struct InMemoryConsensusLog {
    state: Mutex<LogState>,
}

impl InMemoryConsensusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent submission fail with `error`.
    pub fn fail_with(&self, error: ConsensusError) {
        self.state.lock().failure = Some(error);
    }

    /// Restore normal operation.
    pub fn clear_failure(&self) {
        self.state.lock().failure = None;
    }

    /// All accepted messages, in acceptance order.
    pub fn accepted(&self) -> Vec<SubmittedMessage> {
        self.state.lock().accepted.clone()
    }

    /// Number of submit calls observed, successful or not.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls
    }
}

#[async_trait]
impl ConsensusLogClient for InMemoryConsensusLog {
    async fn submit(&self, topic_id: &TopicId, message: &[u8]) -> Result<Receipt, ConsensusError> {
        let mut state = self.state.lock();
        state.calls += 1;

        if let Some(error) = &state.failure {
            return Err(error.clone());
        }

        let next = state
            .sequences
            .entry(topic_id.as_str().to_string())
            .or_insert(0);
        *next += 1;
        let sequence_number = *next;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let receipt = Receipt {
            sequence_number,
            consensus_timestamp: format!("{}.{:09}", now.as_secs(), now.subsec_nanos()),
            transaction_ref: format!("mem-{}", Uuid::new_v4()),
        };

        state.accepted.push(SubmittedMessage {
            topic_id: topic_id.clone(),
            sequence_number,
            message: message.to_vec(),
        });

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequences_are_per_topic_and_monotonic() {
        let log = InMemoryConsensusLog::new();
        let topic_a = TopicId::new("0.0.1");
        let topic_b = TopicId::new("0.0.2");

        let r1 = log.submit(&topic_a, b"one").await.unwrap();
        let r2 = log.submit(&topic_a, b"two").await.unwrap();
        let r3 = log.submit(&topic_b, b"three").await.unwrap();

        assert_eq!(r1.sequence_number, 1);
        assert_eq!(r2.sequence_number, 2);
        assert_eq!(r3.sequence_number, 1);
        assert_eq!(log.accepted().len(), 3);
    }

    #[tokio::test]
    async fn test_failure_injection_counts_calls() {
        let log = InMemoryConsensusLog::new();
        log.fail_with(ConsensusError::Unavailable {
            message: "down".to_string(),
        });

        let err = log.submit(&TopicId::new("0.0.1"), b"msg").await.unwrap_err();
        assert!(matches!(err, ConsensusError::Unavailable { .. }));
        assert_eq!(log.call_count(), 1);
        assert!(log.accepted().is_empty());

        log.clear_failure();
        assert!(log.submit(&TopicId::new("0.0.1"), b"msg").await.is_ok());
        assert_eq!(log.call_count(), 2);
    }
}
