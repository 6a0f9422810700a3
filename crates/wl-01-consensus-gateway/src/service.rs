//! Consensus Submitter.
//!
//! The single-attempt, timeout-bounded path from a sealed envelope to an
//! ordering receipt.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use shared_types::{ConfigurationError, EnvelopeKind, Receipt, TopicId};

use crate::domain::{ConsensusError, TopicRegistry};
use crate::ports::ConsensusLogClient;

/// Default bound on the submission round trip.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Routes envelopes to topics and performs the one network attempt.
pub struct ConsensusSubmitter {
    client: Arc<dyn ConsensusLogClient>,
    topics: TopicRegistry,
    timeout: Duration,
}

impl ConsensusSubmitter {
    pub fn new(client: Arc<dyn ConsensusLogClient>, topics: TopicRegistry) -> Self {
        Self {
            client,
            topics,
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the channel for an envelope kind.
    ///
    /// Kept separate from [`Self::submit_once`] so the orchestrator can
    /// fail a misconfigured request before spending a network call.
    pub fn topic_for(&self, kind: EnvelopeKind) -> Result<TopicId, ConfigurationError> {
        self.topics.resolve(kind)
    }

    /// Submit one serialized envelope. Exactly one attempt; a timeout is a
    /// failure like any other, with no partial application.
    pub async fn submit_once(
        &self,
        topic_id: &TopicId,
        message: &[u8],
    ) -> Result<Receipt, ConsensusError> {
        debug!(topic_id = %topic_id, bytes = message.len(), "Submitting to consensus log");

        let attempt = self.client.submit(topic_id, message);
        let receipt = match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result?,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!(topic_id = %topic_id, timeout_ms, "Consensus submission timed out");
                return Err(ConsensusError::Timeout { timeout_ms });
            }
        };

        debug!(
            topic_id = %topic_id,
            sequence_number = receipt.sequence_number,
            "Consensus log accepted message"
        );
        Ok(receipt)
    }
}
