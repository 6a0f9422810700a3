//! Outbound port: the external consensus log.

use async_trait::async_trait;

use shared_types::{Receipt, TopicId};

use crate::domain::ConsensusError;

/// Abstract interface to the external, trusted-ordering log.
///
/// One call is one network round trip. Implementations MUST NOT retry
/// internally; the orchestrator owns retry policy. An `Ok` receipt means
/// the message is irrevocably and publicly ordered.
#[async_trait]
pub trait ConsensusLogClient: Send + Sync {
    /// Submit one serialized envelope to a topic.
    async fn submit(&self, topic_id: &TopicId, message: &[u8]) -> Result<Receipt, ConsensusError>;
}
