//! Topic routing registry.
//!
//! Maps each envelope kind to its logical channel on the consensus log.
//! Routing is static per process: the registry is built from configuration
//! at startup and never mutated afterwards.

use shared_types::{ConfigurationError, EnvelopeKind, TopicId};

/// Per-kind channel configuration with a shared default fallback.
///
/// A kind resolves to its dedicated topic when configured, otherwise to
/// `default`. A kind with neither is unroutable, which is a fatal
/// configuration error rather than a per-request validation error.
#[derive(Debug, Clone, Default)]
pub struct TopicRegistry {
    pub meta: Option<TopicId>,
    pub content: Option<TopicId>,
    pub signal: Option<TopicId>,
    pub pass: Option<TopicId>,
    pub default: Option<TopicId>,
}

impl TopicRegistry {
    /// Resolve the channel for an envelope kind.
    pub fn resolve(&self, kind: EnvelopeKind) -> Result<TopicId, ConfigurationError> {
        let dedicated = match kind {
            EnvelopeKind::Meta => &self.meta,
            EnvelopeKind::Content => &self.content,
            EnvelopeKind::Signal => &self.signal,
            EnvelopeKind::Pass => &self.pass,
        };
        dedicated
            .as_ref()
            .or(self.default.as_ref())
            .cloned()
            .ok_or(ConfigurationError::TopicNotConfigured { kind })
    }

    /// Fail-closed startup check: every kind must be routable.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for kind in [
            EnvelopeKind::Meta,
            EnvelopeKind::Content,
            EnvelopeKind::Signal,
            EnvelopeKind::Pass,
        ] {
            self.resolve(kind)?;
        }
        Ok(())
    }
}
