//! Submission configuration.
//!
//! Carries the environment guard and the consensus round-trip bound.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use shared_types::ConfigurationError;

/// Target consensus network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Testnet,
    Previewnet,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Testnet => "testnet",
            Self::Previewnet => "previewnet",
            Self::Mainnet => "mainnet",
        }
    }

    /// The live network where real value moves.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Mainnet)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "testnet" => Ok(Self::Testnet),
            "previewnet" => Ok(Self::Previewnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(ConfigurationError::Invalid {
                reason: format!("unknown network {other:?}"),
            }),
        }
    }
}

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    /// Target network. Submissions against the live network fail closed.
    pub network: Network,
    /// Bound on the single consensus round trip.
    pub submit_timeout: Duration,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            submit_timeout: Duration::from_secs(10),
        }
    }
}

impl SubmissionConfig {
    /// The production-safety guard, checked before any other request step.
    pub fn ensure_submissions_enabled(&self) -> Result<(), ConfigurationError> {
        if self.network.is_live() {
            return Err(ConfigurationError::SubmissionsDisabled {
                network: self.network.to_string(),
            });
        }
        Ok(())
    }

    /// Startup validation.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.submit_timeout.is_zero() {
            return Err(ConfigurationError::Invalid {
                reason: "submit_timeout cannot be 0".to_string(),
            });
        }
        Ok(())
    }
}
