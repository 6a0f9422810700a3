//! Runtime configuration from environment variables.
//!
//! All keys use the `WL_` prefix. Startup fails closed: a missing database
//! URL or an unroutable envelope kind stops the process before it serves.
//!
//! | Key | Meaning | Default |
//! |-----|---------|---------|
//! | `WL_DATABASE_URL` | Postgres connection string | required |
//! | `WL_NETWORK` | `testnet` / `previewnet` / `mainnet` | `testnet` |
//! | `WL_TOPIC_META` | Channel for WORLD_META | - |
//! | `WL_TOPIC_CONTENT` | Channel for WORLD_CONTENT | - |
//! | `WL_TOPIC_SIGNAL` | Channel for WORLD_SIGNAL | - |
//! | `WL_TOPIC_PASS` | Channel for WORLD_PASS | - |
//! | `WL_TOPIC_DEFAULT` | Shared fallback channel | - |
//! | `WL_HTTP_HOST` | Gateway bind host | `127.0.0.1` |
//! | `WL_HTTP_PORT` | Gateway bind port | `8080` |
//! | `WL_SUBMIT_TIMEOUT_MS` | Consensus round-trip bound | `10000` |
//! | `WL_DB_MAX_CONNECTIONS` | Pool size | `5` |

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use shared_types::{ConfigurationError, TopicId};
use wl_01_consensus_gateway::TopicRegistry;
use wl_03_submission::{Network, SubmissionConfig};
use wl_04_api_gateway::GatewayConfig;

/// Fully-resolved process configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub topics: TopicRegistry,
    pub submission: SubmissionConfig,
    pub gateway: GatewayConfig,
}

impl RuntimeConfig {
    /// Load and validate from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let database_url =
            env::var("WL_DATABASE_URL").map_err(|_| ConfigurationError::MissingEnv {
                key: "WL_DATABASE_URL".to_string(),
            })?;

        let network: Network = match env::var("WL_NETWORK") {
            Ok(raw) => raw.parse()?,
            Err(_) => Network::Testnet,
        };

        let topics = TopicRegistry {
            meta: topic_var("WL_TOPIC_META"),
            content: topic_var("WL_TOPIC_CONTENT"),
            signal: topic_var("WL_TOPIC_SIGNAL"),
            pass: topic_var("WL_TOPIC_PASS"),
            default: topic_var("WL_TOPIC_DEFAULT"),
        };
        topics.validate()?;

        let mut gateway = GatewayConfig::default();
        if let Ok(raw) = env::var("WL_HTTP_HOST") {
            gateway.host = raw.parse::<IpAddr>().map_err(|_| ConfigurationError::Invalid {
                reason: format!("WL_HTTP_HOST {raw:?} is not an IP address"),
            })?;
        }
        if let Ok(raw) = env::var("WL_HTTP_PORT") {
            gateway.port = raw.parse::<u16>().map_err(|_| ConfigurationError::Invalid {
                reason: format!("WL_HTTP_PORT {raw:?} is not a port"),
            })?;
        }
        gateway.validate()?;

        let submission = SubmissionConfig {
            network,
            submit_timeout: duration_var("WL_SUBMIT_TIMEOUT_MS", Duration::from_secs(10))?,
        };
        submission.validate()?;

        let db_max_connections = match env::var("WL_DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| ConfigurationError::Invalid {
                reason: format!("WL_DB_MAX_CONNECTIONS {raw:?} is not a number"),
            })?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            db_max_connections,
            topics,
            submission,
            gateway,
        })
    }
}

fn topic_var(key: &str) -> Option<TopicId> {
    env::var(key).ok().filter(|v| !v.is_empty()).map(TopicId::new)
}

fn duration_var(key: &str, default: Duration) -> Result<Duration, ConfigurationError> {
    match env::var(key) {
        Ok(raw) => {
            let ms = raw.parse::<u64>().map_err(|_| ConfigurationError::Invalid {
                reason: format!("{key} {raw:?} is not milliseconds"),
            })?;
            Ok(Duration::from_millis(ms))
        }
        Err(_) => Ok(default),
    }
}
