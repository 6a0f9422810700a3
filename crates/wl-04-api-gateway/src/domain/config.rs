//! Gateway configuration with validation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use shared_types::ConfigurationError;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Bind port.
    pub port: u16,
    /// Request body size cap in bytes.
    pub max_request_bytes: usize,
    /// End-to-end request timeout.
    pub request_timeout: Duration,
    /// Permissive CORS for browser clients.
    pub cors_enabled: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            max_request_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(30),
            cors_enabled: true,
        }
    }
}

impl GatewayConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_request_bytes == 0 {
            return Err(ConfigurationError::Invalid {
                reason: "max_request_bytes cannot be 0".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigurationError::Invalid {
                reason: "request_timeout cannot be 0".to_string(),
            });
        }
        Ok(())
    }

    /// HTTP bind address.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
