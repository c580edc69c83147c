//! Server settings read from the environment.

use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3030";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CHALKLINE_ADDR is not a socket address: {0}")]
    InvalidAddr(String),
    #[error("CHALKLINE_CHANNEL_CAPACITY must be a positive integer, got {0}")]
    InvalidCapacity(String),
}

/// Relay server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,
    /// Per-room broadcast buffer
    pub channel_capacity: usize,
}

impl ServerConfig {
    /// Read `CHALKLINE_ADDR` and `CHALKLINE_CHANNEL_CAPACITY`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup("CHALKLINE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(addr.clone()))?;

        let channel_capacity = match lookup("CHALKLINE_CHANNEL_CAPACITY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidCapacity(raw)),
            },
            None => DEFAULT_CHANNEL_CAPACITY,
        };

        Ok(Self {
            addr,
            channel_capacity,
        })
    }
}
