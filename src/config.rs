//! Server settings.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Duration;

use crate::catalog::Catalog;
use crate::completion::DEFAULT_TTL_SECS;

/// Default idle lifetime of a session, in seconds.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 60;

/// Upper bound for any TTL setting: one year, in seconds.
pub const MAX_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Convert a TTL setting to a duration, rejecting values outside `1..=MAX_TTL_SECS`.
pub fn ttl_from_secs(secs: i64) -> Result<Duration> {
    if !(1..=MAX_TTL_SECS).contains(&secs) {
        bail!("TTL must be between 1 and {} seconds, got {}", MAX_TTL_SECS, secs);
    }
    Ok(Duration::seconds(secs))
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON catalog to serve; the built-in catalog is used when unset.
    pub catalog: Option<PathBuf>,
    /// Lifetime of a completion marker.
    pub completion_ttl: Duration,
    /// Idle lifetime of a session.
    pub session_ttl: Duration,
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::open(path),
            None => Catalog::builtin(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            catalog: None,
            completion_ttl: Duration::seconds(DEFAULT_TTL_SECS),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
        }
    }
}
