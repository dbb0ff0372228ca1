//! Server configuration (`GLOSSARY__*` environment prefix).

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use glossary_bootstrap::{LoggingConfig, load_layered};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "GLOSSARY";

/// Plain `REDIS_URL`, honored when `GLOSSARY__REDIS_URL` is not set.
pub const REDIS_URL_ENV: &str = "REDIS_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossaryConfig {
    pub listen_addr: String,
    pub redis_url: String,
    /// Bound on the startup connectivity probe.
    #[serde(with = "humantime_serde")]
    pub redis_connect_timeout: Duration,
    /// Requests handled at once; further requests wait.
    pub max_concurrent_requests: usize,
    pub stream_buffer: usize,
    /// A stream whose consumer takes no term for this long is ended.
    #[serde(with = "humantime_serde")]
    pub stream_idle_timeout: Duration,
    pub logging: LoggingConfig,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:50051".to_owned(),
            redis_url: "redis://127.0.0.1:6379/0".to_owned(),
            redis_connect_timeout: Duration::from_secs(5),
            max_concurrent_requests: 10,
            stream_buffer: 16,
            stream_idle_timeout: Duration::from_secs(30),
            logging: LoggingConfig::default(),
        }
    }
}

impl GlossaryConfig {
    /// Defaults, then the YAML file, then `GLOSSARY__*`, then `REDIS_URL`.
    ///
    /// # Errors
    /// Returns an error if any layer is invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg: Self = load_layered(path, ENV_PREFIX)?;
        if std::env::var_os(format!("{ENV_PREFIX}__REDIS_URL")).is_none() {
            match std::env::var(REDIS_URL_ENV) {
                Ok(url) if !url.is_empty() => cfg.redis_url = url,
                _ => {}
            }
        }
        Ok(cfg)
    }

    /// Parsed listen address, with `port` replacing the configured one.
    ///
    /// # Errors
    /// Returns an error if `listen_addr` is not `ip:port`.
    pub fn socket_addr(&self, port: Option<u16>) -> anyhow::Result<SocketAddr> {
        let mut addr: SocketAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen_addr '{}'", self.listen_addr))?;
        if let Some(port) = port {
            addr.set_port(port);
        }
        Ok(addr)
    }
}
