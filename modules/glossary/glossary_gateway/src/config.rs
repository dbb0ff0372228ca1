//! Gateway configuration (`GATEWAY__*` environment prefix).

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use glossary_bootstrap::{LoggingConfig, load_layered};
use serde::{Deserialize, Serialize};
use transport_grpc::normalize_endpoint;

pub const ENV_PREFIX: &str = "GATEWAY";

/// Plain `GRPC_SERVER`, honored when `GATEWAY__GRPC_SERVER` is not set.
pub const GRPC_SERVER_ENV: &str = "GRPC_SERVER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub bind_addr: String,
    /// Glossary service address; `http://` is assumed when no scheme is given.
    pub grpc_server: String,
    #[serde(with = "humantime_serde")]
    pub stream_idle_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub rpc_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    pub cors_enabled: bool,
    pub cors: Option<CorsConfig>,
    pub logging: LoggingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_owned(),
            grpc_server: "http://127.0.0.1:50051".to_owned(),
            stream_idle_timeout: Duration::from_secs(30),
            rpc_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
            cors_enabled: true,
            cors: None,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
            allowed_methods: ["GET", "POST", "DELETE", "OPTIONS"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            allowed_headers: vec!["*".to_owned()],
            allow_credentials: false,
            max_age_seconds: 0,
        }
    }
}

impl GatewayConfig {
    /// Defaults, then the YAML file, then `GATEWAY__*`, then `GRPC_SERVER`.
    ///
    /// # Errors
    /// Returns an error if any layer is invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg: Self = load_layered(path, ENV_PREFIX)?;
        if std::env::var_os(format!("{ENV_PREFIX}__GRPC_SERVER")).is_none() {
            match std::env::var(GRPC_SERVER_ENV) {
                Ok(addr) if !addr.is_empty() => cfg.grpc_server = addr,
                _ => {}
            }
        }
        cfg.grpc_server = normalize_endpoint(&cfg.grpc_server);
        Ok(cfg)
    }

    /// # Errors
    /// Returns an error if `bind_addr` is not `ip:port`.
    pub fn socket_addr(&self, port: Option<u16>) -> anyhow::Result<SocketAddr> {
        let mut addr: SocketAddr = self
            .bind_addr
            .parse()
            .with_context(|| format!("invalid bind_addr '{}'", self.bind_addr))?;
        if let Some(port) = port {
            addr.set_port(port);
        }
        Ok(addr)
    }
}
