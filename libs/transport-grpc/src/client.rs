//! gRPC client channel construction.
//!
//! Every channel built here carries the same transport stack:
//! - connect and per-RPC timeouts from [`GrpcClientConfig`]
//! - TCP and HTTP/2 keepalive so idle pooled connections are noticed when they die
//! - a `grpc_connect` tracing span around eager connection attempts
//!
//! Retrying individual calls is a separate concern, see [`crate::rpc_retry`].

use std::time::Duration;

use anyhow::Context;
use tonic::transport::{Channel, Endpoint};
use tracing::Instrument;

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);
const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(10);

fn duration_to_u64_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Transport settings for a gRPC client.
///
/// `max_retries`, `base_backoff` and `max_backoff` drive both
/// [`connect_with_retry`] and [`crate::rpc_retry::call_with_retry`].
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,

    /// Timeout applied to every RPC on the channel.
    pub rpc_timeout: Duration,

    /// Retry attempts after the first failure.
    pub max_retries: u32,

    /// Backoff step; attempt `n` waits `n * base_backoff`.
    pub base_backoff: Duration,

    /// Upper bound for a single backoff.
    pub max_backoff: Duration,

    /// Logical name of the remote service, used in logs and spans.
    pub service_name: &'static str,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            rpc_timeout: Duration::from_secs(30),
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            service_name: "grpc_client",
        }
    }
}

impl GrpcClientConfig {
    /// Configuration with defaults for the named service.
    #[must_use]
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.base_backoff = base;
        self.max_backoff = max;
        self
    }

    /// Backoff to wait before retry number `attempt` (1-based).
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_backoff
            .saturating_mul(attempt)
            .min(self.max_backoff)
    }
}

/// Build a tonic [`Endpoint`] carrying timeouts and keepalive settings.
///
/// # Errors
/// Returns an error if `uri` is not a valid URI.
pub fn build_endpoint(uri: String, cfg: &GrpcClientConfig) -> anyhow::Result<Endpoint> {
    let endpoint = Endpoint::from_shared(uri.clone())
        .with_context(|| format!("invalid gRPC endpoint '{uri}'"))?
        .connect_timeout(cfg.connect_timeout)
        .timeout(cfg.rpc_timeout)
        .tcp_keepalive(Some(KEEPALIVE_INTERVAL))
        .http2_keep_alive_interval(KEEPALIVE_INTERVAL)
        .keep_alive_timeout(KEEPALIVE_TIMEOUT)
        .keep_alive_while_idle(true);

    Ok(endpoint)
}

/// Build a channel that connects on first use and reconnects on demand.
///
/// The channel is cheap to clone and all clones share one pooled HTTP/2
/// connection. When the remote side is unreachable, each RPC fails with
/// `Unavailable` instead of this function failing.
///
/// # Errors
/// Returns an error if `uri` is not a valid URI.
pub fn connect_lazy(uri: impl Into<String>, cfg: &GrpcClientConfig) -> anyhow::Result<Channel> {
    let uri = uri.into();
    let channel = build_endpoint(uri.clone(), cfg)?.connect_lazy();
    tracing::info!(
        service = cfg.service_name,
        uri = %uri,
        rpc_timeout_ms = duration_to_u64_ms(cfg.rpc_timeout),
        "gRPC channel prepared (lazy connect)"
    );
    Ok(channel)
}

/// Connect eagerly, once.
///
/// # Errors
/// Returns an error if the URI is invalid or the connection cannot be established.
pub async fn connect_with_stack<TClient>(
    uri: impl Into<String>,
    cfg: &GrpcClientConfig,
) -> anyhow::Result<TClient>
where
    TClient: From<Channel>,
{
    let uri = uri.into();
    let span = tracing::debug_span!("grpc_connect", service = cfg.service_name, uri = %uri);

    async move {
        let channel = build_endpoint(uri, cfg)?.connect().await?;
        tracing::info!(
            service = cfg.service_name,
            connect_timeout_ms = duration_to_u64_ms(cfg.connect_timeout),
            rpc_timeout_ms = duration_to_u64_ms(cfg.rpc_timeout),
            "gRPC client connected"
        );
        Ok(TClient::from(channel))
    }
    .instrument(span)
    .await
}

/// Connect eagerly, retrying with linear backoff capped at `max_backoff`.
///
/// # Errors
/// Returns the last connection error once `max_retries` retries are exhausted.
pub async fn connect_with_retry<TClient>(
    uri: impl Into<String>,
    cfg: &GrpcClientConfig,
) -> anyhow::Result<TClient>
where
    TClient: From<Channel>,
{
    let uri = uri.into();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match connect_with_stack::<TClient>(uri.as_str(), cfg).await {
            Ok(client) => {
                if attempt > 1 {
                    tracing::info!(
                        service = cfg.service_name,
                        attempt,
                        "gRPC connection established after retries"
                    );
                }
                return Ok(client);
            }
            Err(e) if attempt <= cfg.max_retries => {
                let backoff = cfg.backoff_for(attempt);
                tracing::warn!(
                    service = cfg.service_name,
                    attempt,
                    max_retries = cfg.max_retries,
                    error = %e,
                    backoff_ms = duration_to_u64_ms(backoff),
                    "gRPC connection failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => {
                tracing::error!(
                    service = cfg.service_name,
                    attempt,
                    error = %e,
                    "gRPC connection failed after all retries"
                );
                return Err(e).context(format!(
                    "failed to connect to {} after {attempt} attempts",
                    cfg.service_name
                ));
            }
        }
    }
}
