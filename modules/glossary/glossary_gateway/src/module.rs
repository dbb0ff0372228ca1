//! Gateway wiring: SDK client, router and HTTP server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use glossary_sdk::{GlossaryClientV1, GlossaryGrpcClient};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use transport_grpc::client::GrpcClientConfig;

use crate::api::rest;
use crate::config::GatewayConfig;
use crate::cors::build_cors_layer;
use crate::domain::{Service, ServiceConfig};

pub struct GatewayModule {
    router: Router,
}

impl GatewayModule {
    /// Build the gateway over one lazily connected channel to `cfg.grpc_server`.
    ///
    /// # Errors
    /// Returns an error if the upstream address or CORS settings are invalid.
    pub fn init(cfg: &GatewayConfig) -> Result<Self> {
        let client_cfg = GrpcClientConfig::new("glossary")
            .with_connect_timeout(cfg.connect_timeout)
            .with_rpc_timeout(cfg.rpc_timeout);
        let client = GlossaryGrpcClient::connect_lazy(cfg.grpc_server.clone(), client_cfg)
            .with_context(|| format!("invalid grpc_server '{}'", cfg.grpc_server))?;

        tracing::info!(grpc_server = %cfg.grpc_server, "glossary gateway initialized");
        Self::with_client(Arc::new(client), cfg)
    }

    /// Build on any `GlossaryClientV1` implementation.
    ///
    /// # Errors
    /// Returns an error if the CORS settings are invalid.
    pub fn with_client(client: Arc<dyn GlossaryClientV1>, cfg: &GatewayConfig) -> Result<Self> {
        let service = Service::new(
            client,
            ServiceConfig {
                grpc_server: cfg.grpc_server.clone(),
                stream_idle_timeout: cfg.stream_idle_timeout,
            },
        );

        let mut router = rest::router(Arc::new(service)).layer(TraceLayer::new_for_http());
        if cfg.cors_enabled {
            let cors = cfg.cors.clone().unwrap_or_default();
            router = router.layer(build_cors_layer(&cors)?);
        }

        Ok(Self { router })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind `addr` and serve until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if binding fails or the server stops with an error.
    pub async fn serve(self, addr: SocketAddr, cancel: CancellationToken) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind HTTP listener at {addr}"))?;
        self.serve_on(listener, cancel).await
    }

    /// Serve on an already bound listener.
    ///
    /// # Errors
    /// Returns an error if the server stops with an error.
    pub async fn serve_on(self, listener: TcpListener, cancel: CancellationToken) -> Result<()> {
        let bound = listener.local_addr()?;
        tracing::info!(addr = %bound, "glossary gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
            .context("HTTP server failed")?;

        tracing::info!("glossary gateway stopped");
        Ok(())
    }
}
