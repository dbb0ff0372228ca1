//! Glossary module wiring: storage selection, domain service and gRPC routes.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use glossary_sdk::{GlossaryServiceServer, SERVICE_NAME};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use transport_grpc::server::{bind_tcp, serve_tcp};

use crate::api::grpc::GlossaryServiceImpl;
use crate::config::GlossaryConfig;
use crate::domain::service::ServiceConfig;
use crate::domain::{Service, TermsRepository};
use crate::infra::storage::select_repository;

/// A ready-to-serve glossary service.
pub struct GlossaryModule {
    service: Arc<Service>,
    max_concurrent_requests: usize,
}

impl GlossaryModule {
    /// Probe storage and build the service.
    ///
    /// # Errors
    /// Returns an error if no storage backend could be built.
    pub async fn init(cfg: &GlossaryConfig) -> Result<Self> {
        tracing::info!("Initializing glossary module");
        let repo = select_repository(&cfg.redis_url, cfg.redis_connect_timeout).await?;
        Ok(Self::with_repository(repo, cfg))
    }

    /// Build on an already chosen repository.
    pub fn with_repository(repo: Arc<dyn TermsRepository>, cfg: &GlossaryConfig) -> Self {
        let service = Service::new(
            repo,
            ServiceConfig {
                stream_buffer: cfg.stream_buffer,
                stream_idle_timeout: cfg.stream_idle_timeout,
            },
        );
        Self {
            service: Arc::new(service),
            max_concurrent_requests: cfg.max_concurrent_requests,
        }
    }

    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// Routes exposing `glossary.v1.GlossaryService`.
    pub fn routes(&self) -> tonic::service::Routes {
        let svc = GlossaryServiceServer::new(GlossaryServiceImpl::new(self.service()));
        tonic::service::Routes::new(svc)
    }

    /// Bind `addr` and serve until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if binding fails or the server stops with an error.
    pub async fn serve(self, addr: SocketAddr, cancel: CancellationToken) -> Result<()> {
        let (listener, bound) = bind_tcp(addr).await?;
        self.serve_on(listener, bound, cancel).await
    }

    /// Serve on an already bound listener.
    ///
    /// # Errors
    /// Returns an error if the server stops with an error.
    pub async fn serve_on(
        self,
        listener: TcpListener,
        bound: SocketAddr,
        cancel: CancellationToken,
    ) -> Result<()> {
        tracing::info!(
            service = SERVICE_NAME,
            addr = %bound,
            backend = self.service.backend(),
            max_concurrent_requests = self.max_concurrent_requests,
            "glossary gRPC server listening"
        );
        serve_tcp(listener, self.routes(), self.max_concurrent_requests, cancel).await
    }
}
