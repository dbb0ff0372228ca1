//! Hosting a tonic server on a TCP listener.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::service::Routes;
use tonic::transport::Server;
use tower::limit::GlobalConcurrencyLimitLayer;

/// Bind a TCP listener, returning it together with the address actually bound.
///
/// Binding `0.0.0.0:0` picks an ephemeral port; the returned address carries it.
///
/// # Errors
/// Returns an error if the address cannot be bound.
pub async fn bind_tcp(addr: SocketAddr) -> anyhow::Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind gRPC listener at {addr}"))?;
    let bound = listener.local_addr()?;
    Ok((listener, bound))
}

/// Serve `routes` until `cancel` fires.
///
/// At most `max_in_flight` requests are processed at once across all
/// connections; further requests wait for a slot. A slot is released once
/// the handler has produced its response, so a server stream only occupies
/// one while it is being set up.
///
/// # Errors
/// Returns an error if the server fails while running.
pub async fn serve_tcp(
    listener: TcpListener,
    routes: Routes,
    max_in_flight: usize,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let bound = listener.local_addr()?;
    tracing::info!(%bound, transport = "tcp", max_in_flight, "gRPC server listening");

    let incoming = TcpListenerStream::new(listener);
    Server::builder()
        .layer(GlobalConcurrencyLimitLayer::new(max_in_flight.max(1)))
        .add_routes(routes)
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await
        .context("gRPC server terminated with an error")?;

    tracing::info!(%bound, "gRPC server stopped");
    Ok(())
}
