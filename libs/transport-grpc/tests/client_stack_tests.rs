#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the gRPC client transport stack

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use transport_grpc::client::{GrpcClientConfig, connect_with_retry, connect_with_stack};
use transport_grpc::server::{bind_tcp, serve_tcp};

#[test]
fn default_config_is_sane() {
    let cfg = GrpcClientConfig::default();

    assert!(cfg.connect_timeout > Duration::ZERO);
    assert!(cfg.rpc_timeout > Duration::ZERO);
    assert!(cfg.base_backoff > Duration::ZERO);
    assert!(cfg.max_backoff >= cfg.base_backoff);
    assert!(!cfg.service_name.is_empty());
}

#[test]
fn builder_overrides_defaults() {
    let cfg = GrpcClientConfig::new("glossary")
        .with_connect_timeout(Duration::from_secs(2))
        .with_rpc_timeout(Duration::from_secs(4))
        .with_max_retries(0);

    assert_eq!(cfg.service_name, "glossary");
    assert_eq!(cfg.connect_timeout, Duration::from_secs(2));
    assert_eq!(cfg.rpc_timeout, Duration::from_secs(4));
    assert_eq!(cfg.max_retries, 0);
}

#[tokio::test]
async fn connect_to_closed_port_fails() {
    let cfg = GrpcClientConfig::new("nowhere").with_connect_timeout(Duration::from_millis(200));

    let result = connect_with_stack::<tonic::transport::Channel>("http://127.0.0.1:1", &cfg).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn connect_with_retry_reports_attempts() {
    let cfg = GrpcClientConfig::new("nowhere")
        .with_connect_timeout(Duration::from_millis(100))
        .with_max_retries(1)
        .with_backoff(Duration::from_millis(1), Duration::from_millis(1));

    let err = connect_with_retry::<tonic::transport::Channel>("http://127.0.0.1:1", &cfg)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("after 2 attempts"), "{err}");
}

#[tokio::test]
async fn serve_tcp_stops_on_cancel() {
    let (listener, bound) = bind_tcp("127.0.0.1:0".parse().unwrap()).await.unwrap();
    assert_ne!(bound.port(), 0);

    let cancel = CancellationToken::new();
    let routes = tonic::service::Routes::default();
    let server = tokio::spawn(serve_tcp(listener, routes, 4, cancel.clone()));

    let cfg = GrpcClientConfig::new("empty").with_connect_timeout(Duration::from_secs(2));
    let connected =
        connect_with_stack::<tonic::transport::Channel>(format!("http://{bound}"), &cfg).await;
    assert!(connected.is_ok());
    drop(connected);

    cancel.cancel();
    let joined = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .expect("server task panicked");
    assert!(joined.is_ok());
}
