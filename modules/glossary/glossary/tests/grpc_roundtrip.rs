#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests: in-process gRPC server on the in-memory store,
//! driven through the SDK client.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use glossary::infra::storage::InMemoryTermsRepository;
use glossary::{GlossaryConfig, GlossaryModule};
use glossary_sdk::{
    GlossaryClientV1, GlossaryError, GlossaryGrpcClient, NewTerm, SearchQuery, StreamQuery,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use transport_grpc::client::GrpcClientConfig;
use transport_grpc::server::bind_tcp;

struct Harness {
    client: GlossaryGrpcClient,
    cancel: CancellationToken,
    server: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    async fn start() -> Self {
        let cfg = GlossaryConfig::default();
        let repo = Arc::new(InMemoryTermsRepository::seeded().unwrap());
        let module = GlossaryModule::with_repository(repo, &cfg);

        let (listener, bound) = bind_tcp("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let cancel = CancellationToken::new();
        let server = tokio::spawn(module.serve_on(listener, bound, cancel.clone()));

        let client_cfg = GrpcClientConfig::new("glossary")
            .with_connect_timeout(Duration::from_secs(2))
            .with_rpc_timeout(Duration::from_secs(5));
        let client = GlossaryGrpcClient::connect(format!("http://{bound}"), client_cfg)
            .await
            .unwrap();

        Self {
            client,
            cancel,
            server,
        }
    }

    async fn stop(self) {
        drop(self.client);
        self.cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.server)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn get_and_list_seeded_terms() {
    let h = Harness::start().await;

    let term = h.client.get_term("1").await.unwrap();
    assert_eq!(term.name, "Protobuf");
    assert!(!term.created_at.is_empty());

    let list = h.client.list_terms().await.unwrap();
    assert_eq!(list.total_count, 5);

    let err = h.client.get_term("999").await.unwrap_err();
    assert_eq!(
        err,
        GlossaryError::NotFound("Term with id 999 not found".to_owned())
    );

    h.stop().await;
}

#[tokio::test]
async fn add_then_get_then_delete() {
    let h = Harness::start().await;

    let outcome = h
        .client
        .add_term(NewTerm {
            name: "Kubernetes".to_owned(),
            definition: "Container orchestration platform".to_owned(),
            category: "Containerization".to_owned(),
            examples: vec!["Cluster scheduling".to_owned()],
            synonyms: vec!["K8s".to_owned()],
        })
        .await
        .unwrap();
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.term_id, "6");

    let stored = h.client.get_term("6").await.unwrap();
    assert_eq!(stored.id, "6");
    assert_eq!(stored.name, "Kubernetes");
    assert_eq!(stored.definition, "Container orchestration platform");
    assert_eq!(stored.category, "Containerization");
    assert_eq!(stored.examples, ["Cluster scheduling"]);
    assert_eq!(stored.synonyms, ["K8s"]);
    assert!(!stored.created_at.is_empty());
    assert!(!stored.updated_at.is_empty());

    let deleted = h.client.delete_term("6").await.unwrap();
    assert!(deleted.success);
    let again = h.client.delete_term("6").await.unwrap();
    assert!(!again.success);

    h.stop().await;
}

#[tokio::test]
async fn search_with_category_and_limit() {
    let h = Harness::start().await;

    let hits = h
        .client
        .search_terms(SearchQuery {
            query: "docker".to_owned(),
            category: None,
            limit: 10,
        })
        .await
        .unwrap();
    assert_eq!(hits.total_count, 1);

    let limited = h
        .client
        .search_terms(SearchQuery {
            query: String::new(),
            category: None,
            limit: 3,
        })
        .await
        .unwrap();
    assert_eq!(limited.total_count, 3);

    let filtered = h
        .client
        .search_terms(SearchQuery {
            query: String::new(),
            category: Some("API Design".to_owned()),
            limit: 0,
        })
        .await
        .unwrap();
    assert_eq!(filtered.terms.len(), 1);
    assert_eq!(filtered.terms[0].name, "REST");

    h.stop().await;
}

#[tokio::test]
async fn stream_delivers_every_term_then_ends() {
    let h = Harness::start().await;

    let stream = h
        .client
        .stream_terms(StreamQuery {
            category: None,
            batch_size: 2,
        })
        .await
        .unwrap();
    let ids: Vec<String> = stream.map(|t| t.unwrap().id).collect().await;
    assert_eq!(ids, ["1", "2", "3", "4", "5"]);

    h.stop().await;
}

#[tokio::test]
async fn abandoned_stream_does_not_block_shutdown() {
    let h = Harness::start().await;

    let mut stream = h
        .client
        .stream_terms(StreamQuery {
            category: None,
            batch_size: 1,
        })
        .await
        .unwrap();
    assert!(stream.next().await.is_some());
    drop(stream);

    // server keeps answering after the consumer went away
    assert_eq!(h.client.list_terms().await.unwrap().total_count, 5);
    h.stop().await;
}
