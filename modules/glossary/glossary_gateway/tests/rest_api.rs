#![allow(clippy::unwrap_used, clippy::expect_used)]

//! REST surface against a scripted `GlossaryClientV1`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use futures::stream;
use glossary_gateway::{GatewayConfig, GatewayModule};
use glossary_sdk::{
    GlossaryClientV1, GlossaryError, NewTerm, OperationOutcome, SearchQuery, StreamQuery, Term,
    TermList, TermStream,
};
use http::{Request, StatusCode, header};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Default)]
struct ScriptedClient {
    terms: Vec<Term>,
    /// Appended to the term stream after all terms.
    stream_error: Option<GlossaryError>,
    added: Mutex<Vec<NewTerm>>,
    last_search: Mutex<Option<SearchQuery>>,
    last_stream: Mutex<Option<StreamQuery>>,
}

fn term(id: &str, name: &str, definition: &str) -> Term {
    Term {
        id: id.to_owned(),
        name: name.to_owned(),
        definition: definition.to_owned(),
        category: "Testing".to_owned(),
        examples: vec!["example".to_owned()],
        synonyms: vec![],
        created_at: "2026-01-01T00:00:00Z".to_owned(),
        updated_at: "2026-01-01T00:00:00Z".to_owned(),
    }
}

#[async_trait]
impl GlossaryClientV1 for ScriptedClient {
    async fn get_term(&self, id: &str) -> Result<Term, GlossaryError> {
        self.terms
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| GlossaryError::NotFound(format!("Term with id {id} not found")))
    }

    async fn list_terms(&self) -> Result<TermList, GlossaryError> {
        Ok(TermList::from(self.terms.clone()))
    }

    async fn search_terms(&self, query: SearchQuery) -> Result<TermList, GlossaryError> {
        *self.last_search.lock() = Some(query);
        Ok(TermList::from(self.terms.clone()))
    }

    async fn add_term(&self, new_term: NewTerm) -> Result<OperationOutcome, GlossaryError> {
        if new_term.name.is_empty() {
            return Ok(OperationOutcome {
                success: false,
                message: "Validation failed: name: must not be empty".to_owned(),
                term_id: String::new(),
            });
        }
        self.added.lock().push(new_term);
        Ok(OperationOutcome {
            success: true,
            message: "Term added successfully".to_owned(),
            term_id: "42".to_owned(),
        })
    }

    async fn delete_term(&self, id: &str) -> Result<OperationOutcome, GlossaryError> {
        let found = self.terms.iter().any(|t| t.id == id);
        Ok(OperationOutcome {
            success: found,
            message: if found {
                "Term deleted successfully".to_owned()
            } else {
                format!("Term with id {id} not found")
            },
            term_id: id.to_owned(),
        })
    }

    async fn stream_terms(&self, query: StreamQuery) -> Result<TermStream, GlossaryError> {
        *self.last_stream.lock() = Some(query);
        let mut items: Vec<Result<Term, GlossaryError>> =
            self.terms.iter().cloned().map(Ok).collect();
        if let Some(e) = &self.stream_error {
            items.push(Err(e.clone()));
            items.push(Ok(term("99", "after-error", "never sent")));
        }
        Ok(Box::pin(stream::iter(items)))
    }
}

fn app(client: Arc<ScriptedClient>) -> Router {
    GatewayModule::with_client(client, &GatewayConfig::default())
        .unwrap()
        .router()
}

fn seeded() -> Arc<ScriptedClient> {
    Arc::new(ScriptedClient {
        terms: vec![
            term("1", "Protobuf", "Serialization format"),
            term("2", "gRPC", &"g".repeat(150)),
        ],
        ..Default::default()
    })
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

#[tokio::test]
async fn index_lists_endpoints() {
    let (status, body) = send(app(seeded()), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "Glossary API Gateway");
    assert!(body["endpoints"]["GET /api/terms/stream"].is_string());
}

#[tokio::test]
async fn health_reports_upstream() {
    let (status, body) = send(app(seeded()), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["grpc_server"], "http://127.0.0.1:50051");
    assert!(body["timestamp"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn list_and_get() {
    let (status, body) = send(app(seeded()), get("/api/terms")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["terms"][0]["name"], "Protobuf");
    assert_eq!(body["terms"][0]["created_at"], "2026-01-01T00:00:00Z");

    let (status, body) = send(app(seeded()), get("/api/terms/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "2");
    assert_eq!(body["definition"].as_str().unwrap().len(), 150);
}

#[tokio::test]
async fn missing_term_is_404_with_error() {
    let (status, body) = send(app(seeded()), get("/api/terms/77")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Term with id 77 not found");
}

#[tokio::test]
async fn search_passes_params_and_hides_timestamps() {
    let client = seeded();
    let (status, body) = send(
        app(Arc::clone(&client)),
        get("/api/terms/search?q=proto&category=Testing"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "proto");
    assert_eq!(body["total"], 2);
    assert!(body["terms"][0].get("created_at").is_none());

    let seen = client.last_search.lock().clone().unwrap();
    assert_eq!(seen.query, "proto");
    assert_eq!(seen.category.as_deref(), Some("Testing"));
    assert_eq!(seen.limit, 10);
}

#[tokio::test]
async fn search_rejects_non_integer_limit() {
    let (status, body) = send(app(seeded()), get("/api/terms/search?q=x&limit=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn create_returns_201() {
    let client = seeded();
    let (status, body) = send(
        app(Arc::clone(&client)),
        post_json(
            "/api/terms",
            r#"{"name":"Kubernetes","definition":"Orchestration","category":"Containerization","synonyms":["K8s"]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"success": true, "message": "Term added successfully", "term_id": "42"}));

    let added = client.added.lock().clone();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].category, "Containerization");
    assert_eq!(added[0].synonyms, ["K8s"]);
}

#[tokio::test]
async fn create_without_body_is_400() {
    let (status, body) = send(app(seeded()), post_json("/api/terms", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No data provided"}));
}

#[tokio::test]
async fn rejected_create_is_400_with_success_false() {
    let (status, body) = send(
        app(seeded()),
        post_json("/api/terms", r#"{"definition":"no name"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn delete_found_and_missing() {
    let req = |id: &str| {
        Request::delete(format!("/api/terms/{id}"))
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(app(seeded()), req("1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Term deleted successfully"}));

    let (status, body) = send(app(seeded()), req("9")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Term with id 9 not found"}));
}

async fn sse_payloads(app: Router, uri: &str) -> (http::HeaderMap, Vec<Value>) {
    let resp = app.oneshot(get(uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let payloads = text
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).unwrap())
        .collect();
    (headers, payloads)
}

#[tokio::test]
async fn stream_relays_truncated_terms() {
    let client = seeded();
    let (headers, events) = sse_payloads(
        app(Arc::clone(&client)),
        "/api/terms/stream?category=Testing&batch_size=2",
    )
    .await;

    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers["x-accel-buffering"], "no");

    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        json!({"id": "1", "name": "Protobuf", "definition": "Serialization format", "category": "Testing"})
    );
    let truncated = events[1]["definition"].as_str().unwrap();
    assert_eq!(truncated, format!("{}...", "g".repeat(100)));

    let seen = client.last_stream.lock().clone().unwrap();
    assert_eq!(seen.batch_size, 2);
    assert_eq!(seen.category.as_deref(), Some("Testing"));
}

#[tokio::test]
async fn stream_ends_with_one_error_event() {
    let client = Arc::new(ScriptedClient {
        terms: vec![term("1", "Protobuf", "short")],
        stream_error: Some(GlossaryError::Internal("storage exploded".to_owned())),
        ..Default::default()
    });
    let (_, events) = sse_payloads(app(client), "/api/terms/stream").await;

    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["id"], "1");
    assert!(events[1]["error"].as_str().unwrap().contains("storage exploded"));
}

#[tokio::test]
async fn stream_rejects_non_integer_batch_size() {
    let (status, body) = send(app(seeded()), get("/api/terms/stream?batch_size=two")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("batch_size"));
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let req = Request::options("/api/terms")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let resp = app(seeded()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn malformed_query_strings_get_json_errors() {
    for uri in [
        "/api/terms/search?q=a&q=b",
        "/api/terms/stream?batch_size=1&batch_size=2",
    ] {
        let resp = app(seeded()).oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert!(
            resp.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/json"),
            "{uri}"
        );
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(
            body["error"].as_str().unwrap().contains("duplicate field"),
            "{uri}: {body}"
        );
    }
}
