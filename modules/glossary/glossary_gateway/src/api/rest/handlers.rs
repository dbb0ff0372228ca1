use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::response::Response;
use axum::{Extension, Json};
use glossary_sdk::{SearchQuery, StreamQuery};
use http::StatusCode;
use serde_json::Value;
use tracing::info;

use super::dto::{
    CreateTermReq, CreatedResponse, DeletedResponse, HealthResponse, IndexResponse, SearchHitDto,
    SearchParams, SearchResponse, StreamParams, TermDto, TermListResponse,
};
use super::error::{GatewayError, GatewayResult};
use super::sse::feed_response;
use crate::domain::{SERVICE_NAME, Service};

const DEFAULT_SEARCH_LIMIT: u32 = 10;
const DEFAULT_BATCH_SIZE: u32 = 1;

/// Service description with the list of endpoints
pub async fn index() -> Json<IndexResponse> {
    let endpoints = [
        ("GET /api/health", "Health check"),
        ("GET /api/terms", "Get all terms"),
        ("GET /api/terms/{id}", "Get term by ID"),
        ("GET /api/terms/search?q=<query>", "Search terms"),
        ("POST /api/terms", "Add new term"),
        ("DELETE /api/terms/{id}", "Delete term"),
        ("GET /api/terms/stream", "Stream terms (SSE)"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect::<BTreeMap<_, _>>();

    Json(IndexResponse {
        service: SERVICE_NAME.to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        endpoints,
    })
}

#[tracing::instrument(skip(svc))]
pub async fn health(Extension(svc): Extension<Arc<Service>>) -> GatewayResult<Json<HealthResponse>> {
    let report = svc.health().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_owned(),
        service: SERVICE_NAME.to_owned(),
        grpc_server: report.grpc_server,
        timestamp: report.timestamp,
    }))
}

#[tracing::instrument(skip(svc))]
pub async fn list_terms(
    Extension(svc): Extension<Arc<Service>>,
) -> GatewayResult<Json<TermListResponse>> {
    let list = svc.list_terms().await?;
    Ok(Json(list.into()))
}

#[tracing::instrument(skip(svc, path))]
pub async fn get_term(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<String>, PathRejection>,
) -> GatewayResult<Json<TermDto>> {
    let Path(id) = path?;
    let term = svc.get_term(&id).await?;
    Ok(Json(term.into()))
}

#[tracing::instrument(skip(svc, query))]
pub async fn search_terms(
    Extension(svc): Extension<Arc<Service>>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> GatewayResult<Json<SearchResponse>> {
    let Query(params) = query?;
    let limit = parse_count("limit", params.limit.as_deref(), DEFAULT_SEARCH_LIMIT)?;
    let list = svc
        .search_terms(SearchQuery {
            query: params.q.clone(),
            category: params.category.filter(|c| !c.is_empty()),
            limit,
        })
        .await?;

    Ok(Json(SearchResponse {
        terms: list.terms.into_iter().map(SearchHitDto::from).collect(),
        total: list.total_count,
        query: params.q,
    }))
}

#[tracing::instrument(skip(svc, body))]
pub async fn create_term(
    Extension(svc): Extension<Arc<Service>>,
    body: Bytes,
) -> GatewayResult<(StatusCode, Json<CreatedResponse>)> {
    let req = parse_create_body(&body)?;
    let outcome = svc.add_term(req.into()).await?;
    if !outcome.success {
        return Err(GatewayError::AddRejected(outcome.message));
    }

    info!(term_id = %outcome.term_id, "term created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            message: outcome.message,
            term_id: outcome.term_id,
        }),
    ))
}

#[tracing::instrument(skip(svc, path))]
pub async fn delete_term(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<String>, PathRejection>,
) -> GatewayResult<Json<DeletedResponse>> {
    let Path(id) = path?;
    let outcome = svc.delete_term(&id).await?;
    if !outcome.success {
        return Err(GatewayError::DeleteRejected(outcome.message));
    }
    Ok(Json(DeletedResponse {
        success: true,
        message: outcome.message,
    }))
}

#[tracing::instrument(skip(svc, query))]
pub async fn stream_terms(
    Extension(svc): Extension<Arc<Service>>,
    query: Result<Query<StreamParams>, QueryRejection>,
) -> GatewayResult<Response> {
    let Query(params) = query?;
    let batch_size = parse_count("batch_size", params.batch_size.as_deref(), DEFAULT_BATCH_SIZE)?;
    let feed = svc
        .open_feed(StreamQuery {
            category: params.category.filter(|c| !c.is_empty()),
            batch_size,
        })
        .await?;

    info!("New SSE connection for term stream");
    Ok(feed_response(feed))
}

/// Integer query parameter: absent means `default`, negative means `0`.
fn parse_count(name: &str, raw: Option<&str>, default: u32) -> GatewayResult<u32> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| GatewayError::invalid_param(name, raw))?;
    Ok(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

/// Missing, non-JSON, `null` and `{}` bodies all count as "no data".
fn parse_create_body(body: &[u8]) -> GatewayResult<CreateTermReq> {
    let value: Value = serde_json::from_slice(body).map_err(|_| GatewayError::no_data())?;
    match &value {
        Value::Object(map) if !map.is_empty() => {}
        Value::Object(_) | Value::Null => return Err(GatewayError::no_data()),
        _ => {
            return Err(GatewayError::BadRequest(
                "request body must be a JSON object".to_owned(),
            ));
        }
    }
    serde_json::from_value(value)
        .map_err(|e| GatewayError::BadRequest(format!("invalid request body: {e}")))
}
