//! gRPC Server implementation for the glossary
//!
//! Decodes requests, delegates to the domain Service and maps
//! `DomainError` onto gRPC status codes.

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use glossary_sdk::convert::{non_negative, optional_category};
use glossary_sdk::{GlossaryService, NewTerm, proto};
use tonic::{Request, Response, Status};

use crate::domain::{DomainError, Service};

/// Server-streaming response type of `StreamTerms`.
pub type TermStreamResponse = Pin<Box<dyn Stream<Item = Result<proto::Term, Status>> + Send>>;

/// Internal failures are logged here and leave the process with a fixed message.
impl From<DomainError> for Status {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::TermNotFound { .. } => Status::not_found(e.to_string()),
            DomainError::Validation { .. } => Status::invalid_argument(e.to_string()),
            DomainError::Internal { message } => {
                tracing::error!(error = %message, "glossary request failed");
                Status::internal("Internal storage error")
            }
        }
    }
}

/// gRPC service implementation that wraps the domain Service.
#[derive(Clone)]
pub struct GlossaryServiceImpl {
    service: Arc<Service>,
}

impl GlossaryServiceImpl {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl GlossaryService for GlossaryServiceImpl {
    async fn get_term(
        &self,
        request: Request<proto::TermRequest>,
    ) -> Result<Response<proto::Term>, Status> {
        let req = request.into_inner();
        let term = self.service.get_term(&req.id).await?;
        Ok(Response::new(term.into()))
    }

    async fn get_all_terms(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::TermList>, Status> {
        let list = self.service.list_terms().await?;
        Ok(Response::new(list.into()))
    }

    async fn search_terms(
        &self,
        request: Request<proto::SearchRequest>,
    ) -> Result<Response<proto::TermList>, Status> {
        let req = request.into_inner();
        let category = optional_category(req.category);
        let limit = non_negative(req.limit);

        let list = self
            .service
            .search_terms(&req.query, category.as_deref(), limit)
            .await?;
        Ok(Response::new(list.into()))
    }

    async fn add_term(
        &self,
        request: Request<proto::AddTermRequest>,
    ) -> Result<Response<proto::OperationResponse>, Status> {
        let new_term = NewTerm::from(request.into_inner());
        let outcome = self.service.add_term(new_term).await;
        Ok(Response::new(outcome.into()))
    }

    async fn delete_term(
        &self,
        request: Request<proto::TermRequest>,
    ) -> Result<Response<proto::OperationResponse>, Status> {
        let req = request.into_inner();
        let outcome = self.service.delete_term(&req.id).await?;
        Ok(Response::new(outcome.into()))
    }

    type StreamTermsStream = TermStreamResponse;

    async fn stream_terms(
        &self,
        request: Request<proto::StreamRequest>,
    ) -> Result<Response<Self::StreamTermsStream>, Status> {
        let req = request.into_inner();
        let category = optional_category(req.category);
        let batch_size = non_negative(req.batch_size);

        // producer handle is detached; dropping the stream stops it
        let feed = self
            .service
            .stream_terms(category.as_deref(), batch_size)
            .await?;
        let stream: Self::StreamTermsStream =
            Box::pin(feed.stream.map(|term| Ok(proto::Term::from(term))));
        Ok(Response::new(stream))
    }
}
