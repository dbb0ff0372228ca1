//! gRPC client implementation of `GlossaryClientV1`

use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use tonic::transport::Channel;
use transport_grpc::client::{GrpcClientConfig, connect_lazy, connect_with_retry};
use transport_grpc::rpc_retry::call_with_retry;

use crate::api::{GlossaryClientV1, TermStream};
use crate::errors::GlossaryError;
use crate::models::{NewTerm, OperationOutcome, SearchQuery, StreamQuery, Term, TermList};
use crate::proto;
use crate::proto::glossary_service_client::GlossaryServiceClient;

/// gRPC client for the glossary service.
///
/// Cloning is cheap; all clones multiplex over the same channel.
#[derive(Clone)]
pub struct GlossaryGrpcClient {
    inner: GlossaryServiceClient<Channel>,
    cfg: GrpcClientConfig,
}

impl GlossaryGrpcClient {
    /// Build a client over a lazily connected channel.
    ///
    /// Never dials during construction; an unreachable service surfaces as
    /// [`GlossaryError::Unavailable`] on each call.
    ///
    /// # Errors
    /// Returns an error if `uri` is invalid.
    pub fn connect_lazy(uri: impl Into<String>, cfg: GrpcClientConfig) -> Result<Self> {
        let channel = connect_lazy(uri, &cfg)?;
        Ok(Self {
            inner: GlossaryServiceClient::new(channel),
            cfg,
        })
    }

    /// Connect eagerly, retrying per `cfg`.
    ///
    /// # Errors
    /// Returns an error if no connection could be established.
    pub async fn connect(uri: impl Into<String>, cfg: GrpcClientConfig) -> Result<Self> {
        let channel: Channel = connect_with_retry(uri, &cfg).await?;
        Ok(Self {
            inner: GlossaryServiceClient::new(channel),
            cfg,
        })
    }
}

#[async_trait]
impl GlossaryClientV1 for GlossaryGrpcClient {
    async fn get_term(&self, id: &str) -> Result<Term, GlossaryError> {
        let term = call_with_retry(&self.cfg, "glossary.get_term", || {
            let mut client = self.inner.clone();
            let request = proto::TermRequest { id: id.to_owned() };
            async move { client.get_term(request).await.map(tonic::Response::into_inner) }
        })
        .await?;

        Ok(term.into())
    }

    async fn list_terms(&self) -> Result<TermList, GlossaryError> {
        let list = call_with_retry(&self.cfg, "glossary.get_all_terms", || {
            let mut client = self.inner.clone();
            async move {
                client
                    .get_all_terms(proto::Empty {})
                    .await
                    .map(tonic::Response::into_inner)
            }
        })
        .await?;

        Ok(list.into())
    }

    async fn search_terms(&self, query: SearchQuery) -> Result<TermList, GlossaryError> {
        let request = proto::SearchRequest {
            query: query.query,
            category: query.category.unwrap_or_default(),
            limit: i32::try_from(query.limit).unwrap_or(i32::MAX),
        };

        let list = call_with_retry(&self.cfg, "glossary.search_terms", || {
            let mut client = self.inner.clone();
            let request = request.clone();
            async move {
                client
                    .search_terms(request)
                    .await
                    .map(tonic::Response::into_inner)
            }
        })
        .await?;

        Ok(list.into())
    }

    async fn add_term(&self, new_term: NewTerm) -> Result<OperationOutcome, GlossaryError> {
        let mut client = self.inner.clone();
        let response = client
            .add_term(proto::AddTermRequest::from(new_term))
            .await?
            .into_inner();
        Ok(response.into())
    }

    async fn delete_term(&self, id: &str) -> Result<OperationOutcome, GlossaryError> {
        let mut client = self.inner.clone();
        let response = client
            .delete_term(proto::TermRequest { id: id.to_owned() })
            .await?
            .into_inner();
        Ok(response.into())
    }

    async fn stream_terms(&self, query: StreamQuery) -> Result<TermStream, GlossaryError> {
        let mut client = self.inner.clone();
        let request = proto::StreamRequest {
            category: query.category.unwrap_or_default(),
            batch_size: i32::try_from(query.batch_size).unwrap_or(i32::MAX),
        };

        let stream = client.stream_terms(request).await?.into_inner();
        tracing::debug!("glossary term stream opened");

        Ok(Box::pin(stream.map(|item| {
            item.map(Term::from).map_err(GlossaryError::from)
        })))
    }

    async fn probe(&self) -> Result<(), GlossaryError> {
        let mut client = self.inner.clone();
        client.get_all_terms(proto::Empty {}).await?;
        Ok(())
    }
}
