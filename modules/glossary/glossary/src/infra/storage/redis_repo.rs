//! Durable store on Redis.
//!
//! Key layout:
//! - `term:{id}`: hash with the fields from [`super::record`]
//! - `term:list`: set of every id
//! - `category:{name}`: set of ids in that category
//! - `term:counter`: last assigned id, advanced with `INCR`
//!
//! Multi-key writes go through `MULTI`/`EXEC` pipelines so that the three
//! structures never diverge.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use glossary_sdk::{NewTerm, Term};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use super::now_rfc3339;
use super::record::{self, FIELD_CATEGORY};
use super::seed::{SEED_MAX_ID, seed_terms};
use crate::domain::error::RepositoryError;
use crate::domain::repo::{TermsRepository, id_order};

pub const TERM_LIST_KEY: &str = "term:list";
pub const COUNTER_KEY: &str = "term:counter";

pub fn term_key(id: &str) -> String {
    format!("term:{id}")
}

pub fn category_key(category: &str) -> String {
    format!("category:{category}")
}

impl From<redis::RedisError> for RepositoryError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
        {
            Self::Unavailable(e.to_string())
        } else {
            Self::Backend(e.to_string())
        }
    }
}

/// Redis-backed [`TermsRepository`]. Clones share one auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisTermsRepository {
    conn: ConnectionManager,
}

impl RedisTermsRepository {
    /// Connect, verify with `PING` and seed an empty database.
    ///
    /// `timeout` bounds connection and `PING` together.
    ///
    /// # Errors
    /// [`RepositoryError::Unavailable`] when the server does not answer in time.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, RepositoryError> {
        let client = redis::Client::open(url)
            .map_err(|e| RepositoryError::Unavailable(format!("invalid redis url: {e}")))?;

        let handshake = async {
            let mut conn = client.get_connection_manager().await?;
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(conn)
        };
        let conn = tokio::time::timeout(timeout, handshake)
            .await
            .map_err(|_| {
                RepositoryError::Unavailable(format!(
                    "no answer within {}ms",
                    timeout.as_millis()
                ))
            })??;

        let repo = Self { conn };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Seed once per database and make sure the counter is past the seed ids.
    async fn initialize(&self) -> Result<(), RepositoryError> {
        let mut conn = self.conn.clone();

        let seeded: bool = conn.exists(TERM_LIST_KEY).await?;
        if seeded {
            debug!("redis catalog already initialized");
        } else {
            let now = now_rfc3339()?;
            let terms = seed_terms(&now);
            let mut pipe = redis::pipe();
            pipe.atomic();
            for term in &terms {
                let fields = record::to_fields(term)?;
                pipe.hset_multiple(term_key(&term.id), fields.as_slice())
                    .ignore();
                pipe.sadd(TERM_LIST_KEY, &term.id).ignore();
                pipe.sadd(category_key(&term.category), &term.id).ignore();
            }
            pipe.query_async::<()>(&mut conn).await?;
            info!(count = terms.len(), "seeded redis catalog");
        }

        let _: bool = conn.set_nx(COUNTER_KEY, SEED_MAX_ID).await?;
        Ok(())
    }
}

#[async_trait]
impl TermsRepository for RedisTermsRepository {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, id: &str) -> Result<Option<Term>, RepositoryError> {
        let mut conn = self.conn.clone();
        let fields = conn.hgetall(term_key(id)).await?;
        Ok(record::from_fields(id, fields))
    }

    async fn list(&self) -> Result<Vec<Term>, RepositoryError> {
        let mut conn = self.conn.clone();
        let mut ids: Vec<String> = conn.smembers(TERM_LIST_KEY).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        ids.sort_by(|a, b| id_order(a, b));

        let mut pipe = redis::pipe();
        for id in &ids {
            pipe.hgetall(term_key(id));
        }
        let rows: Vec<HashMap<String, String>> =
            pipe.query_async(&mut conn).await?;

        let mut terms = Vec::with_capacity(ids.len());
        for (id, fields) in ids.iter().zip(rows) {
            // a concurrent delete can leave the id listed for a moment
            if let Some(term) = record::from_fields(id, fields) {
                terms.push(term);
            }
        }
        Ok(terms)
    }

    async fn add(&self, new_term: NewTerm) -> Result<String, RepositoryError> {
        let mut conn = self.conn.clone();
        let now = now_rfc3339()?;
        let category = new_term.effective_category().to_owned();

        let next: u64 = conn.incr(COUNTER_KEY, 1).await?;
        let term = Term {
            id: next.to_string(),
            name: new_term.name,
            definition: new_term.definition,
            category,
            examples: new_term.examples,
            synonyms: new_term.synonyms,
            created_at: now.clone(),
            updated_at: now,
        };
        let fields = record::to_fields(&term)?;

        redis::pipe()
            .atomic()
            .hset_multiple(term_key(&term.id), fields.as_slice())
            .ignore()
            .sadd(TERM_LIST_KEY, &term.id)
            .ignore()
            .sadd(category_key(&term.category), &term.id)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        Ok(term.id)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.conn.clone();
        let key = term_key(id);

        let category: Option<String> = conn.hget(&key, FIELD_CATEGORY).await?;
        let Some(category) = category else {
            return Ok(false);
        };

        let (removed,): (u64,) = redis::pipe()
            .atomic()
            .del(&key)
            .srem(TERM_LIST_KEY, id)
            .ignore()
            .srem(category_key(&category), id)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(removed > 0)
    }

    async fn category_members(&self, category: &str) -> Result<Vec<String>, RepositoryError> {
        let mut conn = self.conn.clone();
        let mut ids: Vec<String> = conn.smembers(category_key(category)).await?;
        ids.sort_by(|a, b| id_order(a, b));
        Ok(ids)
    }
}
