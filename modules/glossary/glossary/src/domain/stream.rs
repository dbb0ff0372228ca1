//! Batched term feed backing `StreamTerms`.
//!
//! A producer task pushes the precomputed candidates into a bounded channel,
//! one batch per step. Dropping the receiving side stops the producer before
//! its next batch; a consumer that stops reading for longer than the idle
//! timeout stops it as well.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use glossary_sdk::Term;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

/// How a producer finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    Completed { delivered: usize },
    Cancelled { delivered: usize },
    /// The consumer kept the stream open without reading from it.
    TimedOut { delivered: usize },
}

/// Channel capacity and the longest wait for the consumer to take a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedLimits {
    pub buffer: usize,
    pub idle_timeout: Duration,
}

impl Default for FeedLimits {
    fn default() -> Self {
        Self {
            buffer: 16,
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// Counters over every feed started by one service.
#[derive(Debug, Default)]
pub struct FeedStats {
    active: AtomicUsize,
    completed: AtomicU64,
    cancelled: AtomicU64,
    timed_out: AtomicU64,
}

/// Point-in-time copy of [`FeedStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedStatsSnapshot {
    pub active: usize,
    pub completed: u64,
    pub cancelled: u64,
    pub timed_out: u64,
}

impl FeedStats {
    fn started(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    fn finished(&self, outcome: FeedOutcome) {
        let counter = match outcome {
            FeedOutcome::Completed { .. } => &self.completed,
            FeedOutcome::Cancelled { .. } => &self.cancelled,
            FeedOutcome::TimedOut { .. } => &self.timed_out,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> FeedStatsSnapshot {
        FeedStatsSnapshot {
            active: self.active.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::SeqCst),
            cancelled: self.cancelled.load(Ordering::SeqCst),
            timed_out: self.timed_out.load(Ordering::SeqCst),
        }
    }
}

/// Consumer half plus the producer handle.
pub struct TermFeed {
    pub stream: ReceiverStream<Term>,
    pub producer: JoinHandle<FeedOutcome>,
}

impl TermFeed {
    /// Start producing `candidates` in groups of `batch_size` (`0` is treated as `1`).
    ///
    /// The outcome is recorded in `stats` before the producer returns.
    /// Must be called inside a Tokio runtime.
    pub fn spawn(
        candidates: Vec<Term>,
        batch_size: usize,
        limits: FeedLimits,
        stats: Arc<FeedStats>,
    ) -> Self {
        let batch_size = batch_size.max(1);
        let (tx, rx) = mpsc::channel(limits.buffer.max(1));

        stats.started();
        let producer = tokio::spawn(async move {
            let outcome = produce(tx, candidates, batch_size, limits.idle_timeout).await;
            stats.finished(outcome);
            outcome
        });

        Self {
            stream: ReceiverStream::new(rx),
            producer,
        }
    }
}

async fn produce(
    tx: mpsc::Sender<Term>,
    candidates: Vec<Term>,
    batch_size: usize,
    idle_timeout: Duration,
) -> FeedOutcome {
    let mut delivered = 0usize;
    let mut remaining = candidates.into_iter().peekable();

    while remaining.peek().is_some() {
        if tx.is_closed() {
            debug!(delivered, "term feed cancelled by consumer");
            return FeedOutcome::Cancelled { delivered };
        }
        for term in remaining.by_ref().take(batch_size) {
            match tx.send_timeout(term, idle_timeout).await {
                Ok(()) => delivered += 1,
                Err(SendTimeoutError::Closed(_)) => {
                    debug!(delivered, "term feed cancelled by consumer");
                    return FeedOutcome::Cancelled { delivered };
                }
                Err(SendTimeoutError::Timeout(_)) => {
                    warn!(delivered, ?idle_timeout, "term feed consumer idle, giving up");
                    return FeedOutcome::TimedOut { delivered };
                }
            }
        }
        tokio::task::yield_now().await;
    }

    debug!(delivered, "term feed completed");
    FeedOutcome::Completed { delivered }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use tokio_stream::StreamExt;

    use super::*;

    fn terms(n: usize) -> Vec<Term> {
        (1..=n)
            .map(|i| Term {
                id: i.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn limits(buffer: usize) -> FeedLimits {
        FeedLimits {
            buffer,
            ..FeedLimits::default()
        }
    }

    #[tokio::test]
    async fn delivers_everything_in_order() {
        let stats = Arc::new(FeedStats::default());
        let feed = TermFeed::spawn(terms(7), 3, limits(2), Arc::clone(&stats));
        let ids: Vec<String> = feed.stream.map(|t| t.id).collect().await;
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7"]);
        assert_eq!(
            feed.producer.await.unwrap(),
            FeedOutcome::Completed { delivered: 7 }
        );
        assert_eq!(
            stats.snapshot(),
            FeedStatsSnapshot {
                completed: 1,
                ..FeedStatsSnapshot::default()
            }
        );
    }

    #[tokio::test]
    async fn zero_batch_size_behaves_like_one() {
        let feed = TermFeed::spawn(terms(2), 0, limits(1), Arc::default());
        let ids: Vec<String> = feed.stream.map(|t| t.id).collect().await;
        assert_eq!(ids, ["1", "2"]);
    }

    #[tokio::test]
    async fn empty_candidates_end_immediately() {
        let mut feed = TermFeed::spawn(Vec::new(), 1, limits(1), Arc::default());
        assert!(feed.stream.next().await.is_none());
        assert_eq!(
            feed.producer.await.unwrap(),
            FeedOutcome::Completed { delivered: 0 }
        );
    }

    #[tokio::test]
    async fn dropping_the_stream_stops_the_producer() {
        let stats = Arc::new(FeedStats::default());
        let TermFeed {
            mut stream,
            producer,
        } = TermFeed::spawn(terms(1000), 1, limits(1), Arc::clone(&stats));

        let first = stream.next().await.unwrap();
        assert_eq!(first.id, "1");
        drop(stream);

        let outcome = tokio::time::timeout(Duration::from_secs(2), producer)
            .await
            .expect("producer kept running")
            .unwrap();
        match outcome {
            FeedOutcome::Cancelled { delivered } => assert!(delivered < 1000),
            other => panic!("feed should have been cancelled, got {other:?}"),
        }
        assert_eq!(stats.snapshot().cancelled, 1);
        assert_eq!(stats.snapshot().active, 0);
    }

    #[tokio::test]
    async fn unread_stream_times_out_the_producer() {
        let stats = Arc::new(FeedStats::default());
        let limits = FeedLimits {
            buffer: 1,
            idle_timeout: Duration::from_millis(50),
        };
        let TermFeed { stream, producer } =
            TermFeed::spawn(terms(100), 1, limits, Arc::clone(&stats));
        assert_eq!(stats.snapshot().active, 1);

        // consumer stays alive but never reads
        let outcome = tokio::time::timeout(Duration::from_secs(3), producer)
            .await
            .expect("producer kept running for an idle consumer")
            .unwrap();
        assert_eq!(outcome, FeedOutcome::TimedOut { delivered: 1 });
        assert_eq!(stats.snapshot().timed_out, 1);
        assert_eq!(stats.snapshot().active, 0);
        drop(stream);
    }
}
