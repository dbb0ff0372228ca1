//! Retries for unary gRPC calls.
//!
//! Only transient transport failures are retried:
//! - [`Code::Unavailable`]
//! - [`Code::DeadlineExceeded`]
//!
//! Anything else is returned to the caller on the first failure.
//!
//! Callers must only route idempotent operations through [`call_with_retry`];
//! a retried mutation can be applied twice.

use std::future::Future;

use tokio::time::sleep;
use tonic::{Code, Status};
use tracing::Instrument;

use crate::client::GrpcClientConfig;

/// Whether a failed call may be attempted again.
#[must_use]
pub fn is_retryable(status: &Status) -> bool {
    matches!(status.code(), Code::Unavailable | Code::DeadlineExceeded)
}

/// Run `call` until it succeeds, fails with a non-retryable status, or the
/// retry budget in `cfg` is spent.
///
/// `call` is invoked once per attempt and must build a fresh request each
/// time (tonic requests are consumed by the call).
///
/// # Errors
/// Returns the last [`Status`] when the call does not succeed.
pub async fn call_with_retry<F, Fut, Res>(
    cfg: &GrpcClientConfig,
    op_name: &'static str,
    mut call: F,
) -> Result<Res, Status>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Res, Status>>,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let span = tracing::debug_span!("grpc_call", op = op_name, attempt);
        let result = call().instrument(span).await;

        match result {
            Ok(res) => {
                if attempt > 1 {
                    tracing::info!(op = op_name, attempt, "gRPC call succeeded after retries");
                }
                return Ok(res);
            }
            Err(status) if is_retryable(&status) && attempt <= cfg.max_retries => {
                let backoff = cfg.backoff_for(attempt);
                tracing::warn!(
                    op = op_name,
                    attempt,
                    code = ?status.code(),
                    message = %status.message(),
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    "gRPC call failed, retrying"
                );
                sleep(backoff).await;
            }
            Err(status) => {
                tracing::debug!(
                    op = op_name,
                    attempt,
                    code = ?status.code(),
                    "gRPC call giving up"
                );
                return Err(status);
            }
        }
    }
}
