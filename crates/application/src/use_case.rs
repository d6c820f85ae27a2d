//! The contract every catalog operation implements.

use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{ApplicationError, Result};

/// A single request/response operation.
///
/// Implementations are built per request from a session's repositories and
/// unit of work, then executed once.
#[async_trait]
pub trait UseCase: Send + Sync {
    type Input: Send + 'static;
    type Output: Send;

    /// Metric and span label, e.g. `create_category`.
    const NAME: &'static str;

    /// Runs the use case. Fails with [`ApplicationError::Cancelled`] as soon
    /// as `cancel` fires; pending writes are then never committed.
    async fn execute(&self, input: Self::Input, cancel: &CancellationToken) -> Result<Self::Output>;
}

/// Races `flow` against `cancel` and records the outcome.
pub(crate) async fn run_cancellable<T, F>(
    name: &'static str,
    cancel: &CancellationToken,
    flow: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let started = Instant::now();

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ApplicationError::Cancelled),
        result = flow => result,
    };

    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => err.kind(),
    };
    metrics::counter!("catalog_use_case_total", "use_case" => name, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("catalog_use_case_duration_seconds", "use_case" => name)
        .record(started.elapsed().as_secs_f64());

    if let Err(err) = &result {
        tracing::debug!(use_case = name, error = %err, "use case failed");
    }
    result
}
