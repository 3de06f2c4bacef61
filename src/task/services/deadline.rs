//! Per-call deadline for persistence operations.

use crate::task::ports::{TaskRepositoryError, TaskRepositoryResult};
use std::future::Future;
use std::time::Duration;

/// Upper bound on the duration of a single substrate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubstrateDeadline {
    limit: Duration,
}

impl SubstrateDeadline {
    pub(crate) const fn new(limit: Duration) -> Self {
        Self { limit }
    }

    /// Runs `operation`, failing with [`TaskRepositoryError::Timeout`] once
    /// the limit elapses.
    pub(crate) async fn run<T>(
        self,
        operation: impl Future<Output = TaskRepositoryResult<T>>,
    ) -> TaskRepositoryResult<T> {
        match tokio::time::timeout(self.limit, operation).await {
            Ok(result) => result,
            Err(_) => Err(TaskRepositoryError::Timeout(
                u64::try_from(self.limit.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }
}
