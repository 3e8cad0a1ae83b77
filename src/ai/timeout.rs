//! Per-request timeout for external generation calls.
//!
//! An expired call becomes [`CrewError::Timeout`], which the orchestrator
//! records as an ordinary per-item failure.

use std::future::Future;
use std::time::Duration;

use crate::types::{CrewError, Result};

/// Execute an async operation with a timeout
///
/// ```ignore
/// let response = with_timeout(
///     config.timeout(),
///     provider.generate(&request),
///     "generate skill:testing",
/// )
/// .await?;
/// ```
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(CrewError::timeout(operation_name, timeout)),
    }
}
