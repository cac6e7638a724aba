// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Bounded retry for store operations.
//!
//! Failed attempts are reported at info level while the attempt count is at or below the
//! configured `error_threshold`, and at error level once past it. The final failure is
//! always returned to the caller.

use std::{future::Future, marker::PhantomData, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::backoff::ExponentialBackoff;

/// Configuration for retry behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (total attempts = 1 initial + max_retries).
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
    /// Backoff multiplier factor.
    pub backoff_factor: f64,
    /// Maximum jitter in milliseconds to add to delays.
    pub jitter_ms: u64,
    /// Optional timeout for individual operations in milliseconds.
    pub operation_timeout_ms: Option<u64>,
    /// Failed attempts up to this count are logged at info level, later ones at error level.
    pub error_threshold: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 5_000,
            backoff_factor: 2.0,
            jitter_ms: 50,
            operation_timeout_ms: Some(10_000),
            error_threshold: 3,
        }
    }
}

/// Generic retry manager for store operations.
///
/// Stateless: each call to [`RetryManager::execute_with_retry`] gets its own backoff state.
#[derive(Debug)]
pub struct RetryManager<E> {
    config: RetryConfig,
    _phantom: PhantomData<E>,
}

impl<E> RetryManager<E>
where
    E: std::error::Error,
{
    /// Creates a new retry manager with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backoff parameters of `config` are invalid.
    pub fn new(config: RetryConfig) -> anyhow::Result<Self> {
        ExponentialBackoff::new(
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_millis(config.max_delay_ms),
            config.backoff_factor,
            config.jitter_ms,
        )?;

        Ok(Self {
            config,
            _phantom: PhantomData,
        })
    }

    /// Returns the configuration for this manager.
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Executes an operation with retry logic.
    ///
    /// # Errors
    ///
    /// Returns the last error if the operation fails with a non-retryable error, or after
    /// exhausting all retries, or if the operation times out on its final attempt.
    pub async fn execute_with_retry<F, Fut, T>(
        &self,
        operation_name: &str,
        mut operation: F,
        should_retry: impl Fn(&E) -> bool,
        create_timeout_error: impl Fn(String) -> E,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut backoff = ExponentialBackoff::new(
            Duration::from_millis(self.config.initial_delay_ms),
            Duration::from_millis(self.config.max_delay_ms),
            self.config.backoff_factor,
            self.config.jitter_ms,
        )
        .map_err(|e| create_timeout_error(format!("Failed to create backoff: {e}")))?;

        let mut attempt: u32 = 0;

        loop {
            let result = if let Some(timeout_ms) = self.config.operation_timeout_ms {
                match tokio::time::timeout(Duration::from_millis(timeout_ms), operation()).await {
                    Ok(result) => result,
                    Err(_) => Err(create_timeout_error(format!(
                        "Operation '{operation_name}' timed out after {timeout_ms}ms"
                    ))),
                }
            } else {
                operation().await
            };

            let error = match result {
                Ok(success) => {
                    if attempt > 0 {
                        tracing::debug!(
                            "Operation '{operation_name}' succeeded after {} attempts",
                            attempt + 1
                        );
                    }
                    return Ok(success);
                }
                Err(e) => e,
            };

            if !should_retry(&error) {
                tracing::debug!(
                    "Operation '{operation_name}' failed with non-retryable error: {error}"
                );
                return Err(error);
            }

            attempt += 1;

            if attempt > self.config.max_retries {
                tracing::error!(
                    attempt,
                    "Operation '{operation_name}' failed after {attempt} attempts: {error}"
                );
                return Err(error);
            }

            let delay = backoff.next_duration();
            if self.is_below_error_threshold(attempt) {
                tracing::info!(
                    attempt,
                    "Operation '{operation_name}' failed, retrying in {delay:?}: {error}"
                );
            } else {
                tracing::error!(
                    attempt,
                    "Operation '{operation_name}' failed, retrying in {delay:?}: {error}"
                );
            }

            sleep(delay).await;
        }
    }

    /// Returns whether a failure on the given 1-based `attempt` is still reported at info level.
    #[must_use]
    pub const fn is_below_error_threshold(&self, attempt: u32) -> bool {
        attempt <= self.config.error_threshold
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use rstest::rstest;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("Retryable error: {0}")]
        Retryable(String),
        #[error("Non-retryable error: {0}")]
        NonRetryable(String),
        #[error("Timeout error: {0}")]
        Timeout(String),
    }

    fn should_retry_test_error(error: &TestError) -> bool {
        matches!(error, TestError::Retryable(_) | TestError::Timeout(_))
    }

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_factor: 2.0,
            jitter_ms: 0,
            operation_timeout_ms: Some(1_000),
            error_threshold: 1,
        }
    }

    #[rstest]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.error_threshold, 3);
        assert_eq!(config.operation_timeout_ms, Some(10_000));
    }

    #[rstest]
    fn test_retry_manager_rejects_invalid_backoff() {
        let config = RetryConfig {
            backoff_factor: 0.1,
            ..Default::default()
        };
        assert!(RetryManager::<TestError>::new(config).is_err());
    }

    #[rstest]
    #[case(1, true)]
    #[case(3, true)]
    #[case(4, false)]
    fn test_is_below_error_threshold(#[case] attempt: u32, #[case] expected: bool) {
        let manager = RetryManager::<TestError>::new(RetryConfig::default()).unwrap();
        assert_eq!(manager.is_below_error_threshold(attempt), expected);
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let manager = RetryManager::new(fast_config(3)).unwrap();
        let result = manager
            .execute_with_retry(
                "get",
                || async { Ok::<i32, TestError>(42) },
                should_retry_test_error,
                TestError::Timeout,
            )
            .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_success_after_transient_failures() {
        let manager = RetryManager::new(fast_config(3)).unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let result = manager
            .execute_with_retry(
                "get",
                || {
                    let calls = calls.clone();
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < 2 {
                            Err(TestError::Retryable("connection refused".to_string()))
                        } else {
                            Ok(n)
                        }
                    }
                },
                should_retry_test_error,
                TestError::Timeout,
            )
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausted_returns_last_error() {
        let manager = RetryManager::new(fast_config(2)).unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), TestError> = manager
            .execute_with_retry(
                "set",
                || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(TestError::Retryable("connection reset".to_string()))
                    }
                },
                should_retry_test_error,
                TestError::Timeout,
            )
            .await;

        assert!(matches!(result, Err(TestError::Retryable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_fast() {
        let manager = RetryManager::new(fast_config(5)).unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), TestError> = manager
            .execute_with_retry(
                "evalsha",
                || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(TestError::NonRetryable("wrong type".to_string()))
                    }
                },
                should_retry_test_error,
                TestError::Timeout,
            )
            .await;

        assert!(matches!(result, Err(TestError::NonRetryable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_operation_timeout_is_retried_then_surfaced() {
        let config = RetryConfig {
            operation_timeout_ms: Some(5),
            ..fast_config(1)
        };
        let manager = RetryManager::new(config).unwrap();

        let result: Result<(), TestError> = manager
            .execute_with_retry(
                "hgetall",
                || async {
                    sleep(Duration::from_millis(100)).await;
                    Ok(())
                },
                should_retry_test_error,
                TestError::Timeout,
            )
            .await;

        assert!(matches!(result, Err(TestError::Timeout(_))));
    }
}
