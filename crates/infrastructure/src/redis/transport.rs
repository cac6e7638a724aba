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

//! A thin retrying wrapper over a Redis connection manager.

use std::{fmt::Debug, sync::Arc};

use indexer_common::retry::{RetryConfig, RetryManager};
use redis::{Cmd, FromRedisValue, Pipeline, Value, aio::ConnectionManager};

use super::{error::CacheError, scripts::ScriptHandle};

const REDIS_EVALSHA: &str = "EVALSHA";
const REDIS_SCRIPT: &str = "SCRIPT";
const REDIS_LOAD: &str = "LOAD";
const REDIS_NOSCRIPT: &str = "NOSCRIPT";

/// Whether a request may be applied more than once without changing its outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Idempotency {
    /// Reads and absolute writes, retried on any transient failure.
    Idempotent,
    /// Increments and scripts, retried only when the request never reached the server.
    NonIdempotent,
}

impl Idempotency {
    const fn is_idempotent(self) -> bool {
        matches!(self, Self::Idempotent)
    }
}

/// Executes commands, pipelines and scripts with bounded retry.
///
/// Cloning is cheap, clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisTransport {
    con: ConnectionManager,
    retry_manager: Arc<RetryManager<CacheError>>,
}

impl Debug for RedisTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(RedisTransport))
            .field("retry", self.retry_manager.config())
            .finish()
    }
}

impl RedisTransport {
    /// Creates a new [`RedisTransport`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the retry configuration is invalid.
    pub fn new(con: ConnectionManager, retry_config: RetryConfig) -> anyhow::Result<Self> {
        Ok(Self {
            con,
            retry_manager: Arc::new(RetryManager::new(retry_config)?),
        })
    }

    /// Returns a clone of the underlying connection.
    #[must_use]
    pub fn connection(&self) -> ConnectionManager {
        self.con.clone()
    }

    /// Executes a single command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails after any permitted retries, or if the reply
    /// cannot be converted to `T`.
    pub async fn query<T: FromRedisValue>(
        &self,
        operation: &str,
        cmd: &Cmd,
        idempotency: Idempotency,
    ) -> Result<T, CacheError> {
        self.retry_manager
            .execute_with_retry(
                operation,
                || {
                    let mut con = self.con.clone();
                    async move { cmd.query_async::<T>(&mut con).await.map_err(CacheError::from) }
                },
                |e| e.is_retryable(idempotency.is_idempotent()),
                CacheError::Timeout,
            )
            .await
    }

    /// Executes a read-only pipeline in one round trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline fails after any permitted retries, or if the reply
    /// cannot be converted to `T`.
    pub async fn query_pipeline<T: FromRedisValue>(
        &self,
        operation: &str,
        pipe: &Pipeline,
    ) -> Result<T, CacheError> {
        self.retry_manager
            .execute_with_retry(
                operation,
                || {
                    let mut con = self.con.clone();
                    async move { pipe.query_async::<T>(&mut con).await.map_err(CacheError::from) }
                },
                |e| e.is_retryable(true),
                CacheError::Timeout,
            )
            .await
    }

    /// Loads `source` into the server script cache, returning the hash reported by the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the load fails after any permitted retries.
    pub async fn load_script(&self, name: &str, source: &str) -> Result<String, CacheError> {
        let mut cmd = redis::cmd(REDIS_SCRIPT);
        cmd.arg(REDIS_LOAD).arg(source);
        self.query(name, &cmd, Idempotency::Idempotent).await
    }

    /// Invokes a loaded script by hash with an explicit key count.
    ///
    /// If the server no longer holds the script (for example after a restart) it is loaded
    /// again and the invocation is repeated once.
    ///
    /// # Errors
    ///
    /// Returns an error if the invocation fails after any permitted retries.
    pub async fn invoke_script(
        &self,
        script: &ScriptHandle,
        keys: &[String],
        args: &[&[u8]],
    ) -> Result<Value, CacheError> {
        let mut cmd = redis::cmd(REDIS_EVALSHA);
        cmd.arg(script.sha()).arg(keys.len()).arg(keys).arg(args);

        match self
            .query::<Value>(script.name(), &cmd, Idempotency::NonIdempotent)
            .await
        {
            Err(CacheError::Redis(e)) if e.code() == Some(REDIS_NOSCRIPT) => {
                tracing::warn!("Script '{}' missing on server, reloading", script.name());
                script.verify(&self.load_script(script.name(), script.source()).await?)?;
                self.query::<Value>(script.name(), &cmd, Idempotency::NonIdempotent)
                    .await
            }
            result => result,
        }
    }
}
