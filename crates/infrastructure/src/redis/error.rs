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

use indexer_model::{
    enums::OrderSide,
    error::{InvalidOptionsError, OrderValidationError, RuntimeStateParseError},
};
use redis::RedisError;
use rust_decimal::Decimal;
use ustr::Ustr;

/// Errors returned by the Redis backed caches.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Validation(#[from] OrderValidationError),
    #[error(transparent)]
    InvalidOptions(#[from] InvalidOptionsError),
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Unexpected reply from '{operation}': {reply}")]
    UnexpectedReply {
        operation: &'static str,
        reply: String,
    },
    #[error("Corrupt runtime state: {0}")]
    CorruptRuntimeState(#[from] RuntimeStateParseError),
    #[error(
        "Invalid price level update for {ticker} {side} {price}: delta {delta} would leave \
         {attempted} quantums, restored to {restored}"
    )]
    InvalidPriceLevelUpdate {
        ticker: Ustr,
        side: OrderSide,
        price: Decimal,
        delta: i64,
        attempted: i64,
        restored: i64,
    },
    #[error("Script '{name}' hash mismatch: expected {expected}, server returned {actual}")]
    ScriptHashMismatch {
        name: &'static str,
        expected: String,
        actual: String,
    },
}

impl CacheError {
    /// Returns whether the error is transient and the request may be retried.
    ///
    /// When `idempotent` is false only errors raised before the request reached the server
    /// are retryable, so a non-idempotent script is never applied twice.
    #[must_use]
    pub fn is_retryable(&self, idempotent: bool) -> bool {
        match self {
            Self::Redis(e) if e.is_connection_refusal() => true,
            Self::Redis(e) => {
                idempotent && (e.is_io_error() || e.is_timeout() || e.is_connection_dropped())
            }
            Self::Timeout(_) => idempotent,
            _ => false,
        }
    }
}
