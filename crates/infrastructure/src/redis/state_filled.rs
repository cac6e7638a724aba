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

//! Short lived filled quantums reported by chain state, keyed by order.

use std::sync::Arc;

use redis::Cmd;
use uuid::Uuid;

use super::{
    error::CacheError,
    keys::CacheKeys,
    transport::{Idempotency, RedisTransport},
};

/// The Redis backed cache of state filled quantums.
#[derive(Clone, Debug)]
pub struct RedisStateFilledQuantumsCache {
    transport: RedisTransport,
    keys: Arc<CacheKeys>,
    ttl_secs: u64,
}

impl RedisStateFilledQuantumsCache {
    /// Creates a new [`RedisStateFilledQuantumsCache`] instance expiring entries after `ttl_secs`.
    #[must_use]
    pub const fn new(transport: RedisTransport, keys: Arc<CacheKeys>, ttl_secs: u64) -> Self {
        Self {
            transport,
            keys,
            ttl_secs,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn set_state_filled_quantums(
        &self,
        order_uuid: &Uuid,
        quantums: u64,
    ) -> Result<(), CacheError> {
        let cmd = Cmd::set_ex(
            self.keys.state_filled_quantums(order_uuid),
            quantums.to_string(),
            self.ttl_secs,
        );
        self.transport
            .query::<()>("set_state_filled_quantums", &cmd, Idempotency::Idempotent)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the read fails or the stored value is not a valid quantums amount.
    pub async fn get_state_filled_quantums(
        &self,
        order_uuid: &Uuid,
    ) -> Result<Option<u64>, CacheError> {
        let cmd = Cmd::get(self.keys.state_filled_quantums(order_uuid));
        let quantums: Option<String> = self
            .transport
            .query("get_state_filled_quantums", &cmd, Idempotency::Idempotent)
            .await?;

        quantums
            .map(|q| {
                q.parse::<u64>().map_err(|_| CacheError::UnexpectedReply {
                    operation: "get_state_filled_quantums",
                    reply: q,
                })
            })
            .transpose()
    }
}
