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

//! Open order ids per market.

use std::sync::Arc;

use ahash::AHashSet;
use redis::Cmd;
use uuid::Uuid;

use super::{
    error::CacheError,
    keys::CacheKeys,
    transport::{Idempotency, RedisTransport},
};

/// The Redis backed index of open orders keyed by CLOB pair.
#[derive(Clone, Debug)]
pub struct RedisOpenOrdersCache {
    transport: RedisTransport,
    keys: Arc<CacheKeys>,
}

impl RedisOpenOrdersCache {
    /// Creates a new [`RedisOpenOrdersCache`] instance.
    #[must_use]
    pub const fn new(transport: RedisTransport, keys: Arc<CacheKeys>) -> Self {
        Self { transport, keys }
    }

    /// Adds the order to the open orders of `clob_pair_id`, returning whether it was new.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn add_open_order(
        &self,
        order_uuid: &Uuid,
        clob_pair_id: u32,
    ) -> Result<bool, CacheError> {
        let cmd = Cmd::sadd(self.keys.open_orders(clob_pair_id), order_uuid.to_string());
        let added: i64 = self
            .transport
            .query("add_open_order", &cmd, Idempotency::Idempotent)
            .await?;
        Ok(added > 0)
    }

    /// Removes the order from the open orders of `clob_pair_id`, returning whether it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn remove_open_order(
        &self,
        order_uuid: &Uuid,
        clob_pair_id: u32,
    ) -> Result<bool, CacheError> {
        let cmd = Cmd::srem(self.keys.open_orders(clob_pair_id), order_uuid.to_string());
        let removed: i64 = self
            .transport
            .query("remove_open_order", &cmd, Idempotency::Idempotent)
            .await?;
        Ok(removed > 0)
    }

    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn is_open(&self, order_uuid: &Uuid, clob_pair_id: u32) -> Result<bool, CacheError> {
        let cmd = Cmd::sismember(self.keys.open_orders(clob_pair_id), order_uuid.to_string());
        self.transport
            .query("is_open_order", &cmd, Idempotency::Idempotent)
            .await
    }

    /// Returns every open order of `clob_pair_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn open_orders(&self, clob_pair_id: u32) -> Result<AHashSet<Uuid>, CacheError> {
        let cmd = Cmd::smembers(self.keys.open_orders(clob_pair_id));
        let members: Vec<String> = self
            .transport
            .query("get_open_orders", &cmd, Idempotency::Idempotent)
            .await?;

        Ok(members
            .into_iter()
            .filter_map(|member| match Uuid::parse_str(&member) {
                Ok(uuid) => Some(uuid),
                Err(e) => {
                    tracing::error!("Invalid open order id '{member}' for clob pair {clob_pair_id}: {e}");
                    None
                }
            })
            .collect())
    }
}
