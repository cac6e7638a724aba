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

//! The order record store: canonical orders, their runtime state and the subaccount index.
//!
//! Reads here are snapshots and take no locks. Mutations live in
//! [`lifecycle`](super::lifecycle) and always run as one script.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use indexer_common::enums::SerializationEncoding;
use indexer_model::orders::{CachedOrder, OrderRuntimeState};
use redis::{Cmd, Pipeline};
use uuid::Uuid;

use super::{
    codec::deserialize_payload,
    error::CacheError,
    keys::CacheKeys,
    scripts::ScriptRegistry,
    transport::{Idempotency, RedisTransport},
};

/// The Redis backed order cache.
#[derive(Clone, Debug)]
pub struct RedisOrdersCache {
    pub(crate) transport: RedisTransport,
    pub(crate) keys: Arc<CacheKeys>,
    pub(crate) scripts: Arc<ScriptRegistry>,
    pub(crate) encoding: SerializationEncoding,
}

impl RedisOrdersCache {
    /// Creates a new [`RedisOrdersCache`] instance.
    #[must_use]
    pub const fn new(
        transport: RedisTransport,
        keys: Arc<CacheKeys>,
        scripts: Arc<ScriptRegistry>,
        encoding: SerializationEncoding,
    ) -> Self {
        Self {
            transport,
            keys,
            scripts,
            encoding,
        }
    }

    /// Returns the cached order for `order_uuid`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored payload cannot be decoded.
    pub async fn get(&self, order_uuid: &Uuid) -> Result<Option<CachedOrder>, CacheError> {
        let cmd = Cmd::get(self.keys.order(order_uuid));
        let payload: Option<Vec<u8>> = self
            .transport
            .query("get_order", &cmd, Idempotency::Idempotent)
            .await?;

        payload
            .map(|bytes| deserialize_payload(self.encoding, &bytes))
            .transpose()
    }

    /// Returns the runtime state for `order_uuid`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored state is malformed.
    pub async fn get_runtime_state(
        &self,
        order_uuid: &Uuid,
    ) -> Result<Option<OrderRuntimeState>, CacheError> {
        let cmd = Cmd::get(self.keys.order_data(order_uuid));
        let state: Option<String> = self
            .transport
            .query("get_order_runtime_state", &cmd, Idempotency::Idempotent)
            .await?;

        Ok(state
            .map(|s| s.parse::<OrderRuntimeState>())
            .transpose()?)
    }

    /// Returns the UUIDs of all orders cached for the subaccount.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn account_orders(&self, subaccount_uuid: &Uuid) -> Result<AHashSet<Uuid>, CacheError> {
        let cmd = Cmd::smembers(self.keys.subaccount_order_ids(subaccount_uuid));
        let members: Vec<String> = self
            .transport
            .query("get_subaccount_order_ids", &cmd, Idempotency::Idempotent)
            .await?;

        Ok(parse_uuids(subaccount_uuid, members))
    }

    /// Returns the order UUIDs of many subaccounts in one pipelined round trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn account_orders_bulk(
        &self,
        subaccount_uuids: &[Uuid],
    ) -> Result<AHashMap<Uuid, AHashSet<Uuid>>, CacheError> {
        if subaccount_uuids.is_empty() {
            return Ok(AHashMap::new());
        }

        let mut pipe = Pipeline::new();
        for subaccount_uuid in subaccount_uuids {
            pipe.smembers(self.keys.subaccount_order_ids(subaccount_uuid));
        }

        let results: Vec<Vec<String>> = self
            .transport
            .query_pipeline("get_subaccounts_order_ids", &pipe)
            .await?;

        Ok(subaccount_uuids
            .iter()
            .zip(results)
            .map(|(subaccount_uuid, members)| {
                (*subaccount_uuid, parse_uuids(subaccount_uuid, members))
            })
            .collect())
    }
}

fn parse_uuids(subaccount_uuid: &Uuid, members: Vec<String>) -> AHashSet<Uuid> {
    members
        .into_iter()
        .filter_map(|member| match Uuid::parse_str(&member) {
            Ok(uuid) => Some(uuid),
            Err(e) => {
                tracing::error!("Invalid order id '{member}' for subaccount {subaccount_uuid}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_parse_uuids_skips_invalid_members() {
        let valid = Uuid::new_v4();
        let members = vec![valid.to_string(), "not-a-uuid".to_string()];
        let parsed = parse_uuids(&Uuid::nil(), members);
        assert_eq!(parsed.len(), 1);
        assert!(parsed.contains(&valid));
    }
}
