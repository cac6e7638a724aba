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

//! Stateful order updates which arrived before the order they apply to.
//!
//! At most one update is pending per order. A newer update replaces the pending one, and a
//! dequeue only succeeds for the timestamp that was last enqueued.

use std::sync::Arc;

use indexer_common::enums::SerializationEncoding;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use super::{
    codec::{deserialize_payload, serialize_payload},
    error::CacheError,
    expiry::{integral_score, score_bound},
    keys::CacheKeys,
    reply::into_optional_bytes,
    scripts::ScriptRegistry,
    transport::{Idempotency, RedisTransport},
};

const REMOVE_STATEFUL_ORDER_UPDATE: &str = "remove_stateful_order_update";

/// The Redis backed cache of pending stateful order updates.
#[derive(Clone, Debug)]
pub struct RedisStatefulOrderUpdatesCache {
    transport: RedisTransport,
    keys: Arc<CacheKeys>,
    scripts: Arc<ScriptRegistry>,
    encoding: SerializationEncoding,
}

impl RedisStatefulOrderUpdatesCache {
    /// Creates a new [`RedisStatefulOrderUpdatesCache`] instance.
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

    fn script_keys(&self) -> [String; 2] {
        [
            self.keys.stateful_order_updates(),
            self.keys.stateful_order_update_ids(),
        ]
    }

    /// Stores `update` as the pending update for the order, recorded at `timestamp_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be encoded or the script fails.
    pub async fn enqueue<T: Serialize>(
        &self,
        order_uuid: &Uuid,
        update: &T,
        timestamp_ms: i64,
    ) -> Result<(), CacheError> {
        let encoded = serialize_payload(self.encoding, update)?;
        let uuid = order_uuid.to_string();
        let timestamp = timestamp_ms.to_string();

        self.transport
            .invoke_script(
                &self.scripts.add_stateful_order_update,
                &self.script_keys(),
                &[uuid.as_bytes(), encoded.as_slice(), timestamp.as_bytes()],
            )
            .await?;

        tracing::debug!(order_uuid = %uuid, timestamp_ms, "Enqueued stateful order update");
        Ok(())
    }

    /// Removes and returns the pending update for the order, only if it was enqueued at
    /// `timestamp_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails or the stored update cannot be decoded.
    pub async fn dequeue_if_current<T: DeserializeOwned>(
        &self,
        order_uuid: &Uuid,
        timestamp_ms: i64,
    ) -> Result<Option<T>, CacheError> {
        let uuid = order_uuid.to_string();
        let timestamp = timestamp_ms.to_string();

        let reply = self
            .transport
            .invoke_script(
                &self.scripts.remove_stateful_order_update,
                &self.script_keys(),
                &[uuid.as_bytes(), timestamp.as_bytes()],
            )
            .await?;

        let Some(bytes) = into_optional_bytes(REMOVE_STATEFUL_ORDER_UPDATE, reply)? else {
            tracing::debug!(order_uuid = %uuid, timestamp_ms, "No current stateful order update");
            return Ok(None);
        };

        deserialize_payload(self.encoding, &bytes).map(Some)
    }

    /// Returns the orders with a pending update enqueued strictly before `threshold_ms`,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn pending_before(&self, threshold_ms: i64) -> Result<Vec<(Uuid, i64)>, CacheError> {
        let mut cmd = redis::cmd("ZRANGEBYSCORE");
        cmd.arg(self.keys.stateful_order_update_ids())
            .arg("-inf")
            .arg(score_bound(threshold_ms, false))
            .arg("WITHSCORES");

        let entries: Vec<(String, f64)> = self
            .transport
            .query("get_old_stateful_order_updates", &cmd, Idempotency::Idempotent)
            .await?;

        Ok(entries
            .into_iter()
            .filter_map(|(member, score)| {
                match (Uuid::parse_str(&member), integral_score::<i64>(score)) {
                    (Ok(uuid), Some(timestamp_ms)) => Some((uuid, timestamp_ms)),
                    _ => {
                        tracing::error!("Invalid stateful order update entry '{member}' score {score}");
                        None
                    }
                }
            })
            .collect())
    }
}
