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

//! Recently canceled order markers.
//!
//! Two disjoint sorted sets scored by millisecond timestamp. Entries outside the trailing
//! window are evicted whenever a new marker is written.

use std::sync::Arc;

use indexer_model::enums::CanceledOrderStatus;
use redis::{Cmd, Pipeline};
use uuid::Uuid;

use super::{
    error::CacheError,
    keys::CacheKeys,
    reply::as_bool,
    scripts::ScriptRegistry,
    transport::{Idempotency, RedisTransport},
};

const MARK_BEST_EFFORT_CANCELED: &str = "mark_best_effort_canceled";

/// The Redis backed cancellation marker cache.
#[derive(Clone, Debug)]
pub struct RedisCanceledOrdersCache {
    transport: RedisTransport,
    keys: Arc<CacheKeys>,
    scripts: Arc<ScriptRegistry>,
    window_ms: u64,
}

impl RedisCanceledOrdersCache {
    /// Creates a new [`RedisCanceledOrdersCache`] instance keeping markers for `window_ms`.
    #[must_use]
    pub const fn new(
        transport: RedisTransport,
        keys: Arc<CacheKeys>,
        scripts: Arc<ScriptRegistry>,
        window_ms: u64,
    ) -> Self {
        Self {
            transport,
            keys,
            scripts,
            window_ms,
        }
    }

    fn cutoff(&self, timestamp_ms: i64) -> i64 {
        window_cutoff(timestamp_ms, self.window_ms)
    }

    /// Marks the order canceled at `timestamp_ms`, clearing any best effort marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails.
    pub async fn mark_canceled(&self, order_uuid: &Uuid, timestamp_ms: i64) -> Result<(), CacheError> {
        let uuid = order_uuid.to_string();
        let timestamp = timestamp_ms.to_string();
        let cutoff = self.cutoff(timestamp_ms).to_string();

        self.transport
            .invoke_script(
                &self.scripts.mark_canceled,
                &[
                    self.keys.canceled_orders(),
                    self.keys.best_effort_canceled_orders(),
                ],
                &[uuid.as_bytes(), timestamp.as_bytes(), cutoff.as_bytes()],
            )
            .await?;

        tracing::debug!(order_uuid = %uuid, timestamp_ms, "Marked order canceled");
        Ok(())
    }

    /// Marks the order best effort canceled at `timestamp_ms`.
    ///
    /// Returns `false` without writing if the order is already canceled.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails.
    pub async fn mark_best_effort_canceled(
        &self,
        order_uuid: &Uuid,
        timestamp_ms: i64,
    ) -> Result<bool, CacheError> {
        let uuid = order_uuid.to_string();
        let timestamp = timestamp_ms.to_string();
        let cutoff = self.cutoff(timestamp_ms).to_string();

        let reply = self
            .transport
            .invoke_script(
                &self.scripts.mark_best_effort_canceled,
                &[
                    self.keys.best_effort_canceled_orders(),
                    self.keys.canceled_orders(),
                ],
                &[uuid.as_bytes(), timestamp.as_bytes(), cutoff.as_bytes()],
            )
            .await?;

        let marked = as_bool(MARK_BEST_EFFORT_CANCELED, &reply)?;
        tracing::debug!(order_uuid = %uuid, timestamp_ms, marked, "Marked order best effort canceled");
        Ok(marked)
    }

    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn is_canceled(&self, order_uuid: &Uuid) -> Result<bool, CacheError> {
        let cmd = Cmd::zscore(self.keys.canceled_orders(), order_uuid.to_string());
        let score: Option<f64> = self
            .transport
            .query("is_canceled", &cmd, Idempotency::Idempotent)
            .await?;
        Ok(score.is_some())
    }

    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn is_best_effort_canceled(&self, order_uuid: &Uuid) -> Result<bool, CacheError> {
        let cmd = Cmd::zscore(self.keys.best_effort_canceled_orders(), order_uuid.to_string());
        let score: Option<f64> = self
            .transport
            .query("is_best_effort_canceled", &cmd, Idempotency::Idempotent)
            .await?;
        Ok(score.is_some())
    }

    /// Returns the cancellation status of the order from both marker sets in one round trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn status(&self, order_uuid: &Uuid) -> Result<CanceledOrderStatus, CacheError> {
        let uuid = order_uuid.to_string();
        let mut pipe = Pipeline::new();
        pipe.zscore(self.keys.canceled_orders(), &uuid)
            .zscore(self.keys.best_effort_canceled_orders(), &uuid);

        let (canceled, best_effort): (Option<f64>, Option<f64>) = self
            .transport
            .query_pipeline("get_canceled_order_status", &pipe)
            .await?;

        Ok(status_from_markers(canceled.is_some(), best_effort.is_some()))
    }

    /// Removes the order from both marker sets, returning whether any marker existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn remove_from_caches(&self, order_uuid: &Uuid) -> Result<bool, CacheError> {
        let uuid = order_uuid.to_string();
        let mut pipe = Pipeline::new();
        pipe.atomic()
            .zrem(self.keys.canceled_orders(), &uuid)
            .zrem(self.keys.best_effort_canceled_orders(), &uuid);

        let (canceled, best_effort): (i64, i64) = self
            .transport
            .query_pipeline("remove_canceled_order", &pipe)
            .await?;

        Ok(canceled + best_effort > 0)
    }
}

/// Returns the oldest timestamp kept in a marker set after writing at `timestamp_ms`.
pub(crate) fn window_cutoff(timestamp_ms: i64, window_ms: u64) -> i64 {
    timestamp_ms.saturating_sub(i64::try_from(window_ms).unwrap_or(i64::MAX))
}

/// Hard cancellation takes precedence, the sets are kept disjoint on write.
pub(crate) const fn status_from_markers(canceled: bool, best_effort: bool) -> CanceledOrderStatus {
    match (canceled, best_effort) {
        (true, _) => CanceledOrderStatus::Canceled,
        (false, true) => CanceledOrderStatus::BestEffortCanceled,
        (false, false) => CanceledOrderStatus::NotCanceled,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1_700_000_030_000, 30_000, 1_700_000_000_000)]
    #[case(10_000, 30_000, -20_000)]
    #[case(i64::MIN, 30_000, i64::MIN)]
    #[case(0, u64::MAX, -i64::MAX)]
    fn test_window_cutoff(#[case] timestamp_ms: i64, #[case] window_ms: u64, #[case] expected: i64) {
        assert_eq!(window_cutoff(timestamp_ms, window_ms), expected);
    }

    #[rstest]
    #[case(true, true, CanceledOrderStatus::Canceled)]
    #[case(true, false, CanceledOrderStatus::Canceled)]
    #[case(false, true, CanceledOrderStatus::BestEffortCanceled)]
    #[case(false, false, CanceledOrderStatus::NotCanceled)]
    fn test_status_from_markers(
        #[case] canceled: bool,
        #[case] best_effort: bool,
        #[case] expected: CanceledOrderStatus,
    ) {
        assert_eq!(status_from_markers(canceled, best_effort), expected);
    }
}
