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

//! The entry point wiring every sub-cache onto one shared connection.

use std::{fmt::Debug, sync::Arc};

use indexer_common::config::CacheConfig;

use super::{
    canceled::RedisCanceledOrdersCache,
    create_redis_connection,
    flush_redis,
    keys::CacheKeys,
    open_orders::RedisOpenOrdersCache,
    orderbook::RedisOrderbookLevelsCache,
    orders::RedisOrdersCache,
    scripts::ScriptRegistry,
    state_filled::RedisStateFilledQuantumsCache,
    stateful_updates::RedisStatefulOrderUpdatesCache,
    transport::RedisTransport,
};

const ORDER_CACHE: &str = "order-cache";

/// The order and orderbook cache.
///
/// Holds one multiplexed connection, the verified script registry and a handle to each
/// sub-cache. Cloning is cheap.
#[derive(Clone)]
pub struct RedisOrderCache {
    pub orders: RedisOrdersCache,
    pub orderbook_levels: RedisOrderbookLevelsCache,
    pub canceled_orders: RedisCanceledOrdersCache,
    pub stateful_order_updates: RedisStatefulOrderUpdatesCache,
    pub open_orders: RedisOpenOrdersCache,
    pub state_filled_quantums: RedisStateFilledQuantumsCache,
    transport: RedisTransport,
    config: CacheConfig,
}

impl Debug for RedisOrderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(RedisOrderCache))
            .field("key_prefix", &self.config.key_prefix)
            .field("encoding", &self.config.encoding)
            .finish()
    }
}

impl RedisOrderCache {
    /// Creates a new [`RedisOrderCache`] instance from `config`.
    ///
    /// Connects, then loads and verifies every script before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database configuration is missing in `config`.
    /// - Establishing the Redis connection fails.
    /// - Any script fails to load, or the server reports a different script hash.
    pub async fn new(config: CacheConfig) -> anyhow::Result<Self> {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No database config"))?;
        let con = create_redis_connection(ORDER_CACHE, db_config).await?;
        let transport = RedisTransport::new(con, config.retry.clone())?;

        let scripts = ScriptRegistry::load(&transport).await.map_err(|e| {
            tracing::error!("Failed to load cache scripts: {e}");
            anyhow::anyhow!(e)
        })?;

        Ok(Self::with_scripts(transport, Arc::new(scripts), config))
    }

    /// Creates a new [`RedisOrderCache`] over an existing transport and loaded `scripts`.
    #[must_use]
    pub fn with_scripts(
        transport: RedisTransport,
        scripts: Arc<ScriptRegistry>,
        config: CacheConfig,
    ) -> Self {
        let keys = Arc::new(CacheKeys::new(&config.key_prefix));

        Self {
            orders: RedisOrdersCache::new(
                transport.clone(),
                keys.clone(),
                scripts.clone(),
                config.encoding,
            ),
            orderbook_levels: RedisOrderbookLevelsCache::new(
                transport.clone(),
                keys.clone(),
                scripts.clone(),
            ),
            canceled_orders: RedisCanceledOrdersCache::new(
                transport.clone(),
                keys.clone(),
                scripts.clone(),
                config.canceled_window_ms,
            ),
            stateful_order_updates: RedisStatefulOrderUpdatesCache::new(
                transport.clone(),
                keys.clone(),
                scripts,
                config.encoding,
            ),
            open_orders: RedisOpenOrdersCache::new(transport.clone(), keys.clone()),
            state_filled_quantums: RedisStateFilledQuantumsCache::new(
                transport.clone(),
                keys,
                config.state_filled_ttl_secs,
            ),
            transport,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    #[must_use]
    pub const fn transport(&self) -> &RedisTransport {
        &self.transport
    }

    /// Flushes the entire database, for test setups only.
    pub async fn flushdb(&self) {
        let mut con = self.transport.connection();
        if let Err(e) = flush_redis(&mut con).await {
            log::error!("Failed to flush database: {e:?}");
        }
    }
}
