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

//! The Lua scripts backing every multi-key mutation, and the registry verifying them.

use futures::future::try_join_all;

use super::{error::CacheError, transport::RedisTransport};

const PLACE_ORDER: &str = include_str!("lua/place_order.lua");
const REMOVE_ORDER: &str = include_str!("lua/remove_order.lua");
const UPDATE_ORDER: &str = include_str!("lua/update_order.lua");
const INCREMENT_ORDERBOOK_LEVEL: &str = include_str!("lua/increment_orderbook_level.lua");
const DELETE_ZERO_PRICE_LEVEL: &str = include_str!("lua/delete_zero_price_level.lua");
const DELETE_STALE_PRICE_LEVEL: &str = include_str!("lua/delete_stale_price_level.lua");
const MARK_CANCELED: &str = include_str!("lua/mark_canceled.lua");
const MARK_BEST_EFFORT_CANCELED: &str = include_str!("lua/mark_best_effort_canceled.lua");
const ADD_STATEFUL_ORDER_UPDATE: &str = include_str!("lua/add_stateful_order_update.lua");
const REMOVE_STATEFUL_ORDER_UPDATE: &str = include_str!("lua/remove_stateful_order_update.lua");

/// A named Lua script and its SHA1 content hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptHandle {
    name: &'static str,
    source: &'static str,
    sha: String,
}

impl ScriptHandle {
    /// Creates a new [`ScriptHandle`], hashing `source` locally.
    #[must_use]
    pub fn new(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            source,
            sha: redis::Script::new(source).get_hash().to_string(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn source(&self) -> &'static str {
        self.source
    }

    #[must_use]
    pub fn sha(&self) -> &str {
        &self.sha
    }

    /// Checks the hash returned by the server against the locally computed one.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ScriptHashMismatch`] if the hashes differ.
    pub fn verify(&self, server_sha: &str) -> Result<(), CacheError> {
        if self.sha.eq_ignore_ascii_case(server_sha) {
            Ok(())
        } else {
            Err(CacheError::ScriptHashMismatch {
                name: self.name,
                expected: self.sha.clone(),
                actual: server_sha.to_string(),
            })
        }
    }

    async fn load(&self, transport: &RedisTransport) -> Result<(), CacheError> {
        let server_sha = transport.load_script(self.name, self.source).await?;
        self.verify(&server_sha)
    }
}

/// The set of scripts used by the caches, loaded and verified once at startup.
#[derive(Clone, Debug)]
pub struct ScriptRegistry {
    pub place_order: ScriptHandle,
    pub remove_order: ScriptHandle,
    pub update_order: ScriptHandle,
    pub increment_orderbook_level: ScriptHandle,
    pub delete_zero_price_level: ScriptHandle,
    pub delete_stale_price_level: ScriptHandle,
    pub mark_canceled: ScriptHandle,
    pub mark_best_effort_canceled: ScriptHandle,
    pub add_stateful_order_update: ScriptHandle,
    pub remove_stateful_order_update: ScriptHandle,
}

impl Default for ScriptRegistry {
    fn default() -> Self {
        Self {
            place_order: ScriptHandle::new("place_order", PLACE_ORDER),
            remove_order: ScriptHandle::new("remove_order", REMOVE_ORDER),
            update_order: ScriptHandle::new("update_order", UPDATE_ORDER),
            increment_orderbook_level: ScriptHandle::new(
                "increment_orderbook_level",
                INCREMENT_ORDERBOOK_LEVEL,
            ),
            delete_zero_price_level: ScriptHandle::new(
                "delete_zero_price_level",
                DELETE_ZERO_PRICE_LEVEL,
            ),
            delete_stale_price_level: ScriptHandle::new(
                "delete_stale_price_level",
                DELETE_STALE_PRICE_LEVEL,
            ),
            mark_canceled: ScriptHandle::new("mark_canceled", MARK_CANCELED),
            mark_best_effort_canceled: ScriptHandle::new(
                "mark_best_effort_canceled",
                MARK_BEST_EFFORT_CANCELED,
            ),
            add_stateful_order_update: ScriptHandle::new(
                "add_stateful_order_update",
                ADD_STATEFUL_ORDER_UPDATE,
            ),
            remove_stateful_order_update: ScriptHandle::new(
                "remove_stateful_order_update",
                REMOVE_STATEFUL_ORDER_UPDATE,
            ),
        }
    }
}

impl ScriptRegistry {
    /// Loads every script into the server and verifies the returned hashes.
    ///
    /// # Errors
    ///
    /// Returns an error if any load fails, or [`CacheError::ScriptHashMismatch`] if the server
    /// reports a different hash for any script. Callers must not serve traffic in that case.
    pub async fn load(transport: &RedisTransport) -> Result<Self, CacheError> {
        let registry = Self::default();
        try_join_all(registry.all().into_iter().map(|script| script.load(transport))).await?;

        let names: Vec<&str> = registry.all().iter().map(|script| script.name()).collect();
        tracing::info!("Scripts {names:?} loaded");

        Ok(registry)
    }

    /// Returns every script in the registry.
    #[must_use]
    pub fn all(&self) -> [&ScriptHandle; 10] {
        [
            &self.place_order,
            &self.remove_order,
            &self.update_order,
            &self.increment_orderbook_level,
            &self.delete_zero_price_level,
            &self.delete_stale_price_level,
            &self.mark_canceled,
            &self.mark_best_effort_canceled,
            &self.add_stateful_order_update,
            &self.remove_stateful_order_update,
        ]
    }
}
