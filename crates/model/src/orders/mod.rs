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

//! Order types for the indexer cache.

pub mod cached;
pub mod indexer;
pub mod runtime;

use serde::{Deserialize, Serialize};

// Re-exports
pub use crate::orders::{
    cached::CachedOrder,
    indexer::IndexerOrder,
    runtime::{OrderRuntimeState, validate_total_filled},
};

/// The liveness bound of an order, exactly one of a block height or a block time.
///
/// Short-term orders carry a block height, stateful orders carry a block time (unix seconds).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoodTilOneof {
    GoodTilBlock(u32),
    GoodTilBlockTime(u32),
}

impl GoodTilOneof {
    /// Returns the raw bound, which is the order's expiry.
    #[must_use]
    pub const fn value(&self) -> u32 {
        match self {
            Self::GoodTilBlock(height) => *height,
            Self::GoodTilBlockTime(time) => *time,
        }
    }
}
