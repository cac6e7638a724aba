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

use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the aggregated size resting at one price on one side of a market.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// The human readable price of the level.
    pub human_price: Decimal,
    /// The total size of all orders at the level, in base quantums.
    pub quantums: u64,
    /// UNIX timestamp (seconds) of the last increment applied to the level.
    pub last_updated: i64,
}

impl PriceLevel {
    /// Creates a new [`PriceLevel`] instance.
    #[must_use]
    pub const fn new(human_price: Decimal, quantums: u64, last_updated: i64) -> Self {
        Self {
            human_price,
            quantums,
            last_updated,
        }
    }
}

impl Display for PriceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PriceLevel(price={}, quantums={}, last_updated={})",
            self.human_price, self.quantums, self.last_updated
        )
    }
}
