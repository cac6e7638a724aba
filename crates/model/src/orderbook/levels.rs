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

use std::cmp::Reverse;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PriceLevel;
use crate::error::InvalidOptionsError;

/// Options controlling how an orderbook is read back from the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderbookLevelsOptions {
    /// Drop levels with exactly zero quantums.
    pub remove_zeros: bool,
    /// Sort bids descending and asks ascending by price.
    pub sort_sides: bool,
    /// Remove crossing levels so the best bid is strictly below the best ask.
    pub uncross_book: bool,
    /// Truncate each side to at most this many levels.
    pub limit_per_side: Option<usize>,
}

impl Default for OrderbookLevelsOptions {
    fn default() -> Self {
        Self {
            remove_zeros: true,
            sort_sides: false,
            uncross_book: false,
            limit_per_side: None,
        }
    }
}

impl OrderbookLevelsOptions {
    /// Checks the option combination is valid.
    ///
    /// # Errors
    ///
    /// Returns an error if uncrossing or limiting is requested without sorting.
    pub const fn validate(&self) -> Result<(), InvalidOptionsError> {
        if self.uncross_book && !self.sort_sides {
            return Err(InvalidOptionsError::UncrossWithoutSort);
        }
        if self.limit_per_side.is_some() && !self.sort_sides {
            return Err(InvalidOptionsError::LimitWithoutSort);
        }
        Ok(())
    }
}

/// Both sides of a market's aggregated price levels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderbookLevels {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl OrderbookLevels {
    /// Creates a new [`OrderbookLevels`] instance.
    #[must_use]
    pub const fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { bids, asks }
    }

    /// Applies `options` in order: sort, uncross, then limit.
    ///
    /// Zero filtering happens when the sides are read, so `remove_zeros` is not applied here.
    ///
    /// # Errors
    ///
    /// Returns an error if the option combination is invalid.
    pub fn apply(&mut self, options: &OrderbookLevelsOptions) -> Result<(), InvalidOptionsError> {
        options.validate()?;

        if options.sort_sides {
            self.sort();
        }
        if options.uncross_book {
            self.uncross();
        }
        if let Some(limit) = options.limit_per_side {
            self.limit(limit);
        }
        Ok(())
    }

    /// Sorts bids by descending price and asks by ascending price.
    pub fn sort(&mut self) {
        self.bids.sort_by_key(|level| Reverse(level.human_price));
        self.asks.sort_by_key(|level| level.human_price);
    }

    /// Truncates each side to at most `limit` levels.
    pub fn limit(&mut self, limit: usize) {
        self.bids.truncate(limit);
        self.asks.truncate(limit);
    }

    /// Removes the minimal prefix of crossing levels from both sides.
    ///
    /// Both sides must already be sorted. While the best bid is at or above the best ask, the
    /// level updated less recently is removed. On equal update times the smaller level is
    /// removed, and on equal size the bid is removed.
    pub fn uncross(&mut self) {
        let mut bid_idx = 0;
        let mut ask_idx = 0;

        while let (Some(bid), Some(ask)) = (self.bids.get(bid_idx), self.asks.get(ask_idx)) {
            if bid.human_price < ask.human_price {
                break;
            }

            if bid.last_updated < ask.last_updated {
                bid_idx += 1;
            } else if bid.last_updated > ask.last_updated {
                ask_idx += 1;
            } else if bid.quantums > ask.quantums {
                ask_idx += 1;
            } else {
                bid_idx += 1;
            }
        }

        if bid_idx > 0 || ask_idx > 0 {
            log::debug!("Uncrossed book: removed {bid_idx} bid levels and {ask_idx} ask levels");
        }

        self.bids.drain(..bid_idx);
        self.asks.drain(..ask_idx);
    }

    /// Returns the bid level with the highest price.
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.iter().max_by_key(|level| level.human_price)
    }

    /// Returns the ask level with the lowest price.
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.iter().min_by_key(|level| level.human_price)
    }

    /// Returns the mean of the best bid and best ask prices, or `None` if either side is empty.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = self.best_bid()?.human_price;
        let ask = self.best_ask()?.human_price;
        let sum = bid.checked_add(ask)?;
        sum.checked_div(Decimal::TWO).map(|mid| mid.normalize())
    }
}
