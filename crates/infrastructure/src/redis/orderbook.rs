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

//! Aggregated orderbook price levels per market and side.
//!
//! Each side is two hashes keyed by price: the aggregated quantums, and the unix seconds at
//! which the level was last changed. Both are always written together by one script.

use std::{collections::HashMap, str::FromStr, sync::Arc};

use indexer_common::logging::SEVERITY_CRITICAL;
use indexer_model::{
    enums::OrderSide,
    orderbook::{OrderbookLevels, OrderbookLevelsOptions, PriceLevel},
};
use redis::{Cmd, Pipeline};
use rust_decimal::Decimal;
use ustr::Ustr;

use super::{
    error::CacheError,
    keys::CacheKeys,
    reply::{as_bool, as_int, into_array, parse, unexpected},
    scripts::ScriptRegistry,
    transport::{Idempotency, RedisTransport},
};

const INCREMENT_ORDERBOOK_LEVEL: &str = "increment_orderbook_level";
const DELETE_PRICE_LEVEL: &str = "delete_price_level";

/// The outcome of an increment script: the new aggregate, or the rejected and restored values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IncrementReply {
    Applied(u64),
    Rejected { attempted: i64, restored: i64 },
}

/// One side of the book as read, with whether any stored price failed to parse.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct JoinedSide {
    pub levels: Vec<PriceLevel>,
    pub unparsable_price: bool,
}

/// The Redis backed orderbook price level cache.
#[derive(Clone, Debug)]
pub struct RedisOrderbookLevelsCache {
    transport: RedisTransport,
    keys: Arc<CacheKeys>,
    scripts: Arc<ScriptRegistry>,
}

impl RedisOrderbookLevelsCache {
    /// Creates a new [`RedisOrderbookLevelsCache`] instance.
    #[must_use]
    pub const fn new(
        transport: RedisTransport,
        keys: Arc<CacheKeys>,
        scripts: Arc<ScriptRegistry>,
    ) -> Self {
        Self {
            transport,
            keys,
            scripts,
        }
    }

    fn level_keys(&self, ticker: &str, side: OrderSide) -> Vec<String> {
        vec![
            self.keys.orderbook_levels(ticker, side),
            self.keys.orderbook_last_updated(ticker, side),
        ]
    }

    /// Adds `delta` quantums to the level at `price` and stamps it with the current time.
    ///
    /// Returns the new aggregated quantums of the level.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidPriceLevelUpdate`] if the level would become negative. The
    /// level is restored to its prior value before the call returns. Returns an error if the
    /// script fails.
    pub async fn increment_level(
        &self,
        ticker: &str,
        side: OrderSide,
        price: Decimal,
        delta: i64,
    ) -> Result<u64, CacheError> {
        let price_field = price_field(price);
        let delta_arg = delta.to_string();
        let negated_arg = (-i128::from(delta)).to_string();
        let now_arg = chrono::Utc::now().timestamp().to_string();

        let reply = self
            .transport
            .invoke_script(
                &self.scripts.increment_orderbook_level,
                &self.level_keys(ticker, side),
                &[
                    price_field.as_bytes(),
                    delta_arg.as_bytes(),
                    negated_arg.as_bytes(),
                    now_arg.as_bytes(),
                ],
            )
            .await?;

        match decode_increment_reply(reply)? {
            IncrementReply::Applied(quantums) => {
                tracing::trace!(ticker, %side, price = %price_field, delta, quantums, "Incremented level");
                Ok(quantums)
            }
            IncrementReply::Rejected {
                attempted,
                restored,
            } => {
                tracing::error!(
                    severity = SEVERITY_CRITICAL,
                    ticker,
                    %side,
                    price = %price_field,
                    delta,
                    attempted,
                    restored,
                    "Price level would become negative, update reverted"
                );
                Err(CacheError::InvalidPriceLevelUpdate {
                    ticker: Ustr::from(ticker),
                    side,
                    price,
                    delta,
                    attempted,
                    restored,
                })
            }
        }
    }

    /// Returns the aggregated quantums of the level at `price`, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored value is not a valid quantums amount.
    pub async fn get_level(
        &self,
        ticker: &str,
        side: OrderSide,
        price: Decimal,
    ) -> Result<Option<u64>, CacheError> {
        let cmd = Cmd::hget(self.keys.orderbook_levels(ticker, side), price_field(price));
        let quantums: Option<String> = self
            .transport
            .query("get_orderbook_level", &cmd, Idempotency::Idempotent)
            .await?;

        quantums
            .map(|q| {
                q.parse::<u64>().map_err(|_| CacheError::UnexpectedReply {
                    operation: "get_orderbook_level",
                    reply: q,
                })
            })
            .transpose()
    }

    /// Deletes the level at `price` if its quantums are zero, returning whether it was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails.
    pub async fn delete_zero_level(
        &self,
        ticker: &str,
        side: OrderSide,
        price: Decimal,
    ) -> Result<bool, CacheError> {
        let price_field = price_field(price);
        let reply = self
            .transport
            .invoke_script(
                &self.scripts.delete_zero_price_level,
                &self.level_keys(ticker, side),
                &[price_field.as_bytes()],
            )
            .await?;

        let deleted = as_bool(DELETE_PRICE_LEVEL, &reply)?;
        if deleted {
            tracing::debug!(ticker, %side, price = %price_field, "Deleted zero level");
        }
        Ok(deleted)
    }

    /// Deletes the level at `price` if it was last updated more than `max_age_secs` ago,
    /// returning whether it was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails.
    pub async fn delete_stale_level(
        &self,
        ticker: &str,
        side: OrderSide,
        price: Decimal,
        max_age_secs: u64,
    ) -> Result<bool, CacheError> {
        let price_field = price_field(price);
        let max_age = i64::try_from(max_age_secs).unwrap_or(i64::MAX);
        let cutoff = chrono::Utc::now()
            .timestamp()
            .saturating_sub(max_age)
            .to_string();

        let reply = self
            .transport
            .invoke_script(
                &self.scripts.delete_stale_price_level,
                &self.level_keys(ticker, side),
                &[price_field.as_bytes(), cutoff.as_bytes()],
            )
            .await?;

        let deleted = as_bool(DELETE_PRICE_LEVEL, &reply)?;
        if deleted {
            tracing::debug!(ticker, %side, price = %price_field, max_age_secs, "Deleted stale level");
        }
        Ok(deleted)
    }

    /// Reads every level of one side, unsorted.
    ///
    /// Negative levels are always dropped, zero levels only when `remove_zeros` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn read_side(
        &self,
        ticker: &str,
        side: OrderSide,
        remove_zeros: bool,
    ) -> Result<Vec<PriceLevel>, CacheError> {
        Ok(self.fetch_side(ticker, side, remove_zeros).await?.levels)
    }

    async fn fetch_side(
        &self,
        ticker: &str,
        side: OrderSide,
        remove_zeros: bool,
    ) -> Result<JoinedSide, CacheError> {
        let mut pipe = Pipeline::new();
        pipe.atomic()
            .hgetall(self.keys.orderbook_levels(ticker, side))
            .hgetall(self.keys.orderbook_last_updated(ticker, side));

        let (quantums, last_updated): (HashMap<String, String>, HashMap<String, String>) = self
            .transport
            .query_pipeline("get_orderbook_side", &pipe)
            .await?;

        Ok(join_side(
            ticker,
            side,
            &quantums,
            &last_updated,
            remove_zeros,
        ))
    }

    /// Reads both sides of the book for `ticker` and applies `options`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidOptions`] before any read if the option combination is
    /// invalid. Returns an error if a read fails.
    pub async fn read_book(
        &self,
        ticker: &str,
        options: &OrderbookLevelsOptions,
    ) -> Result<OrderbookLevels, CacheError> {
        options.validate()?;

        let (bids, asks) = futures::try_join!(
            self.read_side(ticker, OrderSide::Buy, options.remove_zeros),
            self.read_side(ticker, OrderSide::Sell, options.remove_zeros),
        )?;

        let mut levels = OrderbookLevels::new(bids, asks);
        levels.apply(options)?;
        Ok(levels)
    }

    /// Returns the mean of the best bid and best ask of `ticker`.
    ///
    /// Returns `None` if a side is empty, or if any stored price on either side fails to parse,
    /// since the best level of that side can no longer be known.
    ///
    /// # Errors
    ///
    /// Returns an error if a read fails.
    pub async fn mid_price(&self, ticker: &str) -> Result<Option<Decimal>, CacheError> {
        let (bids, asks) = futures::try_join!(
            self.fetch_side(ticker, OrderSide::Buy, true),
            self.fetch_side(ticker, OrderSide::Sell, true),
        )?;

        if bids.unparsable_price || asks.unparsable_price {
            tracing::error!(ticker, "Unparsable price in book, mid price unavailable");
            return Ok(None);
        }
        Ok(OrderbookLevels::new(bids.levels, asks.levels).mid_price())
    }
}

/// Formats a price as a hash field, so equal prices always address the same level.
pub(crate) fn price_field(price: Decimal) -> String {
    price.normalize().to_string()
}

pub(crate) fn decode_increment_reply(reply: redis::Value) -> Result<IncrementReply, CacheError> {
    let values = into_array(INCREMENT_ORDERBOOK_LEVEL, reply)?;
    let applied = values
        .first()
        .ok_or_else(|| unexpected(INCREMENT_ORDERBOOK_LEVEL, &redis::Value::Nil))?;

    if as_bool(INCREMENT_ORDERBOOK_LEVEL, applied)? {
        let quantums = values
            .get(1)
            .ok_or_else(|| unexpected(INCREMENT_ORDERBOOK_LEVEL, &redis::Value::Nil))?;
        return Ok(IncrementReply::Applied(parse(
            INCREMENT_ORDERBOOK_LEVEL,
            quantums,
        )?));
    }

    let [_, attempted, restored] = <[redis::Value; 3]>::try_from(values)
        .map_err(|values| unexpected(INCREMENT_ORDERBOOK_LEVEL, &redis::Value::Array(values)))?;
    Ok(IncrementReply::Rejected {
        attempted: as_int(INCREMENT_ORDERBOOK_LEVEL, &attempted)?,
        restored: as_int(INCREMENT_ORDERBOOK_LEVEL, &restored)?,
    })
}

/// Joins the quantums and last updated hashes of one side into price levels.
pub(crate) fn join_side(
    ticker: &str,
    side: OrderSide,
    quantums: &HashMap<String, String>,
    last_updated: &HashMap<String, String>,
    remove_zeros: bool,
) -> JoinedSide {
    for price in last_updated.keys().filter(|p| !quantums.contains_key(*p)) {
        tracing::error!(ticker, %side, %price, "Price level has a last updated time but no quantums");
    }

    let mut unparsable_price = false;
    let levels = quantums
        .iter()
        .filter_map(|(price, value)| {
            let Some(updated) = last_updated.get(price) else {
                tracing::error!(ticker, %side, %price, "Price level has quantums but no last updated time");
                return None;
            };

            let Ok(human_price) = Decimal::from_str(price) else {
                tracing::error!(ticker, %side, %price, "Unparsable price");
                unparsable_price = true;
                return None;
            };
            let (Ok(quantums), Ok(updated)) = (value.parse::<i128>(), updated.parse::<i64>())
            else {
                tracing::error!(ticker, %side, %price, %value, %updated, "Unparsable price level");
                return None;
            };

            // Negative aggregates are transient and never exposed
            let quantums = u64::try_from(quantums).ok()?;
            if remove_zeros && quantums == 0 {
                return None;
            }
            Some(PriceLevel::new(human_price, quantums, updated))
        })
        .collect();

    JoinedSide {
        levels,
        unparsable_price,
    }
}
