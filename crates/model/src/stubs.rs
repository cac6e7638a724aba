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

//! Type stubs to facilitate testing.

use rstest::fixture;
use rust_decimal::Decimal;
use ustr::Ustr;

use crate::{
    enums::{ConditionType, OrderFlags, OrderSide, TickerType, TimeInForce},
    identifiers::{IndexerOrderId, SubaccountId},
    orderbook::{OrderbookLevels, PriceLevel},
    orders::{CachedOrder, GoodTilOneof, IndexerOrder},
};

pub const TEST_OWNER: &str = "dydx1x2hd82qerp7lc0kf5cs3yekftupkrl620te6u2";
pub const TEST_TICKER: &str = "BTC-USD";

#[fixture]
pub fn subaccount_id() -> SubaccountId {
    SubaccountId::new(TEST_OWNER, 0)
}

/// Returns a short-term order id for `client_id` on market 0.
#[must_use]
pub fn short_term_order_id(client_id: u32) -> IndexerOrderId {
    IndexerOrderId::new(subaccount_id(), client_id, OrderFlags::ShortTerm, 0)
}

/// Returns a BUY order of 1,000 quantums with the given order id and liveness bound.
#[must_use]
pub fn test_order(order_id: IndexerOrderId, good_til_oneof: GoodTilOneof) -> IndexerOrder {
    IndexerOrder {
        order_id: Some(order_id),
        side: OrderSide::Buy,
        quantums: 1_000,
        subticks: 2_000,
        good_til_oneof,
        time_in_force: TimeInForce::Unspecified,
        reduce_only: false,
        client_metadata: 0,
        condition_type: ConditionType::Unspecified,
        conditional_order_trigger_subticks: 0,
    }
}

/// Wraps `order` in a [`CachedOrder`] on the test ticker.
///
/// # Panics
///
/// Panics if the order id is incomplete.
#[must_use]
pub fn test_cached_order(order: IndexerOrder) -> CachedOrder {
    CachedOrder::new(
        order,
        Ustr::from(TEST_TICKER),
        TickerType::Perpetual,
        Decimal::from(50_000),
        Decimal::new(1, 1),
    )
    .expect("test order id must be complete")
}

#[fixture]
pub fn short_term_order() -> IndexerOrder {
    test_order(short_term_order_id(1), GoodTilOneof::GoodTilBlock(1150))
}

#[fixture]
pub fn long_term_order() -> IndexerOrder {
    test_order(
        IndexerOrderId::new(subaccount_id(), 2, OrderFlags::LongTerm, 0),
        GoodTilOneof::GoodTilBlockTime(1_700_000_000),
    )
}

#[fixture]
pub fn cached_order(short_term_order: IndexerOrder) -> CachedOrder {
    test_cached_order(short_term_order)
}

/// A crossed book whose stale and undersized crossing levels must be removed.
///
/// After uncrossing the bids are 49300, 45200, 45100 and the asks 52200, 54200, 59300.
#[fixture]
pub fn crossed_levels() -> OrderbookLevels {
    let level = |price: i64, quantums: u64, last_updated: i64| {
        PriceLevel::new(Decimal::from(price), quantums, last_updated)
    };

    OrderbookLevels::new(
        vec![
            level(45_100, 2_000, 10),
            level(60_000, 10_000, 5),
            level(45_200, 5_000, 10),
            level(59_000, 1_000, 10),
            level(49_300, 6_000, 10),
            level(58_000, 8_000, 10),
        ],
        vec![
            level(59_300, 1_000, 10),
            level(39_000, 1_000, 10),
            level(52_200, 8_000, 10),
            level(40_000, 10_000, 5),
            level(54_200, 4_000, 10),
        ],
    )
}
