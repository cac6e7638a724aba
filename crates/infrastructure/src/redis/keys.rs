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

//! The persisted key layout of every sub-cache.

use indexer_common::config::DEFAULT_KEY_PREFIX;
use indexer_model::enums::OrderSide;
use uuid::Uuid;

// Collection keys
const ORDERS: &str = "orders/";
const ORDER_DATA: &str = "orderData/";
const SUBACCOUNT_ORDER_IDS: &str = "subaccountOrderIds/";
const ORDER_EXPIRY: &str = "orderExpiry";
const ORDERBOOK_LEVELS: &str = "orderbookLevels/";
const LAST_UPDATED: &str = "/lastUpdated";
const CANCELED_ORDERS: &str = "canceled_orders";
const BEST_EFFORT_CANCELED_ORDERS: &str = "best_effort_canceled_orders";
const STATEFUL_ORDER_UPDATES: &str = "stateful_order_updates";
const STATEFUL_ORDER_UPDATE_IDS: &str = "stateful_order_update_ids";
const OPEN_ORDERS: &str = "open_orders/";
const STATE_FILLED_QUANTUMS: &str = "state_filled_quantums/";

/// Builds cache keys under a common namespace prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheKeys {
    prefix: String,
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

impl CacheKeys {
    /// Creates a new [`CacheKeys`] instance.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn order(&self, order_uuid: &Uuid) -> String {
        format!("{}{ORDERS}{order_uuid}", self.prefix)
    }

    #[must_use]
    pub fn order_data(&self, order_uuid: &Uuid) -> String {
        format!("{}{ORDER_DATA}{order_uuid}", self.prefix)
    }

    #[must_use]
    pub fn subaccount_order_ids(&self, subaccount_uuid: &Uuid) -> String {
        format!("{}{SUBACCOUNT_ORDER_IDS}{subaccount_uuid}", self.prefix)
    }

    #[must_use]
    pub fn order_expiry(&self) -> String {
        format!("{}{ORDER_EXPIRY}", self.prefix)
    }

    /// The hash of price to aggregated quantums for one side of a market.
    #[must_use]
    pub fn orderbook_levels(&self, ticker: &str, side: OrderSide) -> String {
        format!("{}{ORDERBOOK_LEVELS}{ticker}/{side}", self.prefix)
    }

    /// The hash of price to last-updated seconds shadowing [`CacheKeys::orderbook_levels`].
    #[must_use]
    pub fn orderbook_last_updated(&self, ticker: &str, side: OrderSide) -> String {
        format!("{}{LAST_UPDATED}", self.orderbook_levels(ticker, side))
    }

    #[must_use]
    pub fn canceled_orders(&self) -> String {
        format!("{}{CANCELED_ORDERS}", self.prefix)
    }

    #[must_use]
    pub fn best_effort_canceled_orders(&self) -> String {
        format!("{}{BEST_EFFORT_CANCELED_ORDERS}", self.prefix)
    }

    #[must_use]
    pub fn stateful_order_updates(&self) -> String {
        format!("{}{STATEFUL_ORDER_UPDATES}", self.prefix)
    }

    #[must_use]
    pub fn stateful_order_update_ids(&self) -> String {
        format!("{}{STATEFUL_ORDER_UPDATE_IDS}", self.prefix)
    }

    #[must_use]
    pub fn open_orders(&self, clob_pair_id: u32) -> String {
        format!("{}{OPEN_ORDERS}{clob_pair_id}", self.prefix)
    }

    #[must_use]
    pub fn state_filled_quantums(&self, order_uuid: &Uuid) -> String {
        format!("{}{STATE_FILLED_QUANTUMS}{order_uuid}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_default_layout() {
        let keys = CacheKeys::default();
        let uuid = Uuid::nil();

        assert_eq!(
            keys.order(&uuid),
            "v4/orders/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            keys.order_data(&uuid),
            "v4/orderData/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            keys.subaccount_order_ids(&uuid),
            "v4/subaccountOrderIds/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(keys.order_expiry(), "v4/orderExpiry");
        assert_eq!(keys.canceled_orders(), "v4/canceled_orders");
        assert_eq!(
            keys.best_effort_canceled_orders(),
            "v4/best_effort_canceled_orders"
        );
        assert_eq!(keys.stateful_order_updates(), "v4/stateful_order_updates");
        assert_eq!(
            keys.stateful_order_update_ids(),
            "v4/stateful_order_update_ids"
        );
        assert_eq!(keys.open_orders(7), "v4/open_orders/7");
        assert_eq!(
            keys.state_filled_quantums(&uuid),
            "v4/state_filled_quantums/00000000-0000-0000-0000-000000000000"
        );
    }

    #[rstest]
    #[case(OrderSide::Buy, "v4/orderbookLevels/BTC-USD/BUY")]
    #[case(OrderSide::Sell, "v4/orderbookLevels/BTC-USD/SELL")]
    fn test_orderbook_keys(#[case] side: OrderSide, #[case] expected: &str) {
        let keys = CacheKeys::default();
        assert_eq!(keys.orderbook_levels("BTC-USD", side), expected);
        assert_eq!(
            keys.orderbook_last_updated("BTC-USD", side),
            format!("{expected}/lastUpdated")
        );
    }

    #[rstest]
    fn test_custom_prefix() {
        let keys = CacheKeys::new("test-1/");
        assert_eq!(keys.prefix(), "test-1/");
        assert_eq!(keys.order_expiry(), "test-1/orderExpiry");
    }
}
