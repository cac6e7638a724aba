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

//! Tests against a live Redis server on localhost:6379.
//!
//! Every test writes under its own key prefix, so tests may run concurrently.

#![cfg(feature = "redis-tests")]

#[cfg(test)]
mod serial_tests {
    use indexer_common::{
        config::{CacheConfig, DatabaseConfig},
        enums::SerializationEncoding,
    };
    use indexer_infrastructure::redis::{
        cache::RedisOrderCache,
        error::CacheError,
        keys::CacheKeys,
        lifecycle::{PlaceOrderResult, RemoveOrderResult, UpdateOrderResult},
    };
    use indexer_model::{
        enums::{CanceledOrderStatus, OrderSide},
        error::InvalidOptionsError,
        identifiers::IndexerOrderId,
        orderbook::OrderbookLevelsOptions,
        orders::{CachedOrder, GoodTilOneof, OrderRuntimeState},
        stubs::{TEST_TICKER, short_term_order_id, subaccount_id, test_cached_order, test_order},
    };
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use uuid::Uuid;

    async fn get_cache(encoding: SerializationEncoding) -> RedisOrderCache {
        let config = CacheConfig {
            database: Some(DatabaseConfig::default()),
            encoding,
            key_prefix: format!("test-{}/", Uuid::new_v4()),
            ..Default::default()
        };
        RedisOrderCache::new(config).await.unwrap()
    }

    fn short_term(client_id: u32, good_til_block: u32) -> CachedOrder {
        test_cached_order(test_order(
            short_term_order_id(client_id),
            GoodTilOneof::GoodTilBlock(good_til_block),
        ))
    }

    fn expiry_of(order: &CachedOrder) -> u32 {
        order.validate().unwrap().1
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_place_replace_by_expiry() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let order_id = short_term_order_id(1);
        let order_uuid = order_id.uuid().unwrap();

        let result = cache.orders.place(&short_term(1, 1150)).await.unwrap();
        assert_eq!(result, PlaceOrderResult::Placed);

        let result = cache.orders.place(&short_term(1, 1149)).await.unwrap();
        assert_eq!(result, PlaceOrderResult::NotReplaced);
        let stored = cache.orders.get(&order_uuid).await.unwrap().unwrap();
        assert_eq!(expiry_of(&stored), 1150);

        let result = cache.orders.place(&short_term(1, 1151)).await.unwrap();
        let PlaceOrderResult::Replaced { old_order, .. } = result else {
            panic!("expected replacement, was {result:?}");
        };
        assert_eq!(expiry_of(&old_order), 1150);

        let stored = cache.orders.get(&order_uuid).await.unwrap().unwrap();
        assert_eq!(expiry_of(&stored), 1151);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_replacement_preserves_fill_state() {
        let cache = get_cache(SerializationEncoding::MsgPack).await;
        let order_id = short_term_order_id(2);
        let order_uuid = order_id.uuid().unwrap();

        cache.orders.place(&short_term(2, 100)).await.unwrap();
        let result = cache.orders.update(&order_id, 400).await.unwrap();
        assert!(result.updated());

        for (expiry, wins) in [(105, true), (101, false), (105, false), (110, true)] {
            let result = cache.orders.place(&short_term(2, expiry)).await.unwrap();
            assert_eq!(result.replaced(), wins, "expiry {expiry}");
            if let PlaceOrderResult::Replaced {
                old_total_filled,
                old_resting_on_book,
                ..
            } = result
            {
                assert_eq!(old_total_filled, 400);
                assert!(old_resting_on_book);
            }
        }

        let state = cache
            .orders
            .get_runtime_state(&order_uuid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state, OrderRuntimeState::new(110, 400, true));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_order() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let order_id = short_term_order_id(3);
        let order = short_term(3, 1150);

        let result = cache.orders.update(&order_id, 10).await.unwrap();
        assert_eq!(result, UpdateOrderResult::NotFound);

        cache.orders.place(&order).await.unwrap();
        let result = cache.orders.update(&order_id, 250).await.unwrap();
        assert_eq!(
            result,
            UpdateOrderResult::Updated {
                order: Box::new(order.clone()),
                old_total_filled: 0,
                old_resting_on_book: false,
            }
        );

        let result = cache.orders.update(&order_id, 0).await.unwrap();
        let UpdateOrderResult::Updated {
            old_total_filled,
            old_resting_on_book,
            ..
        } = result
        else {
            panic!("expected update, was {result:?}");
        };
        assert_eq!(old_total_filled, 250);
        assert!(old_resting_on_book);

        let result = cache.orders.update(&order_id, -1).await;
        assert!(matches!(result, Err(CacheError::Validation(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remove_clears_every_index() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let order_id = short_term_order_id(4);
        let order_uuid = order_id.uuid().unwrap();
        let subaccount_uuid = subaccount_id().uuid();
        let order = short_term(4, 1150);

        cache.orders.place(&order).await.unwrap();
        cache.orders.update(&order_id, 300).await.unwrap();
        assert!(
            cache
                .orders
                .account_orders(&subaccount_uuid)
                .await
                .unwrap()
                .contains(&order_uuid)
        );
        assert_eq!(
            cache.orders.order_ids_expiring_by(1150, true).await.unwrap(),
            vec![order_uuid]
        );

        let result = cache.orders.remove(&order_id).await.unwrap();
        assert_eq!(
            result,
            RemoveOrderResult::Removed {
                removed_order: Box::new(order),
                total_filled: 300,
                resting_on_book: true,
            }
        );

        assert!(cache.orders.get(&order_uuid).await.unwrap().is_none());
        assert!(
            cache
                .orders
                .get_runtime_state(&order_uuid)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            !cache
                .orders
                .account_orders(&subaccount_uuid)
                .await
                .unwrap()
                .contains(&order_uuid)
        );
        assert!(
            cache
                .orders
                .orders_expiring_by(u32::MAX, true)
                .await
                .unwrap()
                .is_empty()
        );

        let result = cache.orders.remove(&order_id).await.unwrap();
        assert_eq!(result, RemoveOrderResult::NotFound);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remove_with_missing_runtime_state() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let order_id = short_term_order_id(6);
        let order_uuid = order_id.uuid().unwrap();
        let order = short_term(6, 1150);
        cache.orders.place(&order).await.unwrap();

        let keys = CacheKeys::new(&cache.config().key_prefix);
        let mut con = cache.transport().connection();
        redis::cmd("DEL")
            .arg(keys.order_data(&order_uuid))
            .exec_async(&mut con)
            .await
            .unwrap();

        let result = cache.orders.remove(&order_id).await.unwrap();
        assert_eq!(
            result,
            RemoveOrderResult::Removed {
                removed_order: Box::new(order),
                total_filled: 0,
                resting_on_book: false,
            }
        );
        assert!(cache.orders.get(&order_uuid).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remove_never_placed() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let result = cache.orders.remove(&short_term_order_id(99)).await.unwrap();
        assert!(!result.removed());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remove_without_subaccount_rejected() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let mut order_id: IndexerOrderId = short_term_order_id(5);
        order_id.subaccount_id = None;

        let result = cache.orders.remove(&order_id).await;
        assert!(matches!(result, Err(CacheError::Validation(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_long_term_orders_not_in_expiry_index() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let order = test_cached_order(test_order(
            IndexerOrderId::new(
                subaccount_id(),
                6,
                indexer_model::enums::OrderFlags::LongTerm,
                0,
            ),
            GoodTilOneof::GoodTilBlockTime(1_700_000_000),
        ));

        assert!(cache.orders.place(&order).await.unwrap().placed());
        assert!(
            cache
                .orders
                .orders_expiring_by(u32::MAX, true)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_account_orders_bulk() {
        let cache = get_cache(SerializationEncoding::Json).await;
        for client_id in 10..13 {
            cache
                .orders
                .place(&short_term(client_id, 1150))
                .await
                .unwrap();
        }

        let subaccount_uuid = subaccount_id().uuid();
        let other = Uuid::new_v4();
        let result = cache
            .orders
            .account_orders_bulk(&[subaccount_uuid, other])
            .await
            .unwrap();

        assert_eq!(result[&subaccount_uuid].len(), 3);
        assert!(result[&other].is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_expiry_range_boundary() {
        let cache = get_cache(SerializationEncoding::Json).await;
        for (client_id, expiry) in [(20, 99), (21, 100), (22, 101)] {
            cache
                .orders
                .place(&short_term(client_id, expiry))
                .await
                .unwrap();
        }

        let exclusive = cache.orders.orders_expiring_by(100, false).await.unwrap();
        let inclusive = cache.orders.orders_expiring_by(100, true).await.unwrap();

        let at_threshold = short_term_order_id(21).uuid().unwrap();
        assert_eq!(exclusive.len(), 1);
        assert!(!exclusive.contains_key(&at_threshold));
        assert_eq!(inclusive.len(), 2);
        assert_eq!(inclusive[&at_threshold], 100);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_increment_to_zero_and_read_side() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let levels = &cache.orderbook_levels;
        let price = dec!(50000);

        assert_eq!(
            levels
                .increment_level(TEST_TICKER, OrderSide::Buy, price, 3000)
                .await
                .unwrap(),
            3000
        );
        assert_eq!(
            levels
                .increment_level(TEST_TICKER, OrderSide::Buy, price, -3000)
                .await
                .unwrap(),
            0
        );

        let side = levels
            .read_side(TEST_TICKER, OrderSide::Buy, true)
            .await
            .unwrap();
        assert!(side.is_empty());

        let side = levels
            .read_side(TEST_TICKER, OrderSide::Buy, false)
            .await
            .unwrap();
        assert_eq!(side.len(), 1);
        assert_eq!(side[0].human_price, price);
        assert_eq!(side[0].quantums, 0);

        assert!(
            levels
                .delete_zero_level(TEST_TICKER, OrderSide::Buy, price)
                .await
                .unwrap()
        );
        assert!(
            !levels
                .delete_zero_level(TEST_TICKER, OrderSide::Buy, price)
                .await
                .unwrap()
        );
        assert!(
            levels
                .read_side(TEST_TICKER, OrderSide::Buy, false)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_negative_increment_restored() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let levels = &cache.orderbook_levels;
        let price = dec!(50000);

        levels
            .increment_level(TEST_TICKER, OrderSide::Sell, price, 1000)
            .await
            .unwrap();
        let result = levels
            .increment_level(TEST_TICKER, OrderSide::Sell, price, -2000)
            .await;

        let Err(CacheError::InvalidPriceLevelUpdate {
            attempted,
            restored,
            delta,
            ..
        }) = result
        else {
            panic!("expected invalid update, was {result:?}");
        };
        assert_eq!(delta, -2000);
        assert_eq!(attempted, -1000);
        assert_eq!(restored, 1000);

        assert_eq!(
            levels
                .get_level(TEST_TICKER, OrderSide::Sell, price)
                .await
                .unwrap(),
            Some(1000)
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_increment_conservation() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let levels = &cache.orderbook_levels;
        let price = dec!(0.15);
        let deltas = [500, -200, 1_000, -1_300, 42, 7];

        let mut expected: i64 = 0;
        for delta in deltas {
            let quantums = levels
                .increment_level(TEST_TICKER, OrderSide::Buy, price, delta)
                .await
                .unwrap();
            expected += delta;
            assert_eq!(i64::try_from(quantums).unwrap(), expected);
        }

        // Same level addressed by an equal price with different scale
        assert_eq!(
            levels
                .get_level(TEST_TICKER, OrderSide::Buy, dec!(0.150))
                .await
                .unwrap(),
            Some(49)
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_read_book_uncrossed() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let levels = &cache.orderbook_levels;

        for (price, quantums) in [(45_100, 2_000), (59_000, 1_000), (49_300, 6_000)] {
            levels
                .increment_level(TEST_TICKER, OrderSide::Buy, Decimal::from(price), quantums)
                .await
                .unwrap();
        }
        for (price, quantums) in [(52_200, 8_000), (39_000, 1_000), (54_200, 4_000)] {
            levels
                .increment_level(TEST_TICKER, OrderSide::Sell, Decimal::from(price), quantums)
                .await
                .unwrap();
        }

        let options = OrderbookLevelsOptions {
            sort_sides: true,
            uncross_book: true,
            ..Default::default()
        };
        let book = levels.read_book(TEST_TICKER, &options).await.unwrap();

        assert!(!book.bids.is_empty());
        assert!(!book.asks.is_empty());
        for bid in &book.bids {
            for ask in &book.asks {
                assert!(bid.human_price < ask.human_price, "{bid} crosses {ask}");
            }
        }

        let options = OrderbookLevelsOptions {
            sort_sides: true,
            limit_per_side: Some(1),
            ..Default::default()
        };
        let book = levels.read_book(TEST_TICKER, &options).await.unwrap();
        assert_eq!(book.bids.len(), 1);
        assert_eq!(book.bids[0].human_price, dec!(59000));
        assert_eq!(book.asks[0].human_price, dec!(39000));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_read_book_rejects_uncross_without_sort() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let options = OrderbookLevelsOptions {
            uncross_book: true,
            ..Default::default()
        };

        let result = cache
            .orderbook_levels
            .read_book(TEST_TICKER, &options)
            .await;
        assert!(matches!(
            result,
            Err(CacheError::InvalidOptions(
                InvalidOptionsError::UncrossWithoutSort
            ))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_mid_price() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let levels = &cache.orderbook_levels;

        assert_eq!(levels.mid_price(TEST_TICKER).await.unwrap(), None);

        levels
            .increment_level(TEST_TICKER, OrderSide::Buy, dec!(100), 10)
            .await
            .unwrap();
        levels
            .increment_level(TEST_TICKER, OrderSide::Buy, dec!(99.5), 10)
            .await
            .unwrap();
        assert_eq!(levels.mid_price(TEST_TICKER).await.unwrap(), None);

        levels
            .increment_level(TEST_TICKER, OrderSide::Sell, dec!(101), 10)
            .await
            .unwrap();
        assert_eq!(
            levels.mid_price(TEST_TICKER).await.unwrap(),
            Some(dec!(100.5))
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_mid_price_none_with_unparsable_price() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let levels = &cache.orderbook_levels;

        levels
            .increment_level(TEST_TICKER, OrderSide::Buy, dec!(100), 10)
            .await
            .unwrap();
        levels
            .increment_level(TEST_TICKER, OrderSide::Sell, dec!(101), 10)
            .await
            .unwrap();

        let keys = CacheKeys::new(&cache.config().key_prefix);
        let mut con = cache.transport().connection();
        redis::cmd("HSET")
            .arg(keys.orderbook_levels(TEST_TICKER, OrderSide::Buy))
            .arg("not-a-price")
            .arg("10")
            .exec_async(&mut con)
            .await
            .unwrap();
        redis::cmd("HSET")
            .arg(keys.orderbook_last_updated(TEST_TICKER, OrderSide::Buy))
            .arg("not-a-price")
            .arg("1")
            .exec_async(&mut con)
            .await
            .unwrap();

        assert_eq!(levels.mid_price(TEST_TICKER).await.unwrap(), None);
        assert_eq!(
            levels
                .read_side(TEST_TICKER, OrderSide::Buy, true)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_stale_level() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let levels = &cache.orderbook_levels;
        let price = dec!(50000);

        levels
            .increment_level(TEST_TICKER, OrderSide::Buy, price, 10)
            .await
            .unwrap();
        assert!(
            !levels
                .delete_stale_level(TEST_TICKER, OrderSide::Buy, price, 3600)
                .await
                .unwrap()
        );

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        assert!(
            levels
                .delete_stale_level(TEST_TICKER, OrderSide::Buy, price, 0)
                .await
                .unwrap()
        );
        assert_eq!(
            levels
                .get_level(TEST_TICKER, OrderSide::Buy, price)
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_canceled_markers() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let canceled = &cache.canceled_orders;
        let order_uuid = Uuid::new_v4();
        let now = 1_700_000_000_000;

        assert_eq!(
            canceled.status(&order_uuid).await.unwrap(),
            CanceledOrderStatus::NotCanceled
        );

        assert!(
            canceled
                .mark_best_effort_canceled(&order_uuid, now)
                .await
                .unwrap()
        );
        assert_eq!(
            canceled.status(&order_uuid).await.unwrap(),
            CanceledOrderStatus::BestEffortCanceled
        );

        canceled.mark_canceled(&order_uuid, now + 1).await.unwrap();
        assert!(canceled.is_canceled(&order_uuid).await.unwrap());
        assert!(!canceled.is_best_effort_canceled(&order_uuid).await.unwrap());

        // Already hard canceled
        assert!(
            !canceled
                .mark_best_effort_canceled(&order_uuid, now + 2)
                .await
                .unwrap()
        );
        assert_eq!(
            canceled.status(&order_uuid).await.unwrap(),
            CanceledOrderStatus::Canceled
        );

        assert!(canceled.remove_from_caches(&order_uuid).await.unwrap());
        assert!(!canceled.remove_from_caches(&order_uuid).await.unwrap());
        assert_eq!(
            canceled.status(&order_uuid).await.unwrap(),
            CanceledOrderStatus::NotCanceled
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_canceled_markers_evicted_outside_window() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let canceled = &cache.canceled_orders;
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        let now = 1_700_000_000_000;

        canceled.mark_canceled(&old, now).await.unwrap();
        canceled.mark_canceled(&new, now + 30_001).await.unwrap();

        assert!(!canceled.is_canceled(&old).await.unwrap());
        assert!(canceled.is_canceled(&new).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stateful_order_updates() {
        let cache = get_cache(SerializationEncoding::MsgPack).await;
        let updates = &cache.stateful_order_updates;
        let order_uuid = Uuid::new_v4();
        let first = json!({"order_removal": {"reason": "EXPIRED"}});
        let second = json!({"order_removal": {"reason": "CANCELED"}});

        updates.enqueue(&order_uuid, &first, 1_000).await.unwrap();
        updates.enqueue(&order_uuid, &second, 2_000).await.unwrap();

        let stale: Option<serde_json::Value> =
            updates.dequeue_if_current(&order_uuid, 1_000).await.unwrap();
        assert!(stale.is_none());

        assert_eq!(updates.pending_before(2_000).await.unwrap(), vec![]);
        assert_eq!(
            updates.pending_before(2_001).await.unwrap(),
            vec![(order_uuid, 2_000)]
        );

        let current: Option<serde_json::Value> =
            updates.dequeue_if_current(&order_uuid, 2_000).await.unwrap();
        assert_eq!(current, Some(second));
        assert!(updates.pending_before(i64::MAX).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_orders() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let open_orders = &cache.open_orders;
        let order_uuid = Uuid::new_v4();

        assert!(open_orders.add_open_order(&order_uuid, 7).await.unwrap());
        assert!(!open_orders.add_open_order(&order_uuid, 7).await.unwrap());
        assert!(open_orders.is_open(&order_uuid, 7).await.unwrap());
        assert!(!open_orders.is_open(&order_uuid, 8).await.unwrap());
        assert!(open_orders.open_orders(7).await.unwrap().contains(&order_uuid));

        assert!(open_orders.remove_open_order(&order_uuid, 7).await.unwrap());
        assert!(open_orders.open_orders(7).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_state_filled_quantums() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let state_filled = &cache.state_filled_quantums;
        let order_uuid = Uuid::new_v4();

        assert_eq!(
            state_filled
                .get_state_filled_quantums(&order_uuid)
                .await
                .unwrap(),
            None
        );
        state_filled
            .set_state_filled_quantums(&order_uuid, 1_234)
            .await
            .unwrap();
        assert_eq!(
            state_filled
                .get_state_filled_quantums(&order_uuid)
                .await
                .unwrap(),
            Some(1_234)
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_scripts_reloaded_after_flush() {
        let cache = get_cache(SerializationEncoding::Json).await;
        let mut con = cache.transport().connection();
        redis::cmd("SCRIPT")
            .arg("FLUSH")
            .exec_async(&mut con)
            .await
            .unwrap();

        let result = cache.orders.place(&short_term(30, 1150)).await.unwrap();
        assert!(result.placed());
    }
}
