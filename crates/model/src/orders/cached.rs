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

//! The canonical cached representation of an order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ustr::Ustr;
use uuid::Uuid;

use super::IndexerOrder;
use crate::{enums::TickerType, error::OrderValidationError, identifiers::OrderIdentity};

/// The canonical record of an order stored in the cache, keyed by its UUID.
///
/// `order` is optional to mirror the external wire format; [`CachedOrder::validate`] rejects a
/// record without one before any store call is made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedOrder {
    pub id: Uuid,
    pub order: Option<IndexerOrder>,
    pub ticker: Ustr,
    pub ticker_type: TickerType,
    /// The human readable limit price.
    pub price: Decimal,
    /// The human readable order size.
    pub size: Decimal,
}

impl CachedOrder {
    /// Creates a new [`CachedOrder`], deriving its `id` from the order id.
    ///
    /// # Errors
    ///
    /// Returns an error if the order id or its subaccount id is missing.
    pub fn new(
        order: IndexerOrder,
        ticker: Ustr,
        ticker_type: TickerType,
        price: Decimal,
        size: Decimal,
    ) -> Result<Self, OrderValidationError> {
        let id = order.identity()?.order_uuid;
        Ok(Self {
            id,
            order: Some(order),
            ticker,
            ticker_type,
            price,
            size,
        })
    }

    /// Returns the inner order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderValidationError::MissingOrder`] if the record carries no order.
    pub fn order(&self) -> Result<&IndexerOrder, OrderValidationError> {
        self.order.as_ref().ok_or(OrderValidationError::MissingOrder)
    }

    /// Validates the record for placement and returns the order identity with its expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the order, its order id or its subaccount id is missing.
    pub fn validate(&self) -> Result<(OrderIdentity, u32), OrderValidationError> {
        let order = self.order()?;
        Ok((order.identity()?, order.expiry()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::stubs::{cached_order, short_term_order};

    #[rstest]
    fn test_new_derives_id(short_term_order: IndexerOrder) {
        let expected = short_term_order.identity().unwrap().order_uuid;
        let cached = CachedOrder::new(
            short_term_order,
            Ustr::from("BTC-USD"),
            TickerType::Perpetual,
            Decimal::from(50_000),
            Decimal::ONE,
        )
        .unwrap();
        assert_eq!(cached.id, expected);
    }

    #[rstest]
    fn test_validate(cached_order: CachedOrder) {
        let (identity, expiry) = cached_order.validate().unwrap();
        assert_eq!(identity.order_uuid, cached_order.id);
        assert_eq!(expiry, 1150);
    }

    #[rstest]
    fn test_validate_missing_order(mut cached_order: CachedOrder) {
        cached_order.order = None;
        assert_eq!(
            cached_order.validate(),
            Err(OrderValidationError::MissingOrder)
        );
    }

    #[rstest]
    fn test_validate_missing_subaccount(mut cached_order: CachedOrder) {
        if let Some(order) = cached_order.order.as_mut()
            && let Some(order_id) = order.order_id.as_mut()
        {
            order_id.subaccount_id = None;
        }
        assert_eq!(
            cached_order.validate(),
            Err(OrderValidationError::MissingSubaccountId)
        );
    }

    #[rstest]
    fn test_json_round_trip(cached_order: CachedOrder) {
        let json = serde_json::to_string(&cached_order).unwrap();
        let decoded: CachedOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, cached_order);
    }
}
