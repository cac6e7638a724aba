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

//! Atomic place, update and remove operations over a cached order.
//!
//! Each operation is a single script touching the order record, its runtime state, the
//! subaccount index and the expiry index, so readers never see a half applied change.

use indexer_common::enums::SerializationEncoding;
use indexer_model::{
    identifiers::{IndexerOrderId, OrderIdentity},
    orders::{CachedOrder, OrderRuntimeState, validate_total_filled},
};
use redis::Value;

use super::{
    codec::{deserialize_payload, serialize_payload},
    error::CacheError,
    orders::RedisOrdersCache,
    reply::{as_bool, as_int, as_str, into_array, into_bytes, parse, unexpected},
};

const PLACE_ORDER: &str = "place_order";
const REMOVE_ORDER: &str = "remove_order";
const UPDATE_ORDER: &str = "update_order";

/// The outcome of placing an order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaceOrderResult {
    /// No order existed, it was stored with zero fills.
    Placed,
    /// An order with an equal or later expiry exists and was left untouched.
    NotReplaced,
    /// An order with an earlier expiry was overwritten, keeping its fill state.
    Replaced {
        old_order: Box<CachedOrder>,
        old_total_filled: u64,
        old_resting_on_book: bool,
    },
}

impl PlaceOrderResult {
    #[must_use]
    pub const fn placed(&self) -> bool {
        matches!(self, Self::Placed)
    }

    #[must_use]
    pub const fn replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}

/// The outcome of removing an order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoveOrderResult {
    Removed {
        removed_order: Box<CachedOrder>,
        total_filled: u64,
        resting_on_book: bool,
    },
    NotFound,
}

impl RemoveOrderResult {
    #[must_use]
    pub const fn removed(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }
}

/// The outcome of updating an order's fill state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateOrderResult {
    Updated {
        order: Box<CachedOrder>,
        old_total_filled: u64,
        old_resting_on_book: bool,
    },
    NotFound,
}

impl UpdateOrderResult {
    #[must_use]
    pub const fn updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

impl RedisOrdersCache {
    fn order_script_keys(&self, identity: &OrderIdentity) -> Vec<String> {
        vec![
            self.keys.order(&identity.order_uuid),
            self.keys.order_data(&identity.order_uuid),
            self.keys.subaccount_order_ids(&identity.subaccount_uuid),
            self.keys.order_expiry(),
        ]
    }

    /// Places `order`, replacing an existing order only if the new expiry is later.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is invalid, or if the script fails.
    pub async fn place(&self, order: &CachedOrder) -> Result<PlaceOrderResult, CacheError> {
        let (identity, expiry) = order.validate()?;
        if order.id != identity.order_uuid {
            tracing::warn!(
                "Cached order id {} differs from derived id {}, keying by derived id",
                order.id,
                identity.order_uuid
            );
        }

        let encoded = serialize_payload(self.encoding, order)?;
        let expiry = expiry.to_string();
        let order_uuid = identity.order_uuid.to_string();
        let is_short_term: &[u8] = if identity.is_short_term() { b"1" } else { b"0" };

        let reply = self
            .transport
            .invoke_script(
                &self.scripts.place_order,
                &self.order_script_keys(&identity),
                &[
                    encoded.as_slice(),
                    expiry.as_bytes(),
                    order_uuid.as_bytes(),
                    is_short_term,
                ],
            )
            .await?;

        let result = decode_place_reply(self.encoding, reply)?;
        tracing::debug!(
            %order_uuid,
            %expiry,
            placed = result.placed(),
            replaced = result.replaced(),
            "Placed order"
        );
        Ok(result)
    }

    /// Removes the order with `order_id` and every index entry pointing at it.
    ///
    /// # Errors
    ///
    /// Returns an error if the order id is invalid, or if the script fails.
    pub async fn remove(&self, order_id: &IndexerOrderId) -> Result<RemoveOrderResult, CacheError> {
        let identity = order_id.identity()?;
        let order_uuid = identity.order_uuid.to_string();

        let reply = self
            .transport
            .invoke_script(
                &self.scripts.remove_order,
                &self.order_script_keys(&identity),
                &[order_uuid.as_bytes()],
            )
            .await?;

        let result = decode_remove_reply(self.encoding, reply)?;
        tracing::debug!(%order_uuid, removed = result.removed(), "Removed order");
        Ok(result)
    }

    /// Sets the total filled quantums of the order with `order_id` and marks it resting.
    ///
    /// # Errors
    ///
    /// Returns an error if `total_filled` is negative or too large, if the order id is
    /// invalid, or if the script fails.
    pub async fn update(
        &self,
        order_id: &IndexerOrderId,
        total_filled: i128,
    ) -> Result<UpdateOrderResult, CacheError> {
        let total_filled = validate_total_filled(total_filled)?;
        let identity = order_id.identity()?;
        let order_uuid = identity.order_uuid.to_string();
        let total_filled_arg = total_filled.to_string();

        let reply = self
            .transport
            .invoke_script(
                &self.scripts.update_order,
                &[
                    self.keys.order(&identity.order_uuid),
                    self.keys.order_data(&identity.order_uuid),
                ],
                &[total_filled_arg.as_bytes(), order_uuid.as_bytes()],
            )
            .await?;

        let result = decode_update_reply(self.encoding, reply)?;
        tracing::debug!(
            %order_uuid,
            total_filled,
            updated = result.updated(),
            "Updated order"
        );
        Ok(result)
    }
}

fn decode_order(
    operation: &'static str,
    encoding: SerializationEncoding,
    value: Value,
) -> Result<Box<CachedOrder>, CacheError> {
    let bytes = into_bytes(operation, value)?;
    deserialize_payload(encoding, &bytes).map(Box::new)
}

fn decode_resting(operation: &'static str, value: &Value) -> Result<bool, CacheError> {
    parse::<bool>(operation, value)
}

pub(crate) fn decode_place_reply(
    encoding: SerializationEncoding,
    reply: Value,
) -> Result<PlaceOrderResult, CacheError> {
    let values = into_array(PLACE_ORDER, reply)?;
    let placed = values
        .first()
        .ok_or_else(|| unexpected(PLACE_ORDER, &Value::Nil))?;
    let replaced = values
        .get(1)
        .ok_or_else(|| unexpected(PLACE_ORDER, &Value::Nil))?;

    match (as_bool(PLACE_ORDER, placed)?, as_bool(PLACE_ORDER, replaced)?) {
        (true, _) => Ok(PlaceOrderResult::Placed),
        (false, false) => Ok(PlaceOrderResult::NotReplaced),
        (false, true) => {
            let [_, _, old_order, filled, resting] = <[Value; 5]>::try_from(values)
                .map_err(|values| unexpected(PLACE_ORDER, &Value::Array(values)))?;
            Ok(PlaceOrderResult::Replaced {
                old_total_filled: parse(PLACE_ORDER, &filled)?,
                old_resting_on_book: decode_resting(PLACE_ORDER, &resting)?,
                old_order: decode_order(PLACE_ORDER, encoding, old_order)?,
            })
        }
    }
}

pub(crate) fn decode_remove_reply(
    encoding: SerializationEncoding,
    reply: Value,
) -> Result<RemoveOrderResult, CacheError> {
    let values = into_array(REMOVE_ORDER, reply)?;
    let removed = values
        .first()
        .ok_or_else(|| unexpected(REMOVE_ORDER, &Value::Nil))?;

    if as_int(REMOVE_ORDER, removed)? == 0 {
        return Ok(RemoveOrderResult::NotFound);
    }

    let [_, removed_order, order_data] = <[Value; 3]>::try_from(values)
        .map_err(|values| unexpected(REMOVE_ORDER, &Value::Array(values)))?;
    let removed_order = decode_order(REMOVE_ORDER, encoding, removed_order)?;

    // The removal is already committed, so missing state must not fail the call
    let missing_state =
        matches!(order_data, Value::Nil) || as_str(REMOVE_ORDER, &order_data)?.is_empty();
    let state = if missing_state {
        tracing::error!(
            order_uuid = %removed_order.id,
            "Removed order had no runtime state, assuming no fills"
        );
        OrderRuntimeState::default()
    } else {
        parse::<OrderRuntimeState>(REMOVE_ORDER, &order_data)?
    };

    Ok(RemoveOrderResult::Removed {
        removed_order,
        total_filled: state.total_filled,
        resting_on_book: state.resting_on_book,
    })
}

pub(crate) fn decode_update_reply(
    encoding: SerializationEncoding,
    reply: Value,
) -> Result<UpdateOrderResult, CacheError> {
    let values = into_array(UPDATE_ORDER, reply)?;
    let updated = values
        .first()
        .ok_or_else(|| unexpected(UPDATE_ORDER, &Value::Nil))?;

    if as_int(UPDATE_ORDER, updated)? == 0 {
        return Ok(UpdateOrderResult::NotFound);
    }

    let [_, order, filled, resting] = <[Value; 4]>::try_from(values)
        .map_err(|values| unexpected(UPDATE_ORDER, &Value::Array(values)))?;

    Ok(UpdateOrderResult::Updated {
        old_total_filled: parse(UPDATE_ORDER, &filled)?,
        old_resting_on_book: decode_resting(UPDATE_ORDER, &resting)?,
        order: decode_order(UPDATE_ORDER, encoding, order)?,
    })
}
