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

//! Represents the composite id of an order as emitted by the chain.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{SubaccountId, indexer_uuid};
use crate::{enums::OrderFlags, error::OrderValidationError};

/// Represents the composite id of an order as emitted by the chain.
///
/// The subaccount is optional because the id arrives from an external wire format where every
/// nested message may be absent. Use [`IndexerOrderId::identity`] to validate it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerOrderId {
    pub subaccount_id: Option<SubaccountId>,
    /// The client assigned id, unique per subaccount for live orders.
    pub client_id: u32,
    pub order_flags: OrderFlags,
    /// The id of the market (CLOB pair) the order is placed on.
    pub clob_pair_id: u32,
}

/// The validated identity of an order, carrying everything needed to key it in the cache.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct OrderIdentity {
    pub subaccount_id: SubaccountId,
    pub order_uuid: Uuid,
    pub subaccount_uuid: Uuid,
    pub clob_pair_id: u32,
    pub order_flags: OrderFlags,
}

impl OrderIdentity {
    #[must_use]
    pub const fn is_short_term(&self) -> bool {
        self.order_flags.is_short_term()
    }
}

impl IndexerOrderId {
    /// Creates a new [`IndexerOrderId`] instance.
    #[must_use]
    pub const fn new(
        subaccount_id: SubaccountId,
        client_id: u32,
        order_flags: OrderFlags,
        clob_pair_id: u32,
    ) -> Self {
        Self {
            subaccount_id: Some(subaccount_id),
            client_id,
            order_flags,
            clob_pair_id,
        }
    }

    /// Returns the validated identity of this order id.
    ///
    /// # Errors
    ///
    /// Returns [`OrderValidationError::MissingSubaccountId`] if the subaccount is absent.
    pub fn identity(&self) -> Result<OrderIdentity, OrderValidationError> {
        let subaccount_id = self
            .subaccount_id
            .ok_or(OrderValidationError::MissingSubaccountId)?;
        let subaccount_uuid = subaccount_id.uuid();

        Ok(OrderIdentity {
            subaccount_id,
            order_uuid: order_uuid(
                subaccount_uuid,
                self.client_id,
                self.clob_pair_id,
                self.order_flags,
            ),
            subaccount_uuid,
            clob_pair_id: self.clob_pair_id,
            order_flags: self.order_flags,
        })
    }

    /// Returns the order UUID used as the cache key.
    ///
    /// # Errors
    ///
    /// Returns [`OrderValidationError::MissingSubaccountId`] if the subaccount is absent.
    pub fn uuid(&self) -> Result<Uuid, OrderValidationError> {
        self.identity().map(|identity| identity.order_uuid)
    }
}

/// Derives the order UUID from its components.
///
/// The name hashed is `{subaccount_uuid}-{client_id}-{clob_pair_id}-{order_flags}`; each
/// component after the UUID is a plain decimal integer so the encoding is unambiguous.
#[must_use]
pub fn order_uuid(
    subaccount_uuid: Uuid,
    client_id: u32,
    clob_pair_id: u32,
    order_flags: OrderFlags,
) -> Uuid {
    indexer_uuid(&format!(
        "{subaccount_uuid}-{client_id}-{clob_pair_id}-{}",
        order_flags.value()
    ))
}
