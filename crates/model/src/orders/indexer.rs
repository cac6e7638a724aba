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

use serde::{Deserialize, Serialize};

use super::GoodTilOneof;
use crate::{
    enums::{ConditionType, OrderSide, TimeInForce},
    error::OrderValidationError,
    identifiers::{IndexerOrderId, OrderIdentity},
};

/// An order as emitted by the chain, with sizes in quantums and prices in subticks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerOrder {
    pub order_id: Option<IndexerOrderId>,
    pub side: OrderSide,
    /// The order size in base quantums.
    pub quantums: u64,
    /// The limit price in subticks.
    pub subticks: u64,
    pub good_til_oneof: GoodTilOneof,
    pub time_in_force: TimeInForce,
    pub reduce_only: bool,
    pub client_metadata: u32,
    pub condition_type: ConditionType,
    pub conditional_order_trigger_subticks: u64,
}

impl IndexerOrder {
    /// Returns the order's expiry, the block height or block time it is good until.
    #[must_use]
    pub const fn expiry(&self) -> u32 {
        self.good_til_oneof.value()
    }

    /// Returns the quantums left to fill given `total_filled`, saturating at zero.
    #[must_use]
    pub const fn remaining_quantums(&self, total_filled: u64) -> u64 {
        self.quantums.saturating_sub(total_filled)
    }

    #[must_use]
    pub const fn is_conditional(&self) -> bool {
        !matches!(self.condition_type, ConditionType::Unspecified)
    }

    /// Returns the validated identity of the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order id or its subaccount id is missing.
    pub fn identity(&self) -> Result<OrderIdentity, OrderValidationError> {
        self.order_id
            .as_ref()
            .ok_or(OrderValidationError::MissingOrderId)?
            .identity()
    }
}
