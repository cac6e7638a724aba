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

//! The derived fill and expiry state of a cached order.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::{OrderValidationError, RuntimeStateParseError};

/// The runtime state kept alongside a cached order.
///
/// Persisted as `{expiry}_{total_filled}_{resting_on_book}`.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct OrderRuntimeState {
    pub expiry: u32,
    pub total_filled: u64,
    /// Set once the order has received a fill update, never reset.
    pub resting_on_book: bool,
}

impl OrderRuntimeState {
    #[must_use]
    pub const fn new(expiry: u32, total_filled: u64, resting_on_book: bool) -> Self {
        Self {
            expiry,
            total_filled,
            resting_on_book,
        }
    }
}

impl Display for OrderRuntimeState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.expiry, self.total_filled, self.resting_on_book
        )
    }
}

impl FromStr for OrderRuntimeState {
    type Err = RuntimeStateParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split('_');
        let (Some(expiry), Some(filled), Some(resting), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(RuntimeStateParseError::FieldCount(value.to_string()));
        };

        let field_err = |field| RuntimeStateParseError::Field {
            value: value.to_string(),
            field,
        };

        Ok(Self {
            expiry: expiry.parse().map_err(|_| field_err("expiry"))?,
            total_filled: filled.parse().map_err(|_| field_err("total_filled"))?,
            resting_on_book: resting.parse().map_err(|_| field_err("resting_on_book"))?,
        })
    }
}

/// Validates a total filled amount received from an upstream event.
///
/// # Errors
///
/// Returns an error if `total_filled` is negative or does not fit in a `u64`.
pub fn validate_total_filled(total_filled: i128) -> Result<u64, OrderValidationError> {
    if total_filled < 0 {
        return Err(OrderValidationError::NegativeTotalFilled(total_filled));
    }
    u64::try_from(total_filled).map_err(|_| OrderValidationError::TotalFilledOverflow(total_filled))
}
