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

//! Represents an account on the exchange, an owner address plus a subaccount number.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use ustr::Ustr;
use uuid::Uuid;

use super::indexer_uuid;

/// Represents an account on the exchange, an owner address plus a subaccount number.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubaccountId {
    /// The address owning the subaccount.
    pub owner: Ustr,
    /// The subaccount number under the owner.
    pub number: u32,
}

impl SubaccountId {
    /// Creates a new [`SubaccountId`] instance.
    #[must_use]
    pub fn new<T: AsRef<str>>(owner: T, number: u32) -> Self {
        Self {
            owner: Ustr::from(owner.as_ref()),
            number,
        }
    }

    /// Returns the deterministic UUID of this subaccount, used to key its order index.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        indexer_uuid(&format!("{}-{}", self.owner, self.number))
    }
}

impl Display for SubaccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.number)
    }
}
