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

//! Identifiers for accounts and orders, and the deterministic UUIDs used as cache keys.

pub mod order_id;
pub mod subaccount_id;

use uuid::Uuid;

pub use crate::identifiers::{
    order_id::{IndexerOrderId, OrderIdentity},
    subaccount_id::SubaccountId,
};

/// The namespace all indexer UUIDs are derived under (UUID v5).
pub const INDEXER_UUID_NAMESPACE: Uuid = Uuid::from_u128(0x0f9d_a948_a6fb_4c45_9edc_4685_c3f3_317d);

/// Derives the UUID for the given composite `name` under [`INDEXER_UUID_NAMESPACE`].
#[must_use]
pub fn indexer_uuid(name: &str) -> Uuid {
    Uuid::new_v5(&INDEXER_UUID_NAMESPACE, name.as_bytes())
}
