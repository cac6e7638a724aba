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

//! Redis backed caches for the indexer order lifecycle and orderbook price levels.
//!
//! The `indexer-infrastructure` crate keeps a low-latency mirror of exchange order state and
//! aggregated price-level depth in Redis, correct under out-of-order and at-least-once event
//! delivery:
//!
//! - **Order lifecycle**: atomic place, update and remove over an order's canonical record,
//!   its runtime state, the per-subaccount index and the expiry index.
//! - **Orderbook levels**: atomic per-level increments with negative-value self-correction,
//!   zero and stale level cleanup, and sorted, uncrossed book reads.
//! - **Auxiliary indexes**: cancellation markers, the pending stateful update queue, the
//!   open-orders index and state filled quantums.
//!
//! Every multi-key mutation runs as one Lua script at the server, loaded once at startup into
//! a [`ScriptRegistry`](crate::redis::scripts::ScriptRegistry) whose hashes are verified before use.
//!
//! # Feature flags
//!
//! - `redis-tests`: Enables the integration tests which require a live Redis server.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod redis;
