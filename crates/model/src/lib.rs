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

//! Domain model for the indexer order and orderbook cache.
//!
//! The `indexer-model` crate holds the value types the cache stores and returns, with no
//! knowledge of the backing store:
//!
//! - Order identifiers and their deterministic UUID derivation.
//! - The indexer order, its cached representation and its packed runtime state.
//! - Aggregated price levels with sorting, limiting, uncrossing and mid-price logic.
//! - Validation errors raised before any store call is made.
//!
//! # Feature flags
//!
//! - `stubs`: Enables type stubs and `rstest` fixtures for use in tests.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod enums;
pub mod error;
pub mod identifiers;
pub mod orderbook;
pub mod orders;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;
