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

//! Common machinery shared by the indexer order cache crates.
//!
//! The `indexer-common` crate provides the ambient pieces every other crate in the workspace
//! leans on:
//!
//! - Configuration types for the backing database and the cache itself.
//! - Serialization encoding selection for cached payloads.
//! - Tracing initialization driven by the `RUST_LOG` environment variable.
//! - Exponential backoff with jitter, and a retry manager which escalates log severity
//!   once a configurable attempt threshold is crossed.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod backoff;
pub mod config;
pub mod enums;
pub mod logging;
pub mod retry;
