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

//! Errors raised by model validation, before any store call is made.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("Invalid order: missing order")]
    MissingOrder,
    #[error("Invalid order: missing order id")]
    MissingOrderId,
    #[error("Invalid order id: missing subaccount id")]
    MissingSubaccountId,
    #[error("Invalid total filled quantums {0}: must be non-negative")]
    NegativeTotalFilled(i128),
    #[error("Invalid total filled quantums {0}: exceeds the maximum quantums value")]
    TotalFilledOverflow(i128),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidOptionsError {
    #[error("Invalid options: `uncross_book` requires `sort_sides`")]
    UncrossWithoutSort,
    #[error("Invalid options: `limit_per_side` requires `sort_sides`")]
    LimitWithoutSort,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeStateParseError {
    #[error("Invalid order runtime state '{0}': expected 3 '_' delimited fields")]
    FieldCount(String),
    #[error("Invalid order runtime state '{value}': bad {field}")]
    Field { value: String, field: &'static str },
}
