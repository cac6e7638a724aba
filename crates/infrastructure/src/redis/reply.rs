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

//! Decoding of raw script replies.

use std::str::FromStr;

use redis::Value;

use super::error::CacheError;

pub(crate) fn unexpected(operation: &'static str, value: &Value) -> CacheError {
    CacheError::UnexpectedReply {
        operation,
        reply: format!("{value:?}"),
    }
}

pub(crate) fn into_array(operation: &'static str, value: Value) -> Result<Vec<Value>, CacheError> {
    match value {
        Value::Array(values) => Ok(values),
        other => Err(unexpected(operation, &other)),
    }
}

pub(crate) fn as_int(operation: &'static str, value: &Value) -> Result<i64, CacheError> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::BulkString(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| unexpected(operation, value)),
        other => Err(unexpected(operation, other)),
    }
}

pub(crate) fn as_bool(operation: &'static str, value: &Value) -> Result<bool, CacheError> {
    as_int(operation, value).map(|n| n != 0)
}

pub(crate) fn into_bytes(operation: &'static str, value: Value) -> Result<Vec<u8>, CacheError> {
    match value {
        Value::BulkString(bytes) => Ok(bytes),
        Value::SimpleString(s) => Ok(s.into_bytes()),
        other => Err(unexpected(operation, &other)),
    }
}

pub(crate) fn into_optional_bytes(
    operation: &'static str,
    value: Value,
) -> Result<Option<Vec<u8>>, CacheError> {
    match value {
        Value::Nil => Ok(None),
        other => into_bytes(operation, other).map(Some),
    }
}

pub(crate) fn as_str<'a>(operation: &'static str, value: &'a Value) -> Result<&'a str, CacheError> {
    match value {
        Value::BulkString(bytes) => {
            std::str::from_utf8(bytes).map_err(|_| unexpected(operation, value))
        }
        Value::SimpleString(s) => Ok(s),
        other => Err(unexpected(operation, other)),
    }
}

/// Parses a string reply into `T`, such as a quantums value or a runtime state.
pub(crate) fn parse<T: FromStr>(operation: &'static str, value: &Value) -> Result<T, CacheError> {
    as_str(operation, value)?
        .parse()
        .map_err(|_| unexpected(operation, value))
}
