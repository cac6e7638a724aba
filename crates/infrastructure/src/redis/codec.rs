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

//! Payload encoding for values stored in the cache.

use indexer_common::enums::SerializationEncoding;
use serde::{Serialize, de::DeserializeOwned};

use super::error::CacheError;

/// Serializes `payload` with the given `encoding`.
///
/// # Errors
///
/// Returns [`CacheError::Encoding`] if serialization fails.
pub fn serialize_payload<T: Serialize>(
    encoding: SerializationEncoding,
    payload: &T,
) -> Result<Vec<u8>, CacheError> {
    match encoding {
        SerializationEncoding::MsgPack => rmp_serde::to_vec_named(payload).map_err(|e| {
            CacheError::Encoding(format!(
                "Failed to serialize msgpack `payload` for {}: {e}",
                std::any::type_name::<T>()
            ))
        }),
        SerializationEncoding::Json => serde_json::to_vec(payload).map_err(|e| {
            CacheError::Encoding(format!(
                "Failed to serialize json `payload` for {}: {e}",
                std::any::type_name::<T>()
            ))
        }),
    }
}

/// Deserializes `payload` with the given `encoding`.
///
/// # Errors
///
/// Returns [`CacheError::Encoding`] if deserialization fails.
pub fn deserialize_payload<T: DeserializeOwned>(
    encoding: SerializationEncoding,
    payload: &[u8],
) -> Result<T, CacheError> {
    match encoding {
        SerializationEncoding::MsgPack => rmp_serde::from_slice(payload).map_err(|e| {
            CacheError::Encoding(format!(
                "Failed to deserialize msgpack `payload` for {}: {e}",
                std::any::type_name::<T>()
            ))
        }),
        SerializationEncoding::Json => serde_json::from_slice(payload).map_err(|e| {
            CacheError::Encoding(format!(
                "Failed to deserialize json `payload` for {}: {e}",
                std::any::type_name::<T>()
            ))
        }),
    }
}
