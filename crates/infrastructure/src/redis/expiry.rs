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

//! Range queries over the short-term order expiry index.

use ahash::AHashMap;
use redis::Cmd;
use uuid::Uuid;

use super::{
    error::CacheError,
    orders::RedisOrdersCache,
    transport::Idempotency,
};

/// Formats a score bound for a range query, `(` marking an exclusive bound.
pub(crate) fn score_bound<T: std::fmt::Display>(value: T, inclusive: bool) -> String {
    if inclusive {
        value.to_string()
    } else {
        format!("({value}")
    }
}

/// Converts a sorted set score to an integral value, rejecting fractional or out of range scores.
pub(crate) fn integral_score<T: TryFrom<i64>>(score: f64) -> Option<T> {
    if !score.is_finite() || score.fract() != 0.0 {
        return None;
    }
    // Scores written by this crate are integers within the exact range of an f64
    #[allow(clippy::cast_possible_truncation)]
    T::try_from(score as i64).ok()
}

impl RedisOrdersCache {
    /// Returns the orders whose expiry is before `threshold`, or at it when `inclusive`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn orders_expiring_by(
        &self,
        threshold: u32,
        inclusive: bool,
    ) -> Result<AHashMap<Uuid, u32>, CacheError> {
        let mut cmd = redis::cmd("ZRANGEBYSCORE");
        cmd.arg(self.keys.order_expiry())
            .arg("-inf")
            .arg(score_bound(threshold, inclusive))
            .arg("WITHSCORES");

        let entries: Vec<(String, f64)> = self
            .transport
            .query("get_orders_expiring_by", &cmd, Idempotency::Idempotent)
            .await?;

        Ok(entries
            .into_iter()
            .filter_map(|(member, score)| {
                match (Uuid::parse_str(&member), integral_score::<u32>(score)) {
                    (Ok(uuid), Some(expiry)) => Some((uuid, expiry)),
                    _ => {
                        tracing::error!("Invalid expiry index entry '{member}' score {score}");
                        None
                    }
                }
            })
            .collect())
    }

    /// Returns the UUIDs of the orders whose expiry is before `threshold`, or at it when
    /// `inclusive`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn order_ids_expiring_by(
        &self,
        threshold: u32,
        inclusive: bool,
    ) -> Result<Vec<Uuid>, CacheError> {
        let cmd = Cmd::zrangebyscore(
            self.keys.order_expiry(),
            "-inf",
            score_bound(threshold, inclusive),
        );

        let members: Vec<String> = self
            .transport
            .query("get_order_ids_expiring_by", &cmd, Idempotency::Idempotent)
            .await?;

        Ok(members
            .into_iter()
            .filter_map(|member| match Uuid::parse_str(&member) {
                Ok(uuid) => Some(uuid),
                Err(e) => {
                    tracing::error!("Invalid expiry index entry '{member}': {e}");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1150, true, "1150")]
    #[case(1150, false, "(1150")]
    fn test_score_bound(#[case] value: u32, #[case] inclusive: bool, #[case] expected: &str) {
        assert_eq!(score_bound(value, inclusive), expected);
    }

    #[rstest]
    #[case(1150.0, Some(1150))]
    #[case(0.0, Some(0))]
    #[case(1150.5, None)]
    #[case(-1.0, None)]
    #[case(f64::NAN, None)]
    #[case(1e12, None)]
    fn test_integral_score_u32(#[case] score: f64, #[case] expected: Option<u32>) {
        assert_eq!(integral_score::<u32>(score), expected);
    }

    #[rstest]
    fn test_integral_score_millis() {
        assert_eq!(
            integral_score::<i64>(1_700_000_000_123.0),
            Some(1_700_000_000_123)
        );
    }
}
