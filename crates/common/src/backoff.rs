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

//! Exponential backoff with jitter for transport retries.
//!
//! The delay grows by a constant factor on each call up to a configured maximum, with up to
//! `jitter_ms` of random jitter added so that many callers retrying against the same store do
//! not retry in lockstep.

use std::time::Duration;

use rand::RngExt;

#[derive(Clone, Debug)]
pub struct ExponentialBackoff {
    /// The maximum delay to cap the backoff.
    delay_max: Duration,
    /// The current backoff delay.
    delay_current: Duration,
    /// The factor to multiply the delay on each iteration.
    factor: f64,
    /// The maximum random jitter to add (in milliseconds).
    jitter_ms: u64,
}

impl ExponentialBackoff {
    /// Creates a new [`ExponentialBackoff`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `factor` is not finite or is less than 1.0, or if the initial delay
    /// exceeds the maximum delay.
    pub fn new(
        delay_initial: Duration,
        delay_max: Duration,
        factor: f64,
        jitter_ms: u64,
    ) -> anyhow::Result<Self> {
        if !factor.is_finite() || factor < 1.0 {
            anyhow::bail!("Invalid backoff factor {factor}, must be finite and >= 1.0");
        }
        if delay_initial > delay_max {
            anyhow::bail!(
                "Invalid backoff delays, initial {delay_initial:?} exceeds max {delay_max:?}"
            );
        }

        Ok(Self {
            delay_max,
            delay_current: delay_initial,
            factor,
            jitter_ms,
        })
    }

    /// Return the next backoff delay with jitter and update the internal state.
    pub fn next_duration(&mut self) -> Duration {
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=self.jitter_ms)
        };
        let delay_with_jitter = self.delay_current + Duration::from_millis(jitter);

        let max_nanos = self.delay_max.as_nanos() as u64;
        let next_nanos = (self.delay_current.as_nanos() as f64 * self.factor) as u64;
        self.delay_current = Duration::from_nanos(next_nanos.min(max_nanos));

        delay_with_jitter
    }
}
