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

//! Logging setup and shared log markers for the order cache.

use std::env;

use tracing_subscriber::EnvFilter;

/// Field value attached to diagnostics which signal a violated upstream ordering assumption.
pub const SEVERITY_CRITICAL: &str = "critical";

/// Initialize tracing.
///
/// Tracing can be configured to filter modules and write up to a specific level by passing
/// a configuration using the `RUST_LOG` environment variable. If `RUST_LOG` is not set then
/// no subscriber is installed.
///
/// Should only be called once during an application's run, ideally at the beginning.
///
/// # Errors
///
/// Returns an error if tracing subscriber fails to initialize.
pub fn init_tracing() -> anyhow::Result<()> {
    if let Ok(v) = env::var("RUST_LOG") {
        let env_filter = EnvFilter::new(v.clone());

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))?;

        log::info!("Initialized tracing logs with RUST_LOG={v}");
    }
    Ok(())
}
