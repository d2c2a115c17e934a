// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use meshvol_geometry::DEFAULT_PARALLEL_THRESHOLD;

/// Log filter used when neither `RUST_LOG` nor `MESHVOL_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "warn,meshvol=info";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of worker threads for parallel processing.
    pub worker_threads: usize,
    /// Triangle count above which volume integration runs in parallel.
    pub parallel_threshold: usize,
    /// `tracing` filter directives, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; unparseable values fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            worker_threads: lookup("MESHVOL_WORKER_THREADS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or_else(num_cpus::get),
            parallel_threshold: lookup("MESHVOL_PARALLEL_THRESHOLD")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
            log_filter: lookup("MESHVOL_LOG")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
