//! Runtime-configurable parameters for fwnet.
//!
//! `FwConfig` holds tuning values with sensible defaults, overridable via
//! environment variables (prefixed `FWNET_`). `RunConfig` describes a single
//! job and is validated before any worker is contacted.

use crate::error::{FwError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Tuning parameters for channels and cluster formation.
#[derive(Debug, Clone)]
pub struct FwConfig {
    /// Timeout for individual channel send/recv operations.
    pub channel_timeout: Duration,

    /// Timeout for TCP workers to join and for a worker's first receive.
    pub formation_timeout: Duration,

    /// Depth of each in-process channel direction.
    pub channel_capacity: usize,
}

impl Default for FwConfig {
    fn default() -> Self {
        Self {
            channel_timeout: Duration::from_secs(30),
            formation_timeout: Duration::from_secs(60),
            channel_capacity: 1,
        }
    }
}

impl FwConfig {
    /// Load config from environment variables, falling back to defaults.
    ///
    /// Recognized variables:
    /// - `FWNET_CHANNEL_TIMEOUT_SECS`
    /// - `FWNET_FORMATION_TIMEOUT_SECS`
    /// - `FWNET_CHANNEL_CAPACITY`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("FWNET_CHANNEL_TIMEOUT_SECS") {
            if let Ok(s) = v.parse::<u64>() {
                cfg.channel_timeout = Duration::from_secs(s);
            }
        }
        if let Ok(v) = std::env::var("FWNET_FORMATION_TIMEOUT_SECS") {
            if let Ok(s) = v.parse::<u64>() {
                cfg.formation_timeout = Duration::from_secs(s);
            }
        }
        if let Ok(v) = std::env::var("FWNET_CHANNEL_CAPACITY") {
            if let Ok(n) = v.parse::<usize>() {
                if n > 0 {
                    cfg.channel_capacity = n;
                }
            }
        }

        cfg
    }

    pub fn with_channel_timeout(mut self, timeout: Duration) -> Self {
        self.channel_timeout = timeout;
        self
    }

    pub fn with_formation_timeout(mut self, timeout: Duration) -> Self {
        self.formation_timeout = timeout;
        self
    }
}

/// One distributed run: where to read, where to write, how many workers.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub workers: usize,
}

impl RunConfig {
    /// Checks that can be made without reading the matrix.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(FwError::NoWorkers);
        }
        if !self.input.is_file() {
            return Err(FwError::InputNotFound {
                path: self.input.clone(),
            });
        }
        Ok(())
    }
}
