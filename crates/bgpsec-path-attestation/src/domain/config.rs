//! Verifier configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use bgpsec_path_attestation::VerifierConfig;
//!
//! let config = VerifierConfig::default()
//!     .with_path_loop_detection(true)
//!     .with_max_hops(64);
//! config.validate().expect("valid config");
//! ```

use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound on chain length.
pub const DEFAULT_MAX_HOPS: usize = 256;

/// Largest hop count the 16-bit segment count can express.
pub const MAX_ENCODABLE_HOPS: usize = u16::MAX as usize;

/// Default time allowed for a single key lookup.
pub const DEFAULT_KEY_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Path attestation verifier configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Reject paths where an AS reappears after a different AS.
    pub detect_path_loops: bool,
    /// Longer chains are MALFORMED.
    pub max_hops: usize,
    /// A lookup slower than this makes the chain INDETERMINATE.
    pub key_lookup_timeout: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            detect_path_loops: false,
            max_hops: DEFAULT_MAX_HOPS,
            key_lookup_timeout: DEFAULT_KEY_LOOKUP_TIMEOUT,
        }
    }
}

impl VerifierConfig {
    /// Short timeout and loop detection on, for tests.
    pub fn for_testing() -> Self {
        Self {
            detect_path_loops: true,
            max_hops: DEFAULT_MAX_HOPS,
            key_lookup_timeout: Duration::from_millis(100),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_hops == 0 || self.max_hops > MAX_ENCODABLE_HOPS {
            return Err(ConfigError::MaxHopsOutOfRange {
                value: self.max_hops,
                max: MAX_ENCODABLE_HOPS,
            });
        }
        if self.key_lookup_timeout.is_zero() {
            return Err(ConfigError::ZeroLookupTimeout);
        }
        Ok(())
    }

    /// Builder-style method to toggle loop detection
    pub fn with_path_loop_detection(mut self, enabled: bool) -> Self {
        self.detect_path_loops = enabled;
        self
    }

    /// Builder-style method to set the hop limit
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Builder-style method to set the per-lookup timeout
    pub fn with_key_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.key_lookup_timeout = timeout;
        self
    }
}
