//! # BGPsec-PQ Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Falcon-512 speakers and chains
//! ├── benchmarks/       # Sign/verify scaling by hop count
//! └── integration/      # End-to-end route scenarios
//!     ├── scenarios.rs  # originate, forward, tamper, key failures
//!     ├── scaling.rs    # 15 and 80 hop chains, attribute size limits
//!     └── service.rs    # service facade, batches, telemetry
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p bgpsec-tests
//!
//! # By category
//! cargo test -p bgpsec-tests integration::scenarios::
//!
//! # Benchmarks
//! cargo bench -p bgpsec-tests
//! ```

pub mod benchmarks;
pub mod fixtures;
pub mod integration;
