//! # BGPsec-PQ Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | `bgpsec/encode_hop` | Canonical bytes for the last hop |
//! | `bgpsec/sign_hop` | Forwarding onto 1, 15 and 80 hop chains |
//! | `bgpsec/verify_chain` | Full verification at 1, 15 and 80 hops |
//! | `bgpsec/verify_batch` | Parallel batch verification of 15 hop routes |

use bgpsec_tests::benchmarks::attestation::register_benchmarks;
use criterion::{criterion_group, criterion_main};

criterion_group!(benches, register_benchmarks);
criterion_main!(benches);
