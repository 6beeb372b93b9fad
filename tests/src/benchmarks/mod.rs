//! # BGPsec-PQ Benchmarks
//!
//! Signing and verification cost as path length grows.

pub mod attestation;
