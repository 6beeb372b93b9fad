//! # End-to-End Scenarios
//!
//! Falcon-512 chains built and verified through the public API only.

pub mod scaling;
pub mod scenarios;
pub mod service;
