//! # Domain Layer
//!
//! Chain building and verification logic. No I/O: key lookups and
//! signatures reach the domain only through the outbound ports.

pub mod builder;
pub mod config;
pub mod encoding;
pub mod entities;
pub mod errors;
pub mod key_snapshot;
pub mod verifier;
