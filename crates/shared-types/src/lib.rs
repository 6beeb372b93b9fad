//! # Shared Types Crate
//!
//! Wire-level value types for BGPsec path attestation, shared by the
//! crypto, attestation, and test crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: AS numbers, prefixes, Secure_Path segments,
//!   and Signature_Block entries are defined once, here.
//! - **Fixed-width, big-endian**: every integer on the wire and in signed
//!   material has one byte representation.
//! - **Structure vs. meaning**: the codec rejects structurally broken input;
//!   semantic validation is the verifier's job.

pub mod entities;
pub mod errors;
pub mod prefix;
pub mod wire;

pub use entities::*;
pub use errors::*;
pub use prefix::{decode_nlri, encode_nlri, Afi, Prefix};
pub use wire::{SecurePathAttribute, SizeReport};
