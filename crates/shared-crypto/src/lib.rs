//! # Shared Crypto - Post-Quantum Signature Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `falcon` | Falcon-512 | Per-hop path signatures |
//! | `hashing` | SHA-256 | Subject key identifiers |
//!
//! ## Security Properties
//!
//! - **Falcon-512**: NIST level 1 post-quantum security, compact lattice signatures
//! - **Secret keys**: held in `Zeroizing` buffers, cleared on drop
//! - **Verification**: every malformed input maps to a `CryptoError`, never a panic

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod falcon;
pub mod hashing;

// Re-exports
pub use errors::CryptoError;
pub use falcon::{sign_detached, verify_detached, FalconKeyPair, FalconPublicKey};
pub use hashing::{sha256, sha256_many, subject_key_id};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
