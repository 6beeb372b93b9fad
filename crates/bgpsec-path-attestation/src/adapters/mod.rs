//! # Adapters Module
//!
//! Infrastructure adapters implementing the outbound ports.

pub mod falcon;
pub mod key_store;
pub mod time;

pub use falcon::{falcon_identity, falcon_key_id, Falcon512Scheme, FalconSigningKey};
pub use key_store::SnapshotKeyStore;
pub use time::SystemTimeSource;
