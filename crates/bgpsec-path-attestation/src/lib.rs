//! # BGPsec Path Attestation
//!
//! Post-quantum path attestation for BGP routes. Each AS on a route appends
//! its Secure_Path segment and a Falcon-512 signature chained to the
//! previous hop's signature; receivers verify the chain hop by hop.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): canonical encoding, builder, verifier
//! - **Ports Layer** (`ports/`): key store, signature scheme, clock, public API
//! - **Adapters Layer** (`adapters/`): Falcon-512, in-memory key store, system clock
//! - **Service Layer** (`service.rs`): wires domain logic to ports, metrics and logs
//!
//! ## Guarantees
//!
//! - **Path binding**: hop `i` signs the prefix, segments `0..=i` and signature `i-1`
//! - **Fail closed**: a chain is VALID only if every hop verifies
//! - **Three-valued**: key store failures yield INDETERMINATE, never VALID or INVALID
//!
//! ## Example
//!
//! ```rust,ignore
//! let service = AttestationService::new(store, Arc::new(Falcon512Scheme::new()), VerifierConfig::default())?;
//! let chain = service.originate("10.0.0.0/8".parse()?, &signer)?;
//! assert!(service.verify(&chain).await.is_valid());
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Mock ports and fixtures.
///
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export public API
pub use adapters::{
    falcon_identity, falcon_key_id, Falcon512Scheme, FalconSigningKey, SnapshotKeyStore,
    SystemTimeSource,
};
pub use domain::builder::PathAttestationBuilder;
pub use domain::config::{VerifierConfig, DEFAULT_MAX_HOPS};
pub use domain::encoding::{CanonicalEncoder, PreviousSignature, DOMAIN_TAG};
pub use domain::entities::{
    AttestationChain, KeyRecord, LocalSigner, Outcome, ReasonCode, Timestamp, ValidationResult,
    ValidityWindow,
};
pub use domain::errors::{
    AttestationError, ChainStateError, ConfigError, EncodingError, KeyStoreError, SigningError,
};
pub use domain::key_snapshot::KeySnapshot;
pub use domain::verifier::{find_path_loop, PathAttestationVerifier};
pub use ports::inbound::PathAttestationApi;
pub use ports::outbound::{KeyStore, SignatureScheme, TimeSource};
pub use service::AttestationService;
