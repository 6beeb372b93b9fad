//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies the attestation core needs from its host: router keys,
//! a signature primitive and a clock.

use crate::domain::entities::{KeyRecord, Timestamp};
use crate::domain::errors::{KeyStoreError, SigningError};
use shared_types::{AlgorithmSuite, AsNumber, KeyId};

/// Source of router public keys (RPKI cache, static table, ...).
///
/// Implementations must be safe for concurrent reads; lookups for
/// different hops may be in flight at the same time.
#[async_trait::async_trait]
pub trait KeyStore: Send + Sync {
    /// Find the key an AS published under `key_id`.
    ///
    /// # Errors
    /// * `KeyStoreError::NotFound` - nothing provisioned for the pair
    /// * `KeyStoreError::Unavailable` - the store could not answer
    async fn lookup(&self, asn: AsNumber, key_id: KeyId) -> Result<KeyRecord, KeyStoreError>;

    /// Whether `record` may be used to verify at `timestamp`.
    fn is_valid_at(&self, record: &KeyRecord, timestamp: Timestamp) -> bool {
        record.is_valid_at(timestamp)
    }
}

/// A signature algorithm suite.
///
/// Private keys stay behind `SigningKey`; the scheme never exposes them.
pub trait SignatureScheme: Send + Sync {
    /// Opaque handle to a private key.
    type SigningKey: Send + Sync;

    /// Suite identifier written into Signature_Block entries.
    fn suite(&self) -> AlgorithmSuite;

    /// Sign `message` with `key`.
    fn sign(&self, key: &Self::SigningKey, message: &[u8]) -> Result<Vec<u8>, SigningError>;

    /// Check a detached signature. Malformed inputs yield `false`.
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool;
}

/// Wall clock used to check key validity.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}
