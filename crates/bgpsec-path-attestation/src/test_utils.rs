//! Test utilities for path attestation.
//!
//! Fast stand-ins for the outbound ports so that chain logic can be tested
//! without Falcon key generation. Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```ignore
//! use bgpsec_path_attestation::test_utils::{mock_chain, TEST_NOW};
//! use bgpsec_path_attestation::test_utils::MockScheme;
//! use bgpsec_path_attestation::{PathAttestationVerifier, VerifierConfig};
//! use std::sync::Arc;
//!
//! let (chain, keys) = mock_chain("10.0.0.0/8".parse().unwrap(), &[65001, 65002]);
//! let verifier = PathAttestationVerifier::new(Arc::new(MockScheme::new()), VerifierConfig::default());
//! assert!(verifier.verify_with_snapshot(&chain, &keys, TEST_NOW).is_valid());
//! ```

use crate::domain::builder::PathAttestationBuilder;
use crate::domain::entities::{AttestationChain, KeyRecord, LocalSigner, Timestamp, ValidityWindow};
use crate::domain::errors::{KeyStoreError, SigningError};
use crate::domain::key_snapshot::KeySnapshot;
use crate::ports::outbound::{KeyStore, SignatureScheme, TimeSource};
use shared_crypto::{sha256, sha256_many, subject_key_id};
use shared_types::{AlgorithmSuite, AsNumber, KeyId, Prefix};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Timestamp used by fixtures (2023-11-14).
pub const TEST_NOW: Timestamp = 1_700_000_000;

const MOCK_DOMAIN: &[u8] = b"mock-signature";

// =============================================================================
// Signature scheme
// =============================================================================

/// Keyed-hash signature stand-in.
///
/// The "public key" is the secret itself, so this offers no security; it
/// only has the shape of a signature scheme.
#[derive(Debug, Clone)]
pub struct MockScheme {
    suite: AlgorithmSuite,
}

impl MockScheme {
    /// A mock that claims the Falcon-512 suite.
    pub fn new() -> Self {
        Self {
            suite: AlgorithmSuite::Falcon512,
        }
    }

    pub fn with_suite(suite: AlgorithmSuite) -> Self {
        Self { suite }
    }
}

impl Default for MockScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureScheme for MockScheme {
    type SigningKey = MockKey;

    fn suite(&self) -> AlgorithmSuite {
        self.suite
    }

    fn sign(&self, key: &MockKey, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        if !key.usable {
            return Err(SigningError::KeyUnavailable("mock key disabled".to_string()));
        }
        Ok(sha256_many(&[MOCK_DOMAIN, &key.secret, message]).to_vec())
    }

    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        sha256_many(&[MOCK_DOMAIN, public_key, message])[..] == *signature
    }
}

/// Deterministic key for [`MockScheme`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockKey {
    secret: [u8; 32],
    usable: bool,
}

impl MockKey {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            secret: sha256(&seed.to_be_bytes()),
            usable: true,
        }
    }

    /// A key whose signing attempts fail.
    pub fn unusable(mut self) -> Self {
        self.usable = false;
        self
    }

    pub fn public_key(&self) -> Vec<u8> {
        self.secret.to_vec()
    }

    pub fn key_id(&self) -> KeyId {
        KeyId(subject_key_id(&self.secret))
    }

    /// Provisioning record for this key under `asn`.
    pub fn record(&self, asn: AsNumber, validity: ValidityWindow) -> KeyRecord {
        KeyRecord::new(asn, self.key_id(), self.public_key(), validity)
    }

    /// Signing identity for `asn`.
    pub fn signer(&self, asn: AsNumber) -> LocalSigner<MockKey> {
        LocalSigner::new(asn, self.key_id(), self.clone())
    }
}

// =============================================================================
// Time
// =============================================================================

/// A time source that returns a fixed timestamp.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    timestamp: Timestamp,
}

impl FixedTimeSource {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

// =============================================================================
// Key store
// =============================================================================

/// Key store over a snapshot that can be told to misbehave.
#[derive(Debug, Default)]
pub struct FlakyKeyStore {
    snapshot: KeySnapshot,
    failing: HashSet<AsNumber>,
    delay: Option<Duration>,
    lookups: AtomicUsize,
}

impl FlakyKeyStore {
    pub fn new(snapshot: KeySnapshot) -> Self {
        Self {
            snapshot,
            ..Default::default()
        }
    }

    /// Lookups for `asn` fail with `Unavailable`.
    pub fn failing_for(mut self, asn: AsNumber) -> Self {
        self.failing.insert(asn);
        self
    }

    /// Every lookup sleeps for `delay` first.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of lookups started.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl KeyStore for FlakyKeyStore {
    async fn lookup(&self, asn: AsNumber, key_id: KeyId) -> Result<KeyRecord, KeyStoreError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&asn) {
            return Err(KeyStoreError::Unavailable(format!("injected failure for {asn}")));
        }
        self.snapshot.lookup(asn, key_id)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Build a mock-signed chain through `asns` (origin first) and a snapshot
/// holding every signer's key. Each AS's key is seeded by its number.
pub fn mock_chain(prefix: Prefix, asns: &[u32]) -> (AttestationChain, KeySnapshot) {
    let builder = PathAttestationBuilder::new(Arc::new(MockScheme::new()));
    let mut chain = AttestationChain::unsigned(prefix);
    let mut snapshot = KeySnapshot::new();

    for asn in asns {
        let key = MockKey::from_seed(u64::from(*asn));
        snapshot.insert(key.record(AsNumber(*asn), ValidityWindow::unbounded()));
        chain = builder
            .extend(&chain, &key.signer(AsNumber(*asn)))
            .expect("mock chain fixture");
    }

    (chain, snapshot)
}
