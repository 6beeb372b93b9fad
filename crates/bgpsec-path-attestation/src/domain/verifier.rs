//! # Path Attestation Verifier
//!
//! Checks every hop of a chain and returns a [`ValidationResult`].
//!
//! ## State machine
//!
//! ```text
//! Start ──structure/loop check──> PerHop(0) ──> PerHop(1) ──> ... ──> Accept
//!   │                                │
//!   └──────────────> Reject <────────┘   (first failure wins)
//! ```
//!
//! Within `PerHop(i)` the checks run in a fixed order: suite, key lookup,
//! key validity, canonical encoding, signature. Hops are checked origin
//! first and the first failure ends verification.
//!
//! Two drivers share the per-hop logic: [`verify`](PathAttestationVerifier::verify)
//! resolves keys through an async [`KeyStore`] with a timeout, while
//! [`verify_with_snapshot`](PathAttestationVerifier::verify_with_snapshot)
//! reads a [`KeySnapshot`] synchronously so it can run on a rayon pool.

use super::config::VerifierConfig;
use super::encoding::CanonicalEncoder;
use super::entities::{AttestationChain, KeyRecord, ReasonCode, Timestamp, ValidationResult};
use super::errors::KeyStoreError;
use super::key_snapshot::KeySnapshot;
use crate::ports::outbound::{KeyStore, SignatureScheme};
use shared_types::SecurePathSegment;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug)]
enum VerifierState {
    PerHop(usize),
    Accept,
    Reject(ValidationResult),
}

pub struct PathAttestationVerifier<S: SignatureScheme> {
    scheme: Arc<S>,
    config: VerifierConfig,
}

impl<S: SignatureScheme> PathAttestationVerifier<S> {
    /// Create a verifier. `config` is assumed valid; see [`VerifierConfig::validate`].
    pub fn new(scheme: Arc<S>, config: VerifierConfig) -> Self {
        Self { scheme, config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify `chain` at `now`, resolving keys through `key_store`.
    ///
    /// Each lookup is bounded by `key_lookup_timeout`; a store that fails
    /// or times out makes the result INDETERMINATE. Must run inside a tokio
    /// runtime with timers enabled.
    pub async fn verify<K: KeyStore + ?Sized>(
        &self,
        chain: &AttestationChain,
        key_store: &K,
        now: Timestamp,
    ) -> ValidationResult {
        let mut state = self.start(chain);
        loop {
            state = match state {
                VerifierState::PerHop(hop) => {
                    if let Some(rejected) = self.check_suite(chain, hop) {
                        rejected
                    } else {
                        let lookup = self.lookup_with_timeout(chain, hop, key_store).await;
                        self.finish_hop(chain, hop, lookup, |record| key_store.is_valid_at(record, now))
                    }
                }
                VerifierState::Accept => return accept(chain),
                VerifierState::Reject(result) => return result,
            };
        }
    }

    /// Verify `chain` at `now` against a fixed key snapshot.
    pub fn verify_with_snapshot(
        &self,
        chain: &AttestationChain,
        snapshot: &KeySnapshot,
        now: Timestamp,
    ) -> ValidationResult {
        let mut state = self.start(chain);
        loop {
            state = match state {
                VerifierState::PerHop(hop) => {
                    if let Some(rejected) = self.check_suite(chain, hop) {
                        rejected
                    } else {
                        let segment = &chain.segments()[hop];
                        let entry = &chain.entries()[hop];
                        let lookup = snapshot.lookup(segment.asn, entry.key_id);
                        self.finish_hop(chain, hop, lookup, |record| record.is_valid_at(now))
                    }
                }
                VerifierState::Accept => return accept(chain),
                VerifierState::Reject(result) => return result,
            };
        }
    }

    /// Whole-chain checks before any hop is examined.
    fn start(&self, chain: &AttestationChain) -> VerifierState {
        let segments = chain.segments().len();
        let entries = chain.entries().len();

        if segments == 0 || segments != entries || segments > self.config.max_hops {
            debug!(
                prefix = %chain.prefix(),
                segments,
                entries,
                max_hops = self.config.max_hops,
                "chain structurally malformed"
            );
            return reject(ReasonCode::Malformed, None);
        }

        if self.config.detect_path_loops {
            if let Some(hop) = find_path_loop(chain.segments()) {
                debug!(hop, asn = %chain.segments()[hop].asn, "AS path loop");
                return reject(ReasonCode::PathLoop, Some(hop));
            }
        }

        VerifierState::PerHop(0)
    }

    fn check_suite(&self, chain: &AttestationChain, hop: usize) -> Option<VerifierState> {
        let suite = chain.entries()[hop].suite;
        if suite != self.scheme.suite() {
            debug!(hop, suite = %suite, "unsupported algorithm suite");
            return Some(reject(ReasonCode::UnsupportedAlgo, Some(hop)));
        }
        None
    }

    async fn lookup_with_timeout<K: KeyStore + ?Sized>(
        &self,
        chain: &AttestationChain,
        hop: usize,
        key_store: &K,
    ) -> Result<KeyRecord, KeyStoreError> {
        let asn = chain.segments()[hop].asn;
        let key_id = chain.entries()[hop].key_id;
        let timeout = self.config.key_lookup_timeout;

        match tokio::time::timeout(timeout, key_store.lookup(asn, key_id)).await {
            Ok(result) => result,
            Err(_) => Err(KeyStoreError::Timeout(timeout)),
        }
    }

    /// Key, validity, encoding and signature checks for one hop.
    fn finish_hop(
        &self,
        chain: &AttestationChain,
        hop: usize,
        lookup: Result<KeyRecord, KeyStoreError>,
        is_valid: impl FnOnce(&KeyRecord) -> bool,
    ) -> VerifierState {
        let segment = &chain.segments()[hop];
        let entry = &chain.entries()[hop];

        let record = match lookup {
            Ok(record) if record.asn == segment.asn && record.key_id == entry.key_id => record,
            Ok(record) => {
                warn!(
                    hop,
                    asn = %segment.asn,
                    returned_asn = %record.asn,
                    "key store returned a record for a different key"
                );
                return reject(ReasonCode::UnknownKey, Some(hop));
            }
            Err(KeyStoreError::NotFound { .. }) => {
                debug!(hop, asn = %segment.asn, key_id = %entry.key_id, "unknown key");
                return reject(ReasonCode::UnknownKey, Some(hop));
            }
            Err(err) => {
                warn!(hop, asn = %segment.asn, error = %err, "key lookup failed");
                return VerifierState::Reject(ValidationResult::indeterminate(hop));
            }
        };

        if !is_valid(&record) {
            debug!(hop, asn = %segment.asn, key_id = %entry.key_id, "key revoked or expired");
            return reject(ReasonCode::KeyInvalid, Some(hop));
        }

        let data = match CanonicalEncoder::encode_hop(chain, hop, entry.suite) {
            Ok(data) => data,
            Err(err) => {
                debug!(hop, error = %err, "hop cannot be encoded");
                return reject(ReasonCode::Malformed, Some(hop));
            }
        };

        if !self.scheme.verify(&record.public_key, &data, &entry.signature) {
            debug!(hop, asn = %segment.asn, "bad signature");
            return reject(ReasonCode::BadSignature, Some(hop));
        }

        debug!(hop, asn = %segment.asn, "hop verified");
        if hop + 1 == chain.len() {
            VerifierState::Accept
        } else {
            VerifierState::PerHop(hop + 1)
        }
    }
}

fn reject(reason: ReasonCode, hop: Option<usize>) -> VerifierState {
    VerifierState::Reject(ValidationResult::invalid(reason, hop))
}

fn accept(chain: &AttestationChain) -> ValidationResult {
    ValidationResult::valid(chain.as_path())
}

/// Index of the first AS that reappears after a different AS.
///
/// Adjacent repeats are prepending and collapse into one run.
pub fn find_path_loop(segments: &[SecurePathSegment]) -> Option<usize> {
    let mut seen = HashSet::with_capacity(segments.len());
    let mut previous = None;

    for (index, segment) in segments.iter().enumerate() {
        if previous == Some(segment.asn) {
            continue;
        }
        if !seen.insert(segment.asn) {
            return Some(index);
        }
        previous = Some(segment.asn);
    }
    None
}
