//! # Path Attestation Service
//!
//! Application service layer that implements the `PathAttestationApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`PathAttestationApi`)
//! - Uses the outbound ports (`KeyStore`, `SignatureScheme`, `TimeSource`)
//! - Delegates chain logic to the domain builder and verifier
//! - Records metrics and emits one log event per verification

use crate::adapters::time::SystemTimeSource;
use crate::domain::builder::PathAttestationBuilder;
use crate::domain::config::VerifierConfig;
use crate::domain::entities::{AttestationChain, LocalSigner, Outcome, ReasonCode, ValidationResult};
use crate::domain::errors::{AttestationError, ConfigError};
use crate::domain::key_snapshot::KeySnapshot;
use crate::domain::verifier::PathAttestationVerifier;
use crate::ports::inbound::PathAttestationApi;
use crate::ports::outbound::{KeyStore, SignatureScheme, TimeSource};
use futures::future::join_all;
use path_telemetry::{
    metric_inc, time_histogram, BUILD_FAILURES, CHAINS_BUILT, CHAIN_VERIFICATIONS, HOPS_VERIFIED,
    KEY_LOOKUP_FAILURES, SIGNING_DURATION, VERIFICATION_DURATION,
};
use rayon::prelude::*;
use shared_types::Prefix;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Path Attestation Service.
///
/// One instance serves every BGP session of a speaker. The key store is
/// shared; the builder and verifier hold the same signature scheme.
pub struct AttestationService<K, S, T = SystemTimeSource>
where
    K: KeyStore,
    S: SignatureScheme,
    T: TimeSource,
{
    builder: PathAttestationBuilder<S>,
    verifier: PathAttestationVerifier<S>,
    key_store: Arc<K>,
    time: T,
}

impl<K, S> AttestationService<K, S, SystemTimeSource>
where
    K: KeyStore,
    S: SignatureScheme,
{
    /// Create a service using the system clock.
    ///
    /// # Errors
    /// Returns `ConfigError` when `config` fails validation.
    pub fn new(key_store: Arc<K>, scheme: Arc<S>, config: VerifierConfig) -> Result<Self, ConfigError> {
        Self::with_time_source(key_store, scheme, config, SystemTimeSource)
    }
}

impl<K, S, T> AttestationService<K, S, T>
where
    K: KeyStore,
    S: SignatureScheme,
    T: TimeSource,
{
    /// Create a service with an explicit clock.
    pub fn with_time_source(
        key_store: Arc<K>,
        scheme: Arc<S>,
        config: VerifierConfig,
        time: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            suite = %scheme.suite(),
            max_hops = config.max_hops,
            detect_path_loops = config.detect_path_loops,
            "path attestation service ready"
        );
        Ok(Self {
            builder: PathAttestationBuilder::new(scheme.clone()).with_max_hops(config.max_hops),
            verifier: PathAttestationVerifier::new(scheme, config),
            key_store,
            time,
        })
    }

    pub fn key_store(&self) -> &Arc<K> {
        &self.key_store
    }

    pub fn config(&self) -> &VerifierConfig {
        self.verifier.config()
    }

    fn sign_hop(
        &self,
        chain: &AttestationChain,
        signer: &LocalSigner<S::SigningKey>,
    ) -> Result<AttestationChain, AttestationError> {
        let result = {
            let _timer = time_histogram!(SIGNING_DURATION);
            self.builder.extend(chain, signer)
        };
        match &result {
            Ok(_) => metric_inc!(CHAINS_BUILT),
            Err(err) => {
                metric_inc!(BUILD_FAILURES, &[err.kind()]);
                warn!(prefix = %chain.prefix(), asn = %signer.asn, error = %err, "failed to sign hop");
            }
        }
        result
    }

    fn verify_at_snapshot(&self, snapshot: &KeySnapshot, chain: &AttestationChain) -> ValidationResult {
        let _timer = time_histogram!(VERIFICATION_DURATION);
        let result = self.verifier.verify_with_snapshot(chain, snapshot, self.time.now());
        record_outcome(chain, &result);
        result
    }
}

#[async_trait::async_trait]
impl<K, S, T> PathAttestationApi for AttestationService<K, S, T>
where
    K: KeyStore + 'static,
    S: SignatureScheme + 'static,
    T: TimeSource + 'static,
{
    type SigningKey = S::SigningKey;

    fn originate(
        &self,
        prefix: Prefix,
        signer: &LocalSigner<S::SigningKey>,
    ) -> Result<AttestationChain, AttestationError> {
        let chain = self.sign_hop(&AttestationChain::unsigned(prefix), signer)?;
        info!(prefix = %prefix, asn = %signer.asn, "prefix originated");
        Ok(chain)
    }

    fn forward(
        &self,
        chain: &AttestationChain,
        signer: &LocalSigner<S::SigningKey>,
    ) -> Result<AttestationChain, AttestationError> {
        let forwarded = self.sign_hop(chain, signer)?;
        debug!(prefix = %chain.prefix(), asn = %signer.asn, hops = forwarded.len(), "route forwarded");
        Ok(forwarded)
    }

    async fn verify(&self, chain: &AttestationChain) -> ValidationResult {
        let _timer = time_histogram!(VERIFICATION_DURATION);
        let now = self.time.now();
        let result = self.verifier.verify(chain, self.key_store.as_ref(), now).await;
        record_outcome(chain, &result);
        result
    }

    async fn verify_batch(&self, chains: &[AttestationChain]) -> Vec<ValidationResult> {
        let batch_id = Uuid::new_v4();
        let span = info_span!("verify_batch", %batch_id, chains = chains.len());

        async {
            let results = join_all(chains.iter().map(|chain| self.verify(chain))).await;
            let valid = results.iter().filter(|r| r.is_valid()).count();
            info!(valid, rejected = results.len() - valid, "batch verified");
            results
        }
        .instrument(span)
        .await
    }

    fn verify_batch_with_snapshot(
        &self,
        snapshot: &KeySnapshot,
        chains: &[AttestationChain],
    ) -> Vec<ValidationResult> {
        let batch_id = Uuid::new_v4();
        let _span = info_span!("verify_batch_with_snapshot", %batch_id, chains = chains.len()).entered();

        let results: Vec<ValidationResult> = chains
            .par_iter()
            .map(|chain| self.verify_at_snapshot(snapshot, chain))
            .collect();

        let valid = results.iter().filter(|r| r.is_valid()).count();
        info!(valid, rejected = results.len() - valid, "batch verified");
        results
    }
}

/// Hop signatures that were actually checked for `result`.
fn signatures_checked(chain: &AttestationChain, result: &ValidationResult) -> usize {
    match (result.outcome(), result.reason(), result.failing_hop()) {
        (Outcome::Valid, _, _) => chain.len(),
        (_, Some(ReasonCode::PathLoop), _) | (_, _, None) => 0,
        (_, Some(ReasonCode::BadSignature), Some(hop)) => hop + 1,
        (_, _, Some(hop)) => hop,
    }
}

fn record_outcome(chain: &AttestationChain, result: &ValidationResult) {
    let outcome = result.outcome().as_str();
    let reason = result.reason().map_or("none", |r| r.as_str());

    metric_inc!(CHAIN_VERIFICATIONS, &[outcome, reason]);
    HOPS_VERIFIED.inc_by(signatures_checked(chain, result) as f64);

    match result.reason() {
        Some(ReasonCode::UnknownKey) => metric_inc!(KEY_LOOKUP_FAILURES, &["not_found"]),
        Some(ReasonCode::KeyStoreUnavailable) => metric_inc!(KEY_LOOKUP_FAILURES, &["unavailable"]),
        _ => {}
    }

    match result.outcome() {
        Outcome::Valid => debug!(
            prefix = %chain.prefix(),
            hops = chain.len(),
            "chain valid"
        ),
        Outcome::Invalid => warn!(
            prefix = %chain.prefix(),
            hop = ?result.failing_hop(),
            reason,
            "chain invalid"
        ),
        Outcome::Indeterminate => warn!(
            prefix = %chain.prefix(),
            hop = ?result.failing_hop(),
            "chain indeterminate: key store unavailable"
        ),
    }
}
