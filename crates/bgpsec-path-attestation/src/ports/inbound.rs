//! # Inbound Ports (Driving Ports / API)
//!
//! The API a BGP speaker uses to sign and check routes.

use crate::domain::entities::{AttestationChain, LocalSigner, ValidationResult};
use crate::domain::errors::AttestationError;
use crate::domain::key_snapshot::KeySnapshot;
use shared_types::Prefix;

/// Primary path attestation API.
///
/// Implementations must be thread-safe (`Send + Sync`); one instance
/// serves every session of a speaker.
#[async_trait::async_trait]
pub trait PathAttestationApi: Send + Sync {
    /// Private key handle accepted by `originate` and `forward`.
    type SigningKey: Send + Sync;

    // =========================================================================
    // Signing
    // =========================================================================

    /// Sign a prefix originated by the local AS.
    fn originate(
        &self,
        prefix: Prefix,
        signer: &LocalSigner<Self::SigningKey>,
    ) -> Result<AttestationChain, AttestationError>;

    /// Append the local AS to a received chain and sign.
    ///
    /// The received chain is left unchanged. Callers should only forward
    /// chains they verified as VALID.
    fn forward(
        &self,
        chain: &AttestationChain,
        signer: &LocalSigner<Self::SigningKey>,
    ) -> Result<AttestationChain, AttestationError>;

    // =========================================================================
    // Verification
    // =========================================================================

    /// Verify one chain against the live key store.
    async fn verify(&self, chain: &AttestationChain) -> ValidationResult;

    /// Verify many chains concurrently; results are index-aligned.
    async fn verify_batch(&self, chains: &[AttestationChain]) -> Vec<ValidationResult>;

    /// Verify many chains in parallel against a fixed key snapshot.
    ///
    /// # Performance
    /// CPU-parallel across chains; each chain is checked sequentially.
    fn verify_batch_with_snapshot(
        &self,
        snapshot: &KeySnapshot,
        chains: &[AttestationChain],
    ) -> Vec<ValidationResult>;
}
