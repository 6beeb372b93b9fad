//! # Path Attestation Builder
//!
//! Originates and forwards attested routes. Each call returns a new chain
//! one hop longer than its input, signed by the local AS.

use super::config::DEFAULT_MAX_HOPS;
use super::encoding::{CanonicalEncoder, PreviousSignature};
use super::entities::{AttestationChain, LocalSigner};
use super::errors::{AttestationError, ChainStateError, EncodingError};
use crate::ports::outbound::SignatureScheme;
use shared_types::{Prefix, SignatureBlockEntry};
use std::sync::Arc;
use tracing::debug;

pub struct PathAttestationBuilder<S: SignatureScheme> {
    scheme: Arc<S>,
    max_hops: usize,
}

impl<S: SignatureScheme> PathAttestationBuilder<S> {
    pub fn new(scheme: Arc<S>) -> Self {
        Self {
            scheme,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// Refuse to extend chains that already have `max_hops` hops.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// Sign a locally originated prefix. The result has exactly one hop.
    pub fn originate(
        &self,
        prefix: Prefix,
        signer: &LocalSigner<S::SigningKey>,
    ) -> Result<AttestationChain, AttestationError> {
        prefix.validate().map_err(EncodingError::from)?;
        self.extend(&AttestationChain::unsigned(prefix), signer)
    }

    /// Append the local AS to a received chain and sign it.
    pub fn forward(
        &self,
        chain: &AttestationChain,
        signer: &LocalSigner<S::SigningKey>,
    ) -> Result<AttestationChain, AttestationError> {
        self.extend(chain, signer)
    }

    /// Append `signer`'s segment and a signature chained to the last entry.
    pub fn extend(
        &self,
        chain: &AttestationChain,
        signer: &LocalSigner<S::SigningKey>,
    ) -> Result<AttestationChain, AttestationError> {
        if !chain.is_aligned() {
            return Err(ChainStateError::LengthMismatch {
                segments: chain.segments().len(),
                entries: chain.entries().len(),
            }
            .into());
        }
        if chain.len() >= self.max_hops {
            return Err(ChainStateError::MaxHopsReached { max: self.max_hops }.into());
        }

        let hop = chain.len();
        let mut segments = Vec::with_capacity(hop + 1);
        segments.extend_from_slice(chain.segments());
        segments.push(signer.segment());

        let previous = PreviousSignature::for_hop(chain.entries(), hop)
            .ok_or(EncodingError::MissingPreviousSignature { index: hop })?;
        let suite = self.scheme.suite();
        let data = CanonicalEncoder::encode(chain.prefix(), &segments, previous, suite)?;

        let signature = self.scheme.sign(&signer.key, &data)?;

        let mut entries = Vec::with_capacity(hop + 1);
        entries.extend_from_slice(chain.entries());
        entries.push(SignatureBlockEntry::new(suite, signer.key_id, signature));

        debug!(
            prefix = %chain.prefix(),
            hop,
            asn = %signer.asn,
            suite = %suite,
            "hop signed"
        );

        Ok(AttestationChain::new(*chain.prefix(), segments, entries))
    }
}
