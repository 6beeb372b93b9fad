//! # Canonical Encoding
//!
//! Deterministic data-to-sign for one hop. Signer and verifier must agree
//! on every byte, so this is the only place that lays out signed data.
//!
//! ## Layout (big-endian)
//!
//! ```text
//! "BGPSEC-PQ-PATH\x01"               domain separation tag
//! suite (1)
//! AFI (1) | prefix len (1) | prefix bytes
//! segment count (2)
//! segments[0..=i]                     6 bytes each
//! 0x00                                origin
//! | 0x01 | sig len (2) | prev sig     any later hop
//! ```
//!
//! The previous signature already covers segments `0..i`, so chaining it
//! binds hop `i` to the whole path before it.

use super::entities::AttestationChain;
use super::errors::EncodingError;
use shared_types::{AlgorithmSuite, Prefix, SecurePathSegment, SignatureBlockEntry, SEGMENT_LEN};

/// Domain separation tag prefixed to all signed data.
pub const DOMAIN_TAG: &[u8] = b"BGPSEC-PQ-PATH\x01";

const ORIGIN_MARKER: u8 = 0x00;
const CHAINED_MARKER: u8 = 0x01;

/// What hop `i` chains to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviousSignature<'a> {
    /// Hop 0 has no predecessor.
    Origin,
    /// Signature bytes of hop `i - 1`.
    Chained(&'a [u8]),
}

impl<'a> PreviousSignature<'a> {
    /// The predecessor of hop `hop` given the entries before it.
    ///
    /// Returns `None` when `entries` has no entry `hop - 1`.
    pub fn for_hop(entries: &'a [SignatureBlockEntry], hop: usize) -> Option<Self> {
        match hop {
            0 => Some(PreviousSignature::Origin),
            _ => entries
                .get(hop - 1)
                .map(|entry| PreviousSignature::Chained(&entry.signature)),
        }
    }
}

/// Produces canonical signed bytes.
pub struct CanonicalEncoder;

impl CanonicalEncoder {
    /// Encode the data signed by the last segment in `segments`.
    ///
    /// `segments` runs from the origin to the signing hop inclusive.
    pub fn encode(
        prefix: &Prefix,
        segments: &[SecurePathSegment],
        previous: PreviousSignature<'_>,
        suite: AlgorithmSuite,
    ) -> Result<Vec<u8>, EncodingError> {
        let hop = segments.len().checked_sub(1).ok_or(EncodingError::EmptyPath)?;
        let count =
            u16::try_from(segments.len()).map_err(|_| EncodingError::TooManySegments(segments.len()))?;

        for (index, segment) in segments.iter().enumerate() {
            if segment.asn.is_reserved() {
                return Err(EncodingError::ReservedAsNumber {
                    index,
                    asn: segment.asn,
                });
            }
        }
        prefix.validate()?;

        let previous_len = match previous {
            PreviousSignature::Origin if hop > 0 => {
                return Err(EncodingError::MissingPreviousSignature { index: hop })
            }
            PreviousSignature::Chained(_) if hop == 0 => {
                return Err(EncodingError::UnexpectedPreviousSignature)
            }
            PreviousSignature::Origin => 1,
            PreviousSignature::Chained(sig) => 3 + sig.len(),
        };

        let mut out = Vec::with_capacity(
            DOMAIN_TAG.len() + 1 + 2 + prefix.nlri_len() + 2 + segments.len() * SEGMENT_LEN + previous_len,
        );
        out.extend_from_slice(DOMAIN_TAG);
        out.push(suite.id());
        out.push(prefix.afi().tag());
        prefix.encode_nlri_into(&mut out);
        out.extend_from_slice(&count.to_be_bytes());
        for segment in segments {
            out.extend_from_slice(&segment.to_bytes());
        }

        match previous {
            PreviousSignature::Origin => out.push(ORIGIN_MARKER),
            PreviousSignature::Chained(sig) => {
                let len = u16::try_from(sig.len())
                    .map_err(|_| EncodingError::PreviousSignatureTooLarge(sig.len()))?;
                out.push(CHAINED_MARKER);
                out.extend_from_slice(&len.to_be_bytes());
                out.extend_from_slice(sig);
            }
        }

        Ok(out)
    }

    /// Encode the data hop `hop` of `chain` signed.
    pub fn encode_hop(
        chain: &AttestationChain,
        hop: usize,
        suite: AlgorithmSuite,
    ) -> Result<Vec<u8>, EncodingError> {
        let len = chain.len();
        if hop >= len {
            return Err(EncodingError::HopOutOfRange { hop, len });
        }
        let previous = PreviousSignature::for_hop(chain.entries(), hop)
            .ok_or(EncodingError::MissingPreviousSignature { index: hop })?;
        Self::encode(chain.prefix(), &chain.segments()[..=hop], previous, suite)
    }
}
