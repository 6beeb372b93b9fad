//! # Domain Entities
//!
//! Attestation chains, router key records and validation results.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_types::{
    AsNumber, KeyId, Prefix, SecurePathAttribute, SecurePathSegment, SignatureBlockEntry,
    SizeReport, WireError,
};
use std::fmt;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

// =============================================================================
// Router keys
// =============================================================================

/// Inclusive validity period of a router key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub not_before: Timestamp,
    pub not_after: Timestamp,
}

impl ValidityWindow {
    pub fn new(not_before: Timestamp, not_after: Timestamp) -> Self {
        Self {
            not_before,
            not_after,
        }
    }

    /// A window that never expires.
    pub fn unbounded() -> Self {
        Self::new(0, Timestamp::MAX)
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.not_before <= timestamp && timestamp <= self.not_after
    }
}

/// A router public key bound to an AS.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub asn: AsNumber,
    pub key_id: KeyId,
    #[serde_as(as = "Bytes")]
    pub public_key: Vec<u8>,
    pub validity: ValidityWindow,
    pub revoked: bool,
}

impl KeyRecord {
    /// Create a non-revoked record.
    pub fn new(asn: AsNumber, key_id: KeyId, public_key: Vec<u8>, validity: ValidityWindow) -> Self {
        Self {
            asn,
            key_id,
            public_key,
            validity,
            revoked: false,
        }
    }

    /// Not revoked and inside the validity window.
    pub fn is_valid_at(&self, timestamp: Timestamp) -> bool {
        !self.revoked && self.validity.contains(timestamp)
    }
}

// =============================================================================
// Attestation chain
// =============================================================================

/// A prefix with its Secure_Path and Signature_Block.
///
/// Segment `i` and entry `i` belong to the same hop; index 0 is the origin.
/// Chains are values: forwarding produces a new chain and leaves the
/// received one untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationChain {
    prefix: Prefix,
    segments: Vec<SecurePathSegment>,
    entries: Vec<SignatureBlockEntry>,
}

impl AttestationChain {
    /// Assemble a chain from parts, e.g. as received from a peer.
    ///
    /// No checks are made; the verifier decides whether the parts agree.
    pub fn new(
        prefix: Prefix,
        segments: Vec<SecurePathSegment>,
        entries: Vec<SignatureBlockEntry>,
    ) -> Self {
        Self {
            prefix,
            segments,
            entries,
        }
    }

    /// An empty chain for a locally originated prefix.
    pub fn unsigned(prefix: Prefix) -> Self {
        Self::new(prefix, Vec::new(), Vec::new())
    }

    /// Rebuild a chain from a decoded BGPsec_PATH attribute.
    pub fn from_attribute(prefix: Prefix, attribute: SecurePathAttribute) -> Self {
        Self::new(prefix, attribute.segments, attribute.entries)
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn segments(&self) -> &[SecurePathSegment] {
        &self.segments
    }

    pub fn entries(&self) -> &[SignatureBlockEntry] {
        &self.entries
    }

    /// Number of hops (Secure_Path segments).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether every segment has exactly one signature.
    pub fn is_aligned(&self) -> bool {
        self.segments.len() == self.entries.len()
    }

    /// AS numbers in path order, origin first.
    pub fn as_path(&self) -> Vec<AsNumber> {
        self.segments.iter().map(|s| s.asn).collect()
    }

    /// Split into owned parts.
    pub fn into_parts(self) -> (Prefix, Vec<SecurePathSegment>, Vec<SignatureBlockEntry>) {
        (self.prefix, self.segments, self.entries)
    }

    /// The attribute carried in an UPDATE for this chain.
    pub fn to_attribute(&self) -> SecurePathAttribute {
        SecurePathAttribute::new(self.segments.clone(), self.entries.clone())
    }

    /// Encode the BGPsec_PATH attribute bytes.
    pub fn encode_attribute(&self) -> Result<Vec<u8>, WireError> {
        self.to_attribute().encode()
    }

    /// Byte accounting for this chain on the wire.
    pub fn size_report(&self) -> SizeReport {
        SizeReport::measure(&self.to_attribute(), &self.prefix)
    }
}

/// A local AS's signing identity: its segment fields and key handle.
#[derive(Clone, Debug)]
pub struct LocalSigner<K> {
    pub asn: AsNumber,
    pub p_count: u8,
    pub flags: u8,
    pub key_id: KeyId,
    pub key: K,
}

impl<K> LocalSigner<K> {
    /// A signer with `p_count` 1 and no flags.
    pub fn new(asn: AsNumber, key_id: KeyId, key: K) -> Self {
        Self {
            asn,
            p_count: 1,
            flags: 0,
            key_id,
            key,
        }
    }

    /// Set the prepend count carried in this AS's segment.
    pub fn with_p_count(mut self, p_count: u8) -> Self {
        self.p_count = p_count;
        self
    }

    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    /// The Secure_Path segment this signer appends.
    pub fn segment(&self) -> SecurePathSegment {
        SecurePathSegment::new(self.asn, self.p_count, self.flags)
    }
}

// =============================================================================
// Validation result
// =============================================================================

/// Three-valued verdict on a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Valid,
    Invalid,
    /// Could not be decided, e.g. the key store was unreachable.
    Indeterminate,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Valid => "valid",
            Outcome::Invalid => "invalid",
            Outcome::Indeterminate => "indeterminate",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a chain was not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    /// Structure is wrong (empty, count mismatch, unencodable hop).
    Malformed,
    /// No key provisioned for the hop's (AS, key id).
    UnknownKey,
    /// Key revoked or outside its validity window.
    KeyInvalid,
    /// Signature does not verify over the hop's canonical bytes.
    BadSignature,
    /// An AS reappears after a different AS.
    PathLoop,
    /// Entry names a suite this verifier does not run.
    UnsupportedAlgo,
    /// Key store failed or timed out.
    KeyStoreUnavailable,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Malformed => "MALFORMED",
            ReasonCode::UnknownKey => "UNKNOWN_KEY",
            ReasonCode::KeyInvalid => "KEY_INVALID",
            ReasonCode::BadSignature => "BAD_SIGNATURE",
            ReasonCode::PathLoop => "PATH_LOOP",
            ReasonCode::UnsupportedAlgo => "UNSUPPORTED_ALGO",
            ReasonCode::KeyStoreUnavailable => "KEY_STORE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of verifying one chain.
///
/// `failing_hop` indexes the first hop that failed (origin = 0) and is
/// absent when the chain fails as a whole. `verified_path` is present only
/// for valid chains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    outcome: Outcome,
    failing_hop: Option<usize>,
    reason: Option<ReasonCode>,
    verified_path: Option<Vec<AsNumber>>,
}

impl ValidationResult {
    pub fn valid(verified_path: Vec<AsNumber>) -> Self {
        Self {
            outcome: Outcome::Valid,
            failing_hop: None,
            reason: None,
            verified_path: Some(verified_path),
        }
    }

    pub fn invalid(reason: ReasonCode, failing_hop: Option<usize>) -> Self {
        Self {
            outcome: Outcome::Invalid,
            failing_hop,
            reason: Some(reason),
            verified_path: None,
        }
    }

    pub fn indeterminate(failing_hop: usize) -> Self {
        Self {
            outcome: Outcome::Indeterminate,
            failing_hop: Some(failing_hop),
            reason: Some(ReasonCode::KeyStoreUnavailable),
            verified_path: None,
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn failing_hop(&self) -> Option<usize> {
        self.failing_hop
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        self.reason
    }

    pub fn verified_path(&self) -> Option<&[AsNumber]> {
        self.verified_path.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.outcome == Outcome::Valid
    }

    pub fn is_invalid(&self) -> bool {
        self.outcome == Outcome::Invalid
    }

    pub fn is_indeterminate(&self) -> bool {
        self.outcome == Outcome::Indeterminate
    }
}
