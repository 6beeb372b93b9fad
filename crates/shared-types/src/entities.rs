//! # Path Entities
//!
//! Value types that make up a BGPsec-protected route announcement.
//!
//! ## Clusters
//!
//! - **Identity**: `AsNumber`, `KeyId`
//! - **Algorithms**: `AlgorithmSuite`
//! - **Path**: `SecurePathSegment`, `SignatureBlockEntry`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Length of a subject key identifier in bytes.
pub const KEY_ID_LEN: usize = 20;

/// A 32-bit Autonomous System number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AsNumber(pub u32);

impl AsNumber {
    /// AS 0 is reserved and may never appear in a path (RFC 7607).
    pub const RESERVED_ZERO: AsNumber = AsNumber(0);
    /// The last 32-bit AS number is reserved (RFC 7300).
    pub const RESERVED_LAST: AsNumber = AsNumber(u32::MAX);

    /// Raw numeric value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this AS number is reserved and must not be signed over.
    pub const fn is_reserved(self) -> bool {
        self.0 == Self::RESERVED_ZERO.0 || self.0 == Self::RESERVED_LAST.0
    }
}

impl From<u32> for AsNumber {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for AsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

/// Subject key identifier of a router key (20 bytes, as in RFC 8205).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId(pub [u8; KEY_ID_LEN]);

impl KeyId {
    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

// =============================================================================
// CLUSTER B: ALGORITHMS
// =============================================================================

/// Algorithm suite identifier carried in every Signature_Block entry.
///
/// Unknown identifiers are preserved as `Unassigned` so that a decoded
/// attribute can still be handed to the verifier, which rejects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmSuite {
    /// ECDSA P-256 with SHA-256 (RFC 8208). Recognised, not supported.
    EcdsaP256,
    /// ECDSA P-384 with SHA-384. Recognised, not supported.
    EcdsaP384,
    /// Falcon-512 lattice signatures.
    Falcon512,
    /// Any other identifier seen on the wire.
    Unassigned(u8),
}

impl AlgorithmSuite {
    /// Stable numeric ID emitted on the wire.
    pub const fn id(self) -> u8 {
        match self {
            AlgorithmSuite::EcdsaP256 => 0x01,
            AlgorithmSuite::EcdsaP384 => 0x02,
            AlgorithmSuite::Falcon512 => 0x03,
            AlgorithmSuite::Unassigned(id) => id,
        }
    }

    /// Canonical machine name.
    pub const fn name(self) -> &'static str {
        match self {
            AlgorithmSuite::EcdsaP256 => "ecdsa-p256",
            AlgorithmSuite::EcdsaP384 => "ecdsa-p384",
            AlgorithmSuite::Falcon512 => "falcon-512",
            AlgorithmSuite::Unassigned(_) => "unassigned",
        }
    }
}

impl From<u8> for AlgorithmSuite {
    fn from(id: u8) -> Self {
        match id {
            0x01 => AlgorithmSuite::EcdsaP256,
            0x02 => AlgorithmSuite::EcdsaP384,
            0x03 => AlgorithmSuite::Falcon512,
            other => AlgorithmSuite::Unassigned(other),
        }
    }
}

impl From<AlgorithmSuite> for u8 {
    fn from(suite: AlgorithmSuite) -> u8 {
        suite.id()
    }
}

impl fmt::Display for AlgorithmSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmSuite::Unassigned(id) => write!(f, "unassigned(0x{id:02x})"),
            known => f.write_str(known.name()),
        }
    }
}

// =============================================================================
// CLUSTER C: PATH
// =============================================================================

/// Encoded size of one Secure_Path segment.
pub const SEGMENT_LEN: usize = 6;

/// Confed_Segment flag (most significant bit of the flags octet).
pub const CONFED_SEGMENT_FLAG: u8 = 0x80;

/// One hop's claim in the Secure_Path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurePathSegment {
    /// AS that added this segment.
    pub asn: AsNumber,
    /// Propagation count (number of times the AS is repeated).
    pub p_count: u8,
    /// Segment flags.
    pub flags: u8,
}

impl SecurePathSegment {
    /// Create a segment.
    pub fn new(asn: AsNumber, p_count: u8, flags: u8) -> Self {
        Self {
            asn,
            p_count,
            flags,
        }
    }

    /// Whether the Confed_Segment flag is set.
    pub fn is_confed_segment(&self) -> bool {
        self.flags & CONFED_SEGMENT_FLAG != 0
    }

    /// Fixed-width big-endian encoding: AS (4) | pCount (1) | flags (1).
    pub fn to_bytes(&self) -> [u8; SEGMENT_LEN] {
        let mut out = [0u8; SEGMENT_LEN];
        out[..4].copy_from_slice(&self.asn.0.to_be_bytes());
        out[4] = self.p_count;
        out[5] = self.flags;
        out
    }

    /// Decode from exactly six bytes.
    pub fn from_bytes(bytes: [u8; SEGMENT_LEN]) -> Self {
        let asn = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Self {
            asn: AsNumber(asn),
            p_count: bytes[4],
            flags: bytes[5],
        }
    }
}

/// One hop's proof in the Signature_Block.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureBlockEntry {
    /// Algorithm that produced the signature.
    pub suite: AlgorithmSuite,
    /// Identifier of the signer's key.
    pub key_id: KeyId,
    /// Raw signature bytes.
    #[serde_as(as = "Bytes")]
    pub signature: Vec<u8>,
}

impl SignatureBlockEntry {
    /// Create an entry.
    pub fn new(suite: AlgorithmSuite, key_id: KeyId, signature: Vec<u8>) -> Self {
        Self {
            suite,
            key_id,
            signature,
        }
    }
}
