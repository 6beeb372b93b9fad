//! # BGPsec_PATH Attribute Codec
//!
//! Encoding and decoding of the Secure_Path and Signature_Block as they
//! travel inside a BGP UPDATE path attribute. Message framing is owned by
//! the transport layer; this module stops at the attribute boundary.
//!
//! ## Layout
//!
//! ```text
//! flags (1) | type (1) | length (1, or 2 when EXTENDED_LENGTH)
//! body:
//!   Secure_Path length (2) = 2 + 6n
//!   n x [ AS (4) | pCount (1) | flags (1) ]
//!   entries: [ suite (1) | key id (20) | sig length (2) | signature ]
//! ```
//!
//! Decoding checks structure only. Semantic checks (segment/entry counts,
//! reserved AS numbers, supported suites) belong to the verifier, which
//! turns them into a validation result instead of an error.

use crate::entities::{
    AlgorithmSuite, KeyId, SecurePathSegment, SignatureBlockEntry, KEY_ID_LEN, SEGMENT_LEN,
};
use crate::errors::WireError;
use crate::prefix::Prefix;
use serde::{Deserialize, Serialize};

/// Optional attribute flag.
pub const ATTR_FLAG_OPTIONAL: u8 = 0x80;
/// Transitive attribute flag.
pub const ATTR_FLAG_TRANSITIVE: u8 = 0x40;
/// Partial attribute flag.
pub const ATTR_FLAG_PARTIAL: u8 = 0x20;
/// Extended (two-byte) length flag.
pub const ATTR_FLAG_EXTENDED_LENGTH: u8 = 0x10;

/// BGPsec_PATH path attribute type code (RFC 8205).
pub const BGPSEC_PATH_TYPE_CODE: u8 = 33;

/// Maximum length of a single BGP path attribute (RFC 4271).
pub const MAX_ATTR_LENGTH: usize = 65_535;

/// Fixed overhead of one Signature_Block entry: suite + key id + length.
pub const ENTRY_OVERHEAD: usize = 1 + KEY_ID_LEN + 2;

/// Decoded BGPsec_PATH attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurePathAttribute {
    /// Secure_Path, origin first.
    pub segments: Vec<SecurePathSegment>,
    /// Signature_Block entries, index-aligned with `segments`.
    pub entries: Vec<SignatureBlockEntry>,
}

impl SecurePathAttribute {
    /// Create an attribute from its two sequences.
    pub fn new(segments: Vec<SecurePathSegment>, entries: Vec<SignatureBlockEntry>) -> Self {
        Self { segments, entries }
    }

    /// Length of the attribute body in bytes.
    pub fn body_len(&self) -> usize {
        2 + self.segments.len() * SEGMENT_LEN
            + self
                .entries
                .iter()
                .map(|e| ENTRY_OVERHEAD + e.signature.len())
                .sum::<usize>()
    }

    /// Encode the full attribute including its header.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let body_len = self.body_len();
        if body_len > MAX_ATTR_LENGTH {
            return Err(WireError::AttributeTooLarge {
                size: body_len,
                max: MAX_ATTR_LENGTH,
                hops: self.segments.len(),
            });
        }

        let secure_path_len = 2 + self.segments.len() * SEGMENT_LEN;
        let secure_path_len = u16::try_from(secure_path_len)
            .map_err(|_| WireError::TooManySegments(self.segments.len()))?;

        let extended = body_len > usize::from(u8::MAX);
        let mut flags = ATTR_FLAG_OPTIONAL | ATTR_FLAG_TRANSITIVE;
        if extended {
            flags |= ATTR_FLAG_EXTENDED_LENGTH;
        }

        let mut out = Vec::with_capacity(body_len + 4);
        out.push(flags);
        out.push(BGPSEC_PATH_TYPE_CODE);
        if extended {
            // body_len <= MAX_ATTR_LENGTH was checked above
            out.extend_from_slice(&(body_len as u16).to_be_bytes());
        } else {
            out.push(body_len as u8);
        }

        out.extend_from_slice(&secure_path_len.to_be_bytes());
        for segment in &self.segments {
            out.extend_from_slice(&segment.to_bytes());
        }
        for entry in &self.entries {
            let sig_len = u16::try_from(entry.signature.len())
                .map_err(|_| WireError::SignatureTooLarge(entry.signature.len()))?;
            out.push(entry.suite.id());
            out.extend_from_slice(entry.key_id.as_bytes());
            out.extend_from_slice(&sig_len.to_be_bytes());
            out.extend_from_slice(&entry.signature);
        }

        Ok(out)
    }

    /// Decode an attribute starting at the first byte of `data`.
    ///
    /// Returns the attribute and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize), WireError> {
        let mut reader = Reader::new(data);

        let flags = reader.u8()?;
        let type_code = reader.u8()?;
        if type_code != BGPSEC_PATH_TYPE_CODE {
            return Err(WireError::WrongAttributeType(type_code));
        }

        let body_len = if flags & ATTR_FLAG_EXTENDED_LENGTH != 0 {
            usize::from(reader.u16()?)
        } else {
            usize::from(reader.u8()?)
        };
        let body = reader.take(body_len)?;
        let attribute = Self::decode_body(body)?;

        Ok((attribute, reader.position()))
    }

    /// Decode an attribute body (everything after the length field).
    pub fn decode_body(body: &[u8]) -> Result<Self, WireError> {
        let mut reader = Reader::new(body);

        let secure_path_len = reader.u16()?;
        let segment_bytes = usize::from(secure_path_len)
            .checked_sub(2)
            .filter(|n| n % SEGMENT_LEN == 0)
            .ok_or(WireError::InvalidSecurePathLength(secure_path_len))?;

        let mut segments = Vec::with_capacity(segment_bytes / SEGMENT_LEN);
        for chunk in reader.take(segment_bytes)?.chunks_exact(SEGMENT_LEN) {
            let mut raw = [0u8; SEGMENT_LEN];
            raw.copy_from_slice(chunk);
            segments.push(SecurePathSegment::from_bytes(raw));
        }

        let mut entries = Vec::with_capacity(segments.len());
        while !reader.is_empty() {
            let suite = AlgorithmSuite::from(reader.u8()?);
            let mut key_id = [0u8; KEY_ID_LEN];
            key_id.copy_from_slice(reader.take(KEY_ID_LEN)?);
            let sig_len = usize::from(reader.u16()?);
            let signature = reader.take(sig_len)?.to_vec();
            entries.push(SignatureBlockEntry::new(suite, KeyId(key_id), signature));
        }

        Ok(Self { segments, entries })
    }
}

/// Size breakdown of an attested route, quantifying signature overhead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeReport {
    /// Number of hops.
    pub hops: usize,
    /// Bytes of Secure_Path segments (excluding its length field).
    pub secure_path_bytes: usize,
    /// Sum of raw signature lengths.
    pub total_signature_bytes: usize,
    /// Mean signature length (0 when there are no signatures).
    pub average_signature_bytes: f64,
    /// Per-entry framing (suite, key id, length) summed over all entries.
    pub signature_block_overhead: usize,
    /// Attribute header bytes (3, or 4 with extended length).
    pub header_bytes: usize,
    /// Header plus body.
    pub total_attribute_bytes: usize,
    /// NLRI bytes for the announced prefix.
    pub nlri_bytes: usize,
    /// Whether the body exceeds the 65535-byte attribute limit.
    pub exceeds_attribute_limit: bool,
}

impl SizeReport {
    /// Measure an attribute announced for `prefix`.
    pub fn measure(attribute: &SecurePathAttribute, prefix: &Prefix) -> Self {
        let total_signature_bytes: usize =
            attribute.entries.iter().map(|e| e.signature.len()).sum();
        let average_signature_bytes = if attribute.entries.is_empty() {
            0.0
        } else {
            total_signature_bytes as f64 / attribute.entries.len() as f64
        };
        let body = attribute.body_len();
        let header_bytes = if body > usize::from(u8::MAX) { 4 } else { 3 };

        Self {
            hops: attribute.segments.len(),
            secure_path_bytes: attribute.segments.len() * SEGMENT_LEN,
            total_signature_bytes,
            average_signature_bytes,
            signature_block_overhead: attribute.entries.len() * ENTRY_OVERHEAD,
            header_bytes,
            total_attribute_bytes: header_bytes + body,
            nlri_bytes: prefix.nlri_len(),
            exceeds_attribute_limit: body > MAX_ATTR_LENGTH,
        }
    }
}

/// Bounds-checked big-endian cursor.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let available = self.data.len() - self.pos;
        if available < n {
            return Err(WireError::Truncated {
                needed: n,
                available,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, WireError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }
}
