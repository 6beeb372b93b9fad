//! # Error Types
//!
//! Errors raised while parsing prefixes or encoding/decoding wire fields.

use thiserror::Error;

/// Errors for a malformed NLRI prefix.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrefixError {
    /// Prefix length exceeds the address family width.
    #[error("Prefix length {len} exceeds maximum {max}")]
    LengthOutOfRange { len: u8, max: u8 },

    /// Bits beyond the prefix length are set.
    #[error("Host bits set beyond /{len}")]
    HostBitsSet { len: u8 },

    /// Text form could not be parsed.
    #[error("Invalid prefix syntax: {0}")]
    Syntax(String),
}

/// Errors for Secure_Path attribute and NLRI wire handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WireError {
    /// Input ended before a field was complete.
    #[error("Truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// Attribute type code is not BGPsec_PATH.
    #[error("Unexpected attribute type code: {0}")]
    WrongAttributeType(u8),

    /// Secure_Path length is not 2 + 6k.
    #[error("Invalid Secure_Path length: {0}")]
    InvalidSecurePathLength(u16),

    /// Encoded attribute body would exceed the 65535-byte BGP limit.
    #[error("Attribute too large: {size} bytes > {max} bytes ({hops} hops)")]
    AttributeTooLarge { size: usize, max: usize, hops: usize },

    /// Secure_Path has more segments than fit in the length field.
    #[error("Too many segments: {0}")]
    TooManySegments(usize),

    /// Signature does not fit the 16-bit length field.
    #[error("Signature too large: {0} bytes")]
    SignatureTooLarge(usize),

    /// NLRI carried a malformed prefix.
    #[error("Invalid NLRI prefix: {0}")]
    InvalidPrefix(#[from] PrefixError),
}
