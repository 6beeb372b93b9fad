//! # Attestation Errors
//!
//! Error types for building attestation chains and for the ports they use.
//!
//! Verification never returns these: every verification failure is reported
//! through a [`ValidationResult`](super::entities::ValidationResult).

use shared_types::{AsNumber, KeyId, PrefixError};
use std::time::Duration;
use thiserror::Error;

/// Errors producing the canonical signed bytes of a hop.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// A path must contain at least the signing hop.
    #[error("Secure_Path is empty")]
    EmptyPath,

    /// Segment count does not fit the 16-bit count field.
    #[error("Too many segments: {0}")]
    TooManySegments(usize),

    /// AS 0 and AS 4294967295 never appear in an attested path.
    #[error("Reserved AS number {asn} at segment {index}")]
    ReservedAsNumber { index: usize, asn: AsNumber },

    /// The announced prefix is not well formed.
    #[error("Malformed prefix: {0}")]
    MalformedPrefix(#[from] PrefixError),

    /// Previous signature does not fit the 16-bit length field.
    #[error("Previous signature too large: {0} bytes")]
    PreviousSignatureTooLarge(usize),

    /// A non-origin hop must chain to the previous signature.
    #[error("Hop {index} has no previous signature to chain to")]
    MissingPreviousSignature { index: usize },

    /// The origin hop has nothing to chain to.
    #[error("Origin hop cannot chain to a previous signature")]
    UnexpectedPreviousSignature,

    /// Hop index is past the end of the path.
    #[error("Hop {hop} out of range for a path of {len} segments")]
    HopOutOfRange { hop: usize, len: usize },
}

/// Errors from a signature scheme while signing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The key handle does not hold a usable key for this scheme.
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// The key exists but cannot be used right now (HSM offline, locked).
    #[error("Signing key unavailable: {0}")]
    KeyUnavailable(String),

    /// The primitive itself failed.
    #[error("Signing backend failure: {0}")]
    Backend(String),
}

/// Errors caused by the shape of the chain being extended.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainStateError {
    /// Secure_Path and Signature_Block must be index-aligned.
    #[error("Chain has {segments} segments but {entries} signatures")]
    LengthMismatch { segments: usize, entries: usize },

    /// The chain already holds the configured maximum number of hops.
    #[error("Chain already has the maximum of {max} hops")]
    MaxHopsReached { max: usize },
}

/// Errors from originating or forwarding a route.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttestationError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    ChainState(#[from] ChainStateError),
}

impl AttestationError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AttestationError::Encoding(_) => "encoding",
            AttestationError::Signing(_) => "signing",
            AttestationError::ChainState(_) => "chain_state",
        }
    }
}

/// Errors from a key store lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyStoreError {
    /// No key is provisioned for this (AS, key id) pair.
    #[error("No key for {asn} with id {key_id}")]
    NotFound { asn: AsNumber, key_id: KeyId },

    /// The store could not answer (RPKI cache down, I/O error).
    #[error("Key store unavailable: {0}")]
    Unavailable(String),

    /// The lookup did not complete in time.
    #[error("Key lookup timed out after {0:?}")]
    Timeout(Duration),
}

impl KeyStoreError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            KeyStoreError::NotFound { .. } => "not_found",
            KeyStoreError::Unavailable(_) => "unavailable",
            KeyStoreError::Timeout(_) => "timeout",
        }
    }

    /// Whether the failure says nothing about the route itself.
    pub fn is_transient(&self) -> bool {
        !matches!(self, KeyStoreError::NotFound { .. })
    }
}

/// Invalid verifier configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_hops must be between 1 and {max}, got {value}")]
    MaxHopsOutOfRange { value: usize, max: usize },

    #[error("key_lookup_timeout must be non-zero")]
    ZeroLookupTimeout,
}
