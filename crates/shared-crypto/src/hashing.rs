//! # Key Identifier Hashing
//!
//! Subject key identifiers name a router key inside a Signature_Block entry.
//! They are the first 20 bytes of SHA-256 over the public key bytes.

use sha2::{Digest, Sha256};

/// Length of a subject key identifier.
pub const SKI_LEN: usize = 20;

/// SHA-256 hash output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Hash multiple inputs as one stream.
pub fn sha256_many(inputs: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().into()
}

/// Derive the subject key identifier of a public key.
pub fn subject_key_id(public_key: &[u8]) -> [u8; SKI_LEN] {
    let digest = sha256(public_key);
    let mut ski = [0u8; SKI_LEN];
    ski.copy_from_slice(&digest[..SKI_LEN]);
    ski
}
