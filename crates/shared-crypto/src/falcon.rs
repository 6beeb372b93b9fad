//! # Falcon-512 Signatures
//!
//! Lattice-based post-quantum signatures (NIST round 3, NTRU lattices).
//!
//! ## Security Properties
//!
//! - Detached signatures: the signed bytes are never embedded in the output
//! - Secret key bytes are zeroized when a key pair is dropped
//! - Verification of malformed keys or signatures is an error, never a panic
//!
//! ## Sizes
//!
//! | Item | Bytes |
//! |------|-------|
//! | Public key | 897 |
//! | Secret key | 1281 |
//! | Signature | variable, at most 752 |

use crate::CryptoError;
use pqcrypto_falcon::falcon512;
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};
use zeroize::Zeroizing;

/// Falcon-512 public key length.
pub const PUBLIC_KEY_LEN: usize = 897;

/// Falcon-512 secret key length.
pub const SECRET_KEY_LEN: usize = 1281;

/// First byte of an encoded Falcon-512 secret key (`0x50 + log2(512)`).
pub const SECRET_KEY_HEADER: u8 = 0x59;

/// Upper bound on a detached Falcon-512 signature.
pub fn max_signature_len() -> usize {
    falcon512::signature_bytes()
}

/// Falcon-512 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FalconPublicKey(Vec<u8>);

impl FalconPublicKey {
    /// Create from bytes, checking they parse as a Falcon-512 key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        falcon512::PublicKey::from_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes.to_vec()))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Verify a detached signature.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        verify_detached(&self.0, message, signature)
    }
}

/// Falcon-512 key pair.
pub struct FalconKeyPair {
    public_key: FalconPublicKey,
    secret_key: Zeroizing<Vec<u8>>,
}

impl FalconKeyPair {
    /// Generate a random key pair using the OS RNG.
    pub fn generate() -> Self {
        let (pk, sk) = falcon512::keypair();
        Self {
            public_key: FalconPublicKey(pk.as_bytes().to_vec()),
            secret_key: Zeroizing::new(sk.as_bytes().to_vec()),
        }
    }

    /// Rebuild a key pair from stored bytes.
    pub fn from_bytes(public_key: &[u8], secret_key: &[u8]) -> Result<Self, CryptoError> {
        let public_key = FalconPublicKey::from_bytes(public_key)?;
        parse_secret_key(secret_key)?;
        Ok(Self {
            public_key,
            secret_key: Zeroizing::new(secret_key.to_vec()),
        })
    }

    /// Get public key.
    pub fn public_key(&self) -> &FalconPublicKey {
        &self.public_key
    }

    /// Secret key bytes (for handing to a signing key handle).
    pub fn secret_key_bytes(&self) -> Zeroizing<Vec<u8>> {
        self.secret_key.clone()
    }

    /// Sign a message, producing a detached signature.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        sign_detached(&self.secret_key, message)
    }
}

/// Check length and header byte. `pqcrypto` checks only the length, and
/// signing with an undecodable key yields an empty signature.
fn parse_secret_key(secret_key: &[u8]) -> Result<falcon512::SecretKey, CryptoError> {
    if secret_key.first() != Some(&SECRET_KEY_HEADER) {
        return Err(CryptoError::InvalidPrivateKey);
    }
    falcon512::SecretKey::from_bytes(secret_key).map_err(|_| CryptoError::InvalidPrivateKey)
}

/// Sign with raw secret key bytes.
///
/// Fails with `InvalidPrivateKey` when the bytes are not a Falcon-512 key
/// or the key cannot be decoded during signing.
pub fn sign_detached(secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let sk = parse_secret_key(secret_key)?;
    let signature = falcon512::detached_sign(message, &sk);
    if signature.as_bytes().is_empty() {
        return Err(CryptoError::InvalidPrivateKey);
    }
    Ok(signature.as_bytes().to_vec())
}

/// Verify a detached signature with raw public key bytes.
pub fn verify_detached(
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let pk = falcon512::PublicKey::from_bytes(public_key)
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig = falcon512::DetachedSignature::from_bytes(signature)
        .map_err(|_| CryptoError::InvalidSignatureFormat)?;

    falcon512::verify_detached_signature(&sig, message, &pk)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
