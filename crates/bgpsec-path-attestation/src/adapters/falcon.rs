//! # Falcon-512 Signature Adapter
//!
//! Implements the `SignatureScheme` port over `shared-crypto`.
//!
//! ## Security
//!
//! - Secret key bytes live in a `Zeroizing` buffer owned by the handle
//! - `verify` never panics; malformed keys or signatures verify as false

use crate::domain::entities::{KeyRecord, LocalSigner, ValidityWindow};
use crate::domain::errors::SigningError;
use crate::ports::outbound::SignatureScheme;
use shared_crypto::falcon::{SECRET_KEY_HEADER, SECRET_KEY_LEN};
use shared_crypto::{sign_detached, subject_key_id, verify_detached, FalconKeyPair, FalconPublicKey};
use shared_types::{AlgorithmSuite, AsNumber, KeyId};
use zeroize::Zeroizing;

/// Falcon-512 signature scheme (suite `0x03`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Falcon512Scheme;

impl Falcon512Scheme {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureScheme for Falcon512Scheme {
    type SigningKey = FalconSigningKey;

    fn suite(&self) -> AlgorithmSuite {
        AlgorithmSuite::Falcon512
    }

    fn sign(&self, key: &FalconSigningKey, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        sign_detached(&key.secret, message).map_err(|e| SigningError::InvalidKey(e.to_string()))
    }

    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        verify_detached(public_key, message, signature).is_ok()
    }
}

/// Handle to a Falcon-512 secret key.
pub struct FalconSigningKey {
    secret: Zeroizing<Vec<u8>>,
}

impl FalconSigningKey {
    pub fn from_bytes(secret_key: &[u8]) -> Result<Self, SigningError> {
        if secret_key.len() != SECRET_KEY_LEN {
            return Err(SigningError::InvalidKey(format!(
                "expected {} secret key bytes, got {}",
                SECRET_KEY_LEN,
                secret_key.len()
            )));
        }
        if secret_key[0] != SECRET_KEY_HEADER {
            return Err(SigningError::InvalidKey(format!(
                "secret key header {:#04x} is not Falcon-512",
                secret_key[0]
            )));
        }
        Ok(Self {
            secret: Zeroizing::new(secret_key.to_vec()),
        })
    }

    pub fn from_keypair(keypair: &FalconKeyPair) -> Self {
        Self {
            secret: keypair.secret_key_bytes(),
        }
    }
}

impl std::fmt::Debug for FalconSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FalconSigningKey").finish_non_exhaustive()
    }
}

/// Subject key identifier of a Falcon-512 public key.
pub fn falcon_key_id(public_key: &FalconPublicKey) -> KeyId {
    KeyId(subject_key_id(public_key.as_bytes()))
}

/// Signing identity and provisioning record for a freshly held key pair.
pub fn falcon_identity(
    asn: AsNumber,
    keypair: &FalconKeyPair,
    validity: ValidityWindow,
) -> (LocalSigner<FalconSigningKey>, KeyRecord) {
    let key_id = falcon_key_id(keypair.public_key());
    let record = KeyRecord::new(asn, key_id, keypair.public_key().as_bytes().to_vec(), validity);
    let signer = LocalSigner::new(asn, key_id, FalconSigningKey::from_keypair(keypair));
    (signer, record)
}
