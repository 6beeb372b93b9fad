//! # Falcon-512 Fixtures
//!
//! Real key pairs for end-to-end scenarios. Key generation dominates test
//! time, so each speaker is generated once and reused.

use bgpsec_path_attestation::{
    falcon_identity, AttestationChain, Falcon512Scheme, FalconSigningKey, KeyRecord, KeySnapshot,
    LocalSigner, PathAttestationBuilder, ValidityWindow,
};
use shared_crypto::FalconKeyPair;
use shared_types::{AsNumber, Prefix};
use std::sync::Arc;

/// Fixed verification time for scenarios.
pub const NOW: u64 = 1_700_000_000;

/// A BGP speaker with its Falcon-512 identity.
pub struct FalconSpeaker {
    pub asn: AsNumber,
    pub signer: LocalSigner<FalconSigningKey>,
    pub record: KeyRecord,
}

impl FalconSpeaker {
    pub fn generate(asn: u32) -> Self {
        Self::with_validity(asn, ValidityWindow::unbounded())
    }

    pub fn with_validity(asn: u32, validity: ValidityWindow) -> Self {
        let asn = AsNumber(asn);
        let (signer, record) = falcon_identity(asn, &FalconKeyPair::generate(), validity);
        Self { asn, signer, record }
    }
}

/// One speaker per AS number, in order.
pub fn speakers(asns: &[u32]) -> Vec<FalconSpeaker> {
    asns.iter().map(|asn| FalconSpeaker::generate(*asn)).collect()
}

/// `count` speakers numbered from 65001.
pub fn numbered_speakers(count: usize) -> Vec<FalconSpeaker> {
    let asns: Vec<u32> = (0..count as u32).map(|i| 65001 + i).collect();
    speakers(&asns)
}

/// Snapshot holding every speaker's key.
pub fn snapshot(speakers: &[FalconSpeaker]) -> KeySnapshot {
    KeySnapshot::from_records(speakers.iter().map(|s| s.record.clone()))
}

pub fn builder() -> PathAttestationBuilder<Falcon512Scheme> {
    PathAttestationBuilder::new(Arc::new(Falcon512Scheme::new()))
}

/// Sign `prefix` through every speaker, origin first.
pub fn falcon_chain(prefix: Prefix, speakers: &[FalconSpeaker]) -> AttestationChain {
    let builder = builder().with_max_hops(speakers.len().max(1));
    speakers
        .iter()
        .fold(AttestationChain::unsigned(prefix), |chain, speaker| {
            builder
                .extend(&chain, &speaker.signer)
                .expect("falcon signing")
        })
}

pub fn prefix(s: &str) -> Prefix {
    s.parse().expect("valid prefix")
}
