//! # Path Length Scaling
//!
//! Falcon-512 signatures are roughly ten times larger than ECDSA P-256, so
//! long paths run into the 65535-byte attribute ceiling. These tests check
//! realistic (15 hop) and long (80 hop) paths, and that oversized
//! attributes are refused rather than truncated.

#[cfg(test)]
mod tests {
    use crate::fixtures::{falcon_chain, numbered_speakers, prefix, snapshot, NOW};
    use bgpsec_path_attestation::{
        AttestationChain, Falcon512Scheme, PathAttestationVerifier, VerifierConfig,
    };
    use shared_crypto::falcon::max_signature_len;
    use shared_types::{
        AlgorithmSuite, AsNumber, KeyId, SecurePathSegment, SignatureBlockEntry, WireError,
    };
    use std::sync::Arc;

    fn verify_long(hops: usize) {
        let ases = numbered_speakers(hops);
        let chain = falcon_chain(prefix("198.51.100.0/24"), &ases);
        let verifier = PathAttestationVerifier::new(
            Arc::new(Falcon512Scheme::new()),
            VerifierConfig::default(),
        );

        let result = verifier.verify_with_snapshot(&chain, &snapshot(&ases), NOW);
        assert!(result.is_valid(), "{hops} hops: {result:?}");
        assert_eq!(result.verified_path().map(<[AsNumber]>::len), Some(hops));

        let report = chain.size_report();
        assert_eq!(report.hops, hops);
        assert!(!report.exceeds_attribute_limit, "{hops} hops: {report:?}");
        assert!(report.average_signature_bytes <= max_signature_len() as f64);

        let bytes = chain.encode_attribute().unwrap();
        assert_eq!(bytes.len(), report.total_attribute_bytes);
    }

    #[test]
    fn test_typical_path_length() {
        verify_long(15);
    }

    #[test]
    fn test_long_path_fits_attribute() {
        verify_long(80);
    }

    #[test]
    fn test_oversized_attribute_rejected() {
        let hops = 100;
        let segments: Vec<_> = (0..hops)
            .map(|i| SecurePathSegment::new(AsNumber(65001 + i as u32), 1, 0))
            .collect();
        let entries: Vec<_> = (0..hops)
            .map(|_| {
                SignatureBlockEntry::new(
                    AlgorithmSuite::Falcon512,
                    KeyId([0xAB; 20]),
                    vec![0u8; max_signature_len()],
                )
            })
            .collect();
        let chain = AttestationChain::new(prefix("10.0.0.0/8"), segments, entries);

        assert!(chain.size_report().exceeds_attribute_limit);
        assert!(matches!(
            chain.encode_attribute(),
            Err(WireError::AttributeTooLarge { hops: 100, .. })
        ));
    }
}
