//! # Route Scenarios
//!
//! 1. **Origination**: AS 65001 originates 10.0.0.0/8
//! 2. **Forwarding**: AS 65002 extends the chain; both hops verify
//! 3. **Tampering**: corrupted signatures, edited segments, swapped hops
//! 4. **Key failures**: unknown, revoked, expired and unsupported keys

#[cfg(test)]
mod tests {
    use crate::fixtures::{builder, falcon_chain, prefix, snapshot, speakers, FalconSpeaker, NOW};
    use bgpsec_path_attestation::{
        AttestationChain, CanonicalEncoder, Falcon512Scheme, KeySnapshot, Outcome,
        PathAttestationVerifier, ReasonCode, SignatureScheme, ValidationResult, ValidityWindow,
        VerifierConfig,
    };
    use shared_types::{
        AlgorithmSuite, AsNumber, SecurePathAttribute, SecurePathSegment, SignatureBlockEntry,
    };
    use std::sync::Arc;

    fn verifier() -> PathAttestationVerifier<Falcon512Scheme> {
        PathAttestationVerifier::new(Arc::new(Falcon512Scheme::new()), VerifierConfig::default())
    }

    fn rebuild(
        chain: &AttestationChain,
        edit: impl FnOnce(&mut Vec<SecurePathSegment>, &mut Vec<SignatureBlockEntry>),
    ) -> AttestationChain {
        let (prefix, mut segments, mut entries) = chain.clone().into_parts();
        edit(&mut segments, &mut entries);
        AttestationChain::new(prefix, segments, entries)
    }

    // =============================================================================
    // ORIGINATION AND FORWARDING
    // =============================================================================

    #[test]
    fn test_origin_announcement_is_valid() {
        let origin = FalconSpeaker::generate(65001);
        let chain = builder()
            .originate(prefix("10.0.0.0/8"), &origin.signer)
            .unwrap();

        let keys = KeySnapshot::new().with_record(origin.record.clone());
        let result = verifier().verify_with_snapshot(&chain, &keys, NOW);

        assert_eq!(result.outcome(), Outcome::Valid);
        assert_eq!(result.verified_path(), Some(&[AsNumber(65001)][..]));
    }

    #[test]
    fn test_forwarded_announcement_is_valid() {
        let ases = speakers(&[65001, 65002]);
        let builder = builder();

        let received = builder
            .originate(prefix("10.0.0.0/8"), &ases[0].signer)
            .unwrap();
        let forwarded = builder.forward(&received, &ases[1].signer).unwrap();

        assert_eq!(received.len(), 1);
        assert_eq!(forwarded.len(), 2);

        let result = verifier().verify_with_snapshot(&forwarded, &snapshot(&ases), NOW);
        assert!(result.is_valid());
        assert_eq!(
            result.verified_path(),
            Some(&[AsNumber(65001), AsNumber(65002)][..])
        );
    }

    #[test]
    fn test_ipv6_route() {
        let ases = speakers(&[65001, 65002, 65003]);
        let chain = falcon_chain(prefix("2001:db8::/32"), &ases);
        assert!(verifier()
            .verify_with_snapshot(&chain, &snapshot(&ases), NOW)
            .is_valid());
    }

    #[test]
    fn test_signatures_are_chained() {
        let ases = speakers(&[65001, 65002]);
        let chain = falcon_chain(prefix("10.0.0.0/8"), &ases);

        let data = CanonicalEncoder::encode_hop(&chain, 1, AlgorithmSuite::Falcon512).unwrap();
        let tail = &data[data.len() - chain.entries()[0].signature.len()..];
        assert_eq!(tail, &chain.entries()[0].signature[..]);
        assert!(Falcon512Scheme::new().verify(
            &ases[1].record.public_key,
            &data,
            &chain.entries()[1].signature
        ));
    }

    // =============================================================================
    // TAMPERING
    // =============================================================================

    #[test]
    fn test_corrupted_origin_signature() {
        let ases = speakers(&[65001, 65002, 65003]);
        let chain = falcon_chain(prefix("10.0.0.0/8"), &ases);
        let corrupted = rebuild(&chain, |_, entries| {
            let sig = &mut entries[0].signature;
            let mid = sig.len() / 2;
            sig[mid] ^= 0x01;
        });

        let result = verifier().verify_with_snapshot(&corrupted, &snapshot(&ases), NOW);
        assert_eq!(result, ValidationResult::invalid(ReasonCode::BadSignature, Some(0)));
    }

    #[test]
    fn test_swapped_hops_rejected() {
        let ases = speakers(&[65001, 65002, 65003, 65004, 65005]);
        let chain = falcon_chain(prefix("10.0.0.0/8"), &ases);
        let keys = snapshot(&ases);

        for (i, j) in [(0, 2), (1, 3), (0, 4), (2, 4)] {
            let swapped = rebuild(&chain, |segments, entries| {
                segments.swap(i, j);
                entries.swap(i, j);
            });
            let result = verifier().verify_with_snapshot(&swapped, &keys, NOW);
            assert_eq!(
                result,
                ValidationResult::invalid(ReasonCode::BadSignature, Some(i)),
                "swap ({i}, {j})"
            );
        }
    }

    #[test]
    fn test_removed_middle_hop_rejected() {
        let ases = speakers(&[65001, 65002, 65003]);
        let chain = falcon_chain(prefix("10.0.0.0/8"), &ases);
        let shortened = rebuild(&chain, |segments, entries| {
            segments.remove(1);
            entries.remove(1);
        });

        let result = verifier().verify_with_snapshot(&shortened, &snapshot(&ases), NOW);
        assert_eq!(result, ValidationResult::invalid(ReasonCode::BadSignature, Some(1)));
    }

    #[test]
    fn test_replayed_signature_for_other_prefix_rejected() {
        let ases = speakers(&[65001, 65002]);
        let chain = falcon_chain(prefix("10.0.0.0/8"), &ases);
        let (_, segments, entries) = chain.into_parts();
        let hijack = AttestationChain::new(prefix("10.0.0.0/16"), segments, entries);

        let result = verifier().verify_with_snapshot(&hijack, &snapshot(&ases), NOW);
        assert_eq!(result, ValidationResult::invalid(ReasonCode::BadSignature, Some(0)));
    }

    #[test]
    fn test_path_loop_with_detection() {
        let ases = speakers(&[65001, 65002]);
        let builder = builder();
        let origin = builder
            .originate(prefix("10.0.0.0/8"), &ases[0].signer)
            .unwrap();
        let transit = builder.forward(&origin, &ases[1].signer).unwrap();
        let looping = builder.forward(&transit, &ases[0].signer).unwrap();
        let keys = snapshot(&ases);

        let strict = PathAttestationVerifier::new(
            Arc::new(Falcon512Scheme::new()),
            VerifierConfig::default().with_path_loop_detection(true),
        );
        assert_eq!(
            strict.verify_with_snapshot(&looping, &keys, NOW),
            ValidationResult::invalid(ReasonCode::PathLoop, Some(2))
        );
        assert!(verifier().verify_with_snapshot(&looping, &keys, NOW).is_valid());
    }

    // =============================================================================
    // KEY FAILURES
    // =============================================================================

    #[test]
    fn test_unknown_key_at_third_hop() {
        let ases = speakers(&[65001, 65002, 65003]);
        let chain = falcon_chain(prefix("10.0.0.0/8"), &ases);
        let keys = snapshot(&ases[..2]);

        let result = verifier().verify_with_snapshot(&chain, &keys, NOW);
        assert_eq!(result, ValidationResult::invalid(ReasonCode::UnknownKey, Some(2)));
    }

    #[test]
    fn test_revoked_key() {
        let ases = speakers(&[65001, 65002]);
        let chain = falcon_chain(prefix("10.0.0.0/8"), &ases);
        let mut keys = snapshot(&ases);
        keys.revoke(ases[1].asn, ases[1].record.key_id);

        let result = verifier().verify_with_snapshot(&chain, &keys, NOW);
        assert_eq!(result, ValidationResult::invalid(ReasonCode::KeyInvalid, Some(1)));
    }

    #[test]
    fn test_key_not_yet_valid() {
        let origin = FalconSpeaker::with_validity(65001, ValidityWindow::new(NOW + 1, NOW + 3600));
        let chain = builder()
            .originate(prefix("10.0.0.0/8"), &origin.signer)
            .unwrap();
        let keys = KeySnapshot::new().with_record(origin.record.clone());

        let result = verifier().verify_with_snapshot(&chain, &keys, NOW);
        assert_eq!(result, ValidationResult::invalid(ReasonCode::KeyInvalid, Some(0)));
        assert!(verifier().verify_with_snapshot(&chain, &keys, NOW + 1).is_valid());
    }

    #[test]
    fn test_unsupported_suite() {
        let ases = speakers(&[65001, 65002]);
        let chain = falcon_chain(prefix("10.0.0.0/8"), &ases);
        let legacy = rebuild(&chain, |_, entries| {
            entries[0].suite = AlgorithmSuite::EcdsaP256;
        });

        let result = verifier().verify_with_snapshot(&legacy, &snapshot(&ases), NOW);
        assert_eq!(result, ValidationResult::invalid(ReasonCode::UnsupportedAlgo, Some(0)));
    }

    // =============================================================================
    // WIRE AND REPORTING
    // =============================================================================

    #[test]
    fn test_received_attribute_verifies() {
        let ases = speakers(&[65001, 65002, 65003]);
        let chain = falcon_chain(prefix("192.0.2.0/24"), &ases);
        let bytes = chain.encode_attribute().unwrap();

        let (attribute, consumed) = SecurePathAttribute::decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());

        let received = AttestationChain::from_attribute(prefix("192.0.2.0/24"), attribute);
        assert_eq!(received, chain);
        assert!(verifier()
            .verify_with_snapshot(&received, &snapshot(&ases), NOW)
            .is_valid());
    }

    #[test]
    fn test_result_serializes_for_reporting() {
        let ases = speakers(&[65001, 65002]);
        let chain = falcon_chain(prefix("10.0.0.0/8"), &ases);
        let keys = snapshot(&ases[..1]);

        let result = verifier().verify_with_snapshot(&chain, &keys, NOW);
        let json = serde_json::to_value(&result).unwrap();
        let back: ValidationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.reason().map(|r| r.as_str()), Some("UNKNOWN_KEY"));
    }

    #[test]
    fn test_empty_chain_is_malformed() {
        let chain = AttestationChain::unsigned(prefix("10.0.0.0/8"));
        let result = verifier().verify_with_snapshot(&chain, &KeySnapshot::new(), NOW);
        assert_eq!(result, ValidationResult::invalid(ReasonCode::Malformed, None));
    }
}
