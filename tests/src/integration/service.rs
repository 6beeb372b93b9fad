//! # Service Facade
//!
//! `AttestationService` wired to the in-memory key store and Falcon-512,
//! the way an embedding BGP speaker would use it.

#[cfg(test)]
mod tests {
    use crate::fixtures::{prefix, snapshot, speakers, FalconSpeaker, NOW};
    use bgpsec_path_attestation::test_utils::{FixedTimeSource, FlakyKeyStore};
    use bgpsec_path_attestation::{
        AttestationChain, AttestationService, Falcon512Scheme, KeySnapshot, PathAttestationApi,
        ReasonCode, SnapshotKeyStore, ValidationResult, VerifierConfig,
    };
    use path_telemetry::{encode_metrics, register_metrics, CHAIN_VERIFICATIONS, HOPS_VERIFIED};
    use std::sync::{Arc, OnceLock};
    use std::time::Duration;

    type FalconService<K> = AttestationService<K, Falcon512Scheme, FixedTimeSource>;

    fn service<K: bgpsec_path_attestation::KeyStore>(
        key_store: K,
        config: VerifierConfig,
    ) -> FalconService<K> {
        AttestationService::with_time_source(
            Arc::new(key_store),
            Arc::new(Falcon512Scheme::new()),
            config,
            FixedTimeSource::new(NOW),
        )
        .unwrap()
    }

    fn metrics_registered() {
        static REGISTERED: OnceLock<()> = OnceLock::new();
        REGISTERED.get_or_init(|| {
            assert!(register_metrics().is_ok(), "metrics registered twice");
        });
    }

    /// Originate at the first speaker and forward through the rest.
    fn announce(
        api: &impl PathAttestationApi<SigningKey = bgpsec_path_attestation::FalconSigningKey>,
        route: &str,
        ases: &[FalconSpeaker],
    ) -> AttestationChain {
        let mut chain = api.originate(prefix(route), &ases[0].signer).unwrap();
        for speaker in &ases[1..] {
            chain = api.forward(&chain, &speaker.signer).unwrap();
        }
        chain
    }

    #[tokio::test]
    async fn test_announce_and_verify() {
        let ases = speakers(&[65001, 65002, 65003]);
        let svc = service(SnapshotKeyStore::new(snapshot(&ases)), VerifierConfig::default());

        let chain = announce(&svc, "10.0.0.0/8", &ases);
        let result = svc.verify(&chain).await;

        assert!(result.is_valid());
        assert_eq!(result.verified_path().unwrap(), chain.as_path().as_slice());
    }

    #[tokio::test]
    async fn test_key_rotation_between_verifications() {
        let ases = speakers(&[65001, 65002]);
        let store = SnapshotKeyStore::new(snapshot(&ases[..1]));
        let svc = service(store, VerifierConfig::default());
        let chain = announce(&svc, "10.0.0.0/8", &ases);

        assert_eq!(
            svc.verify(&chain).await,
            ValidationResult::invalid(ReasonCode::UnknownKey, Some(1))
        );

        svc.key_store().provision(ases[1].record.clone());
        assert!(svc.verify(&chain).await.is_valid());

        svc.key_store().revoke(ases[0].asn, ases[0].record.key_id);
        assert_eq!(
            svc.verify(&chain).await,
            ValidationResult::invalid(ReasonCode::KeyInvalid, Some(0))
        );
    }

    #[tokio::test]
    async fn test_batch_results_are_index_aligned() {
        let ases = speakers(&[65001, 65002, 65003]);
        let svc = service(SnapshotKeyStore::new(snapshot(&ases)), VerifierConfig::default());

        let good = announce(&svc, "10.0.0.0/8", &ases);
        let (route, segments, mut entries) = good.clone().into_parts();
        entries[2].signature[0] ^= 0xFF;
        let bad = AttestationChain::new(route, segments, entries);
        let empty = AttestationChain::unsigned(prefix("10.1.0.0/16"));

        let chains = vec![good, bad, empty];
        let results = svc.verify_batch(&chains).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_valid());
        assert_eq!(results[1], ValidationResult::invalid(ReasonCode::BadSignature, Some(2)));
        assert_eq!(results[2], ValidationResult::invalid(ReasonCode::Malformed, None));

        let parallel = svc.verify_batch_with_snapshot(&svc.key_store().snapshot(), &chains);
        assert_eq!(parallel, results);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_indeterminate() {
        let ases = speakers(&[65001, 65002]);
        let store = FlakyKeyStore::new(snapshot(&ases)).failing_for(ases[1].asn);
        let svc = service(store, VerifierConfig::default());
        let chain = announce(&svc, "10.0.0.0/8", &ases);

        let result = svc.verify(&chain).await;
        assert!(result.is_indeterminate());
        assert_eq!(result.reason(), Some(ReasonCode::KeyStoreUnavailable));
        assert_eq!(result.failing_hop(), Some(1));
        assert_eq!(result.verified_path(), None);
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let ases = speakers(&[65001]);
        let store = FlakyKeyStore::new(snapshot(&ases)).with_delay(Duration::from_millis(500));
        let config = VerifierConfig::default().with_key_lookup_timeout(Duration::from_millis(20));
        let svc = service(store, config);
        let chain = announce(&svc, "10.0.0.0/8", &ases);

        let result = svc.verify(&chain).await;
        assert_eq!(result, ValidationResult::indeterminate(0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = AttestationService::with_time_source(
            Arc::new(SnapshotKeyStore::new(KeySnapshot::new())),
            Arc::new(Falcon512Scheme::new()),
            VerifierConfig::default().with_max_hops(0),
            FixedTimeSource::new(NOW),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_verifications_are_exported() {
        metrics_registered();
        let ases = speakers(&[65001, 65002]);
        let svc = service(SnapshotKeyStore::new(snapshot(&ases)), VerifierConfig::default());
        let chain = announce(&svc, "10.0.0.0/8", &ases);

        let hops_before = HOPS_VERIFIED.get();
        let valid_before = CHAIN_VERIFICATIONS.with_label_values(&["valid", "none"]).get();
        assert!(svc.verify(&chain).await.is_valid());

        assert!(HOPS_VERIFIED.get() >= hops_before + 2.0);
        assert!(CHAIN_VERIFICATIONS.with_label_values(&["valid", "none"]).get() > valid_before);

        let text = encode_metrics().unwrap();
        assert!(text.contains("bgpsec_verifier_chains_total"));
        assert!(text.contains("bgpsec_verifier_hops_verified_total"));
    }
}
