//! Fuzz target for attribute decoding and chain verification.
//!
//! Arbitrary bytes are decoded as a BGPsec_PATH attribute and, when they
//! parse, verified against a key snapshot that holds keys for a few ASes.
//!
//! ## Running
//!
//! ```bash
//! cd crates/bgpsec-path-attestation
//! cargo +nightly fuzz run fuzz_attribute_verify
//! ```

#![no_main]

use bgpsec_path_attestation::test_utils::{mock_chain, MockScheme, TEST_NOW};
use bgpsec_path_attestation::{AttestationChain, PathAttestationVerifier, VerifierConfig};
use libfuzzer_sys::fuzz_target;
use shared_types::{Prefix, SecurePathAttribute};
use std::sync::Arc;

/// Fuzz input: raw attribute bytes plus verifier knobs.
#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    attribute: Vec<u8>,
    detect_path_loops: bool,
    ipv6: bool,
}

fuzz_target!(|input: FuzzInput| {
    let prefix: Prefix = if input.ipv6 { "2001:db8::/32" } else { "10.0.0.0/8" }
        .parse()
        .unwrap();

    // Decoding must never panic, whatever the bytes
    let Ok((attribute, consumed)) = SecurePathAttribute::decode(&input.attribute) else {
        return;
    };
    assert!(consumed <= input.attribute.len());

    // Header is 3 or 4 bytes depending on the length flag
    let body = attribute.body_len();
    assert!(consumed == body + 3 || consumed == body + 4);

    let (_, keys) = mock_chain(prefix, &[65001, 65002, 65003]);
    let verifier = PathAttestationVerifier::new(
        Arc::new(MockScheme::new()),
        VerifierConfig::default().with_path_loop_detection(input.detect_path_loops),
    );
    let chain = AttestationChain::from_attribute(prefix, attribute);

    let result = verifier.verify_with_snapshot(&chain, &keys, TEST_NOW);
    let again = verifier.verify_with_snapshot(&chain, &keys, TEST_NOW);

    // Deterministic, and only VALID with a verified path
    assert_eq!(result, again);
    assert_eq!(result.is_valid(), result.verified_path().is_some());
    if let Some(hop) = result.failing_hop() {
        assert!(hop < chain.len());
    }
});
