//! Property-based tests for masslet-core
//!
//! Uses proptest to verify invariants across randomized inputs

use masslet_core::address::{compute_address, decode_address, is_valid_address, Address};
use masslet_core::amount::{format_nano, parse_mas, NANO_PER_MAS};
use masslet_core::keys::KeyPair;
use masslet_core::operation::Operation;
use masslet_core::signer::{sign, verify_submission};
use masslet_core::varint::{decode_varint, encode_varint};
use proptest::prelude::*;
use sha2::{Digest, Sha256};

// ============================================================================
// Strategies
// ============================================================================

fn public_key_strategy() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    (any::<u64>(), any::<u64>(), any::<[u8; 32]>(), 1u64..=u64::MAX).prop_map(
        |(fee, expire_period, hash, amount)| {
            Operation::transfer(Address::from_hash(hash), amount, fee, expire_period).unwrap()
        },
    )
}

// ============================================================================
// Address Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_address_decodes_to_key_hash(pk in public_key_strategy()) {
        let address = compute_address(&pk).unwrap();
        let hash = decode_address(address.as_str()).unwrap();
        let expected: [u8; 32] = Sha256::digest(pk).into();
        prop_assert_eq!(hash, expected);
    }

    #[test]
    fn prop_address_rejects_other_prefixes(pk in public_key_strategy(), prefix in "[A-Z]{2}") {
        prop_assume!(prefix != "AU");
        let address = compute_address(&pk).unwrap();
        let swapped = format!("{prefix}{}", &address.as_str()[2..]);
        prop_assert!(!is_valid_address(&swapped));
    }

    #[test]
    fn prop_address_single_char_corruption(pk in public_key_strategy(), idx in 2usize..40, replacement in "[1-9A-HJ-NP-Za-km-z]") {
        let address = compute_address(&pk).unwrap();
        let original = address.as_str();
        prop_assume!(idx < original.len());
        let mut corrupted = original.to_string();
        corrupted.replace_range(idx..idx + 1, &replacement);
        prop_assume!(corrupted != original);
        prop_assert!(!is_valid_address(&corrupted));
    }
}

// ============================================================================
// Codec Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_varint_round_trip(value in any::<u64>()) {
        let encoded = encode_varint(value);
        prop_assert!(encoded.len() <= 10);
        prop_assert_eq!(decode_varint(&encoded).unwrap(), (value, encoded.len()));
    }

    #[test]
    fn prop_operation_length(op in operation_strategy()) {
        let expected = encode_varint(op.fee).len()
            + encode_varint(op.expire_period).len()
            + encode_varint(0).len()
            + 32
            + encode_varint(op.amount).len();
        prop_assert_eq!(op.serialize().len(), expected);
    }

    #[test]
    fn prop_operation_inverse(op in operation_strategy()) {
        prop_assert_eq!(Operation::deserialize(&op.serialize()).unwrap(), op);
    }

    #[test]
    fn prop_operation_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..80)) {
        let _ = Operation::deserialize(&bytes);
    }
}

// ============================================================================
// Signing Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_signatures_verify(seed in any::<[u8; 32]>(), op in operation_strategy(), chain_id in any::<u64>()) {
        let kp = KeyPair::from_secret_seed(&seed);
        let submission = sign(&op, &kp, chain_id).unwrap();
        prop_assert!(verify_submission(&submission, chain_id).is_ok());
        prop_assert!(verify_submission(&submission, chain_id.wrapping_add(1)).is_err());
    }

    #[test]
    fn prop_address_deterministic_from_seed(seed in any::<[u8; 32]>()) {
        let a = KeyPair::from_secret_seed(&seed);
        let b = KeyPair::from_secret_seed(&seed);
        prop_assert_eq!(a.address(), b.address());
        prop_assert_eq!(a.address(), compute_address(&a.public_key()).unwrap());
    }
}

// ============================================================================
// Amount Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_whole_mas_formats_exactly(whole in 0u64..18_000_000_000) {
        let formatted = format_nano(whole * NANO_PER_MAS);
        prop_assert_eq!(formatted, format!("{whole}.000000"));
    }

    #[test]
    fn prop_parse_mas_of_formatted(nano in 0u64..=u64::MAX / 2) {
        // Six-decimal display drops at most half a micro-MAS.
        let parsed = parse_mas(&format_nano(nano)).unwrap();
        prop_assert!(parsed.abs_diff(nano) <= 500);
    }
}
