//! Fuzz test for mnemonic parsing
//!
//! Ensures mnemonic validation and derivation handle arbitrary input gracefully

#![no_main]

use libfuzzer_sys::fuzz_target;
use masslet_core::keys::{derive_key_pair, validate_mnemonic};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let valid = validate_mnemonic(s);
        assert_eq!(valid, derive_key_pair(s).is_ok());
    }
});
