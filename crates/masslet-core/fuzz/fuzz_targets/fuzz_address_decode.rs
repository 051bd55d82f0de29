//! Fuzz test for address decoding
//!
//! Decoding arbitrary strings must return an error, never panic, and any
//! accepted address must re-encode to itself.

#![no_main]

use libfuzzer_sys::fuzz_target;
use masslet_core::address::{decode_address, Address};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(hash) = decode_address(s) {
            assert_eq!(Address::from_hash(hash).as_str(), s);
        }
    }
});
