//! Fuzz test for operation decoding
//!
//! Anything that decodes must serialize back to the exact input bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use masslet_core::operation::Operation;

fuzz_target!(|data: &[u8]| {
    if let Ok(op) = Operation::deserialize(data) {
        assert_eq!(op.serialize(), data);
    }
});
