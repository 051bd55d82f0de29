//! Unsigned LEB128 varints
//!
//! Decoding is strict: encodings must be minimal and fit in a u64.

use crate::{Error, Result};

/// Longest encoding of a u64
pub const MAX_VARINT_LEN: usize = 10;

/// Append the varint encoding of `value` to `out`.
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Varint encoding of `value`
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(varint_len(value));
    write_varint(&mut out, value);
    out
}

/// Number of bytes `value` occupies when encoded
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Decode one varint from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate().take(MAX_VARINT_LEN) {
        let chunk = u64::from(byte & 0x7f);
        let shift = 7 * i as u32;
        // The tenth byte may only carry the top bit of a u64.
        if i == MAX_VARINT_LEN - 1 && chunk > 1 {
            return Err(Error::MalformedOperation("varint overflows u64".to_string()));
        }
        value |= chunk << shift;
        if byte & 0x80 == 0 {
            if byte == 0 && i > 0 {
                return Err(Error::MalformedOperation(
                    "varint is not minimally encoded".to_string(),
                ));
            }
            return Ok((value, i + 1));
        }
    }

    if bytes.len() >= MAX_VARINT_LEN {
        Err(Error::MalformedOperation(format!(
            "varint longer than {MAX_VARINT_LEN} bytes"
        )))
    } else {
        Err(Error::MalformedOperation("truncated varint".to_string()))
    }
}
