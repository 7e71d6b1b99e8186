//! Sort-preserving key packing.
//!
//! Table keys are compared bytewise, so terms and document ids are packed in a
//! way that keeps bytewise order of the packed form equal to the natural order
//! of the values.
//!
//! A packed string copies every byte of the input except `0x00`, which is
//! written as `0x00 0xFF`. Unless the string is the last component of a key a
//! single `0x00` terminates it, which sorts before any escaped zero or any
//! other byte, so a term always sorts before its extensions.

use crate::error::{LexicoreError, Result};

/// Escape byte following a literal zero.
const ZERO_ESCAPE: u8 = 0xFF;

/// Pack `value` onto `out`. When `last` is false a terminator is appended.
pub fn pack_string_preserving_sort(out: &mut Vec<u8>, value: &[u8], last: bool) {
    out.reserve(value.len() + 1);
    for &byte in value {
        out.push(byte);
        if byte == 0 {
            out.push(ZERO_ESCAPE);
        }
    }
    if !last {
        out.push(0);
    }
}

/// Convenience wrapper returning a fresh buffer.
pub fn packed_string(value: &[u8], last: bool) -> Vec<u8> {
    let mut out = Vec::new();
    pack_string_preserving_sort(&mut out, value, last);
    out
}

/// Unpack a string from the front of `input`.
///
/// Returns the decoded bytes, whether a terminator was consumed, and the
/// remaining input after the string. Callers decide whether what follows the
/// terminator is well formed.
pub fn unpack_string_preserving_sort(input: &[u8]) -> (Vec<u8>, bool, &[u8]) {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let byte = input[pos];
        pos += 1;
        if byte != 0 {
            result.push(byte);
            continue;
        }
        match input.get(pos) {
            Some(&ZERO_ESCAPE) => {
                result.push(0);
                pos += 1;
            }
            _ => return (result, true, &input[pos..]),
        }
    }

    (result, false, &input[pos..])
}

/// Pack an unsigned integer so that bytewise order matches numeric order.
///
/// The encoding is a length byte (1..=8) followed by the big-endian value with
/// leading zero bytes removed.
pub fn pack_uint_preserving_sort(out: &mut Vec<u8>, value: u64) {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(7);
    out.push((8 - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

/// Unpack an integer written by [`pack_uint_preserving_sort`].
pub fn unpack_uint_preserving_sort(input: &[u8]) -> Result<(u64, &[u8])> {
    let (&len, rest) = input
        .split_first()
        .ok_or_else(|| LexicoreError::corruption("Missing packed integer"))?;
    let len = len as usize;
    if len == 0 || len > 8 || rest.len() < len {
        return Err(LexicoreError::corruption(format!(
            "Bad packed integer length: {len}"
        )));
    }
    let value = rest[..len]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | b as u64);
    Ok((value, &rest[len..]))
}
