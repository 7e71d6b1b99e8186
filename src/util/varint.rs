//! Variable-length integer encoding utilities.
//!
//! Unsigned integers are stored least significant group first, seven bits per
//! byte, with the high bit set on every byte except the last. Term statistics
//! in table values and the length fields of table files use this encoding.

use std::io::{Read, Write};

use byteorder::ReadBytesExt;

use crate::error::{LexicoreError, Result};

/// Encode a u64 value using variable-length encoding.
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(10);
    let mut val = value;

    loop {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;

        if val != 0 {
            byte |= 0x80; // Set continuation bit
        }

        bytes.push(byte);

        if val == 0 {
            break;
        }
    }

    bytes
}

/// Decode a u64 value, returning it together with the number of bytes consumed.
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0;

    for (index, &byte) in bytes.iter().enumerate() {
        let group = (byte & 0x7F) as u64;
        if shift >= 64 || (shift == 63 && group > 1) {
            return Err(LexicoreError::corruption("VarInt overflow"));
        }

        result |= group << shift;

        if (byte & 0x80) == 0 {
            return Ok((result, index + 1));
        }

        shift += 7;
    }

    Err(LexicoreError::corruption("Incomplete VarInt"))
}

/// Decode a u64 value from the front of `input`, advancing it past the value.
pub fn take_u64(input: &mut &[u8]) -> Result<u64> {
    let (value, used) = decode_u64(input)?;
    *input = &input[used..];
    Ok(value)
}

/// Write a variable-length encoded u64 to a writer.
pub fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<usize> {
    let bytes = encode_u64(value);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Read a variable-length encoded u64 from a reader.
pub fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut result = 0u64;
    let mut shift = 0;

    loop {
        let byte = reader.read_u8()?;
        let group = (byte & 0x7F) as u64;

        if shift >= 64 || (shift == 63 && group > 1) {
            return Err(LexicoreError::corruption("VarInt overflow"));
        }

        result |= group << shift;

        if (byte & 0x80) == 0 {
            return Ok(result);
        }

        shift += 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_decode_u64() {
        let test_values = [0, 1, 127, 128, 255, 256, 16383, 16384, u64::MAX];

        for &value in &test_values {
            let encoded = encode_u64(value);
            let (decoded, bytes_read) = decode_u64(&encoded).unwrap();

            assert_eq!(value, decoded);
            assert_eq!(encoded.len(), bytes_read);
        }
    }

    #[test]
    fn test_take_advances_input() {
        let mut buffer = encode_u64(300);
        buffer.extend(encode_u64(7));
        let mut input = buffer.as_slice();

        assert_eq!(take_u64(&mut input).unwrap(), 300);
        assert_eq!(take_u64(&mut input).unwrap(), 7);
        assert!(input.is_empty());
    }

    #[test]
    fn test_write_read_u64() {
        let mut buffer = Vec::new();
        let value = 123456789012345u64;

        let bytes_written = write_u64(&mut buffer, value).unwrap();
        assert_eq!(bytes_written, buffer.len());

        let mut cursor = Cursor::new(buffer);
        let decoded = read_u64(&mut cursor).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn test_encoding_efficiency() {
        assert_eq!(encode_u64(0).len(), 1);
        assert_eq!(encode_u64(127).len(), 1);
        assert_eq!(encode_u64(128).len(), 2);
        assert_eq!(encode_u64(16384).len(), 3);
        assert_eq!(encode_u64(u64::MAX).len(), 10);
    }

    #[test]
    fn test_incomplete_varint_is_corruption() {
        let incomplete = vec![0x80]; // Continuation bit set but no more data
        let err = decode_u64(&incomplete).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_overflow() {
        let overflow_data = vec![0xFF; 11];
        assert!(decode_u64(&overflow_data).unwrap_err().is_corruption());
    }
}
