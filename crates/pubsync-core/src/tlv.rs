//! TLV primitives: VAR-NUMBER and NonNegativeInteger encodings.
//!
//! Only the pieces needed to encode names are implemented here:
//! - VAR-NUMBER: 1 byte below 253, otherwise a marker (253/254/255)
//!   followed by a 2, 4 or 8 byte big-endian number
//! - NonNegativeInteger: big-endian, 1, 2, 4 or 8 bytes, shortest form
//!   on encode

use crate::error::{CoreError, Result};

/// Number of bytes needed to encode `n` as a VAR-NUMBER.
pub fn var_number_len(n: u64) -> usize {
    if n < 253 {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffff_ffff {
        5
    } else {
        9
    }
}

/// Append `n` as a VAR-NUMBER.
pub fn write_var_number(buf: &mut Vec<u8>, n: u64) {
    if n < 253 {
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(253);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(254);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(255);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Read a VAR-NUMBER from the front of `input`.
///
/// Returns the number and how many bytes it occupied.
pub fn read_var_number(input: &[u8]) -> Result<(u64, usize)> {
    let first = *input.first().ok_or(CoreError::Truncated {
        needed: 1,
        available: 0,
    })?;

    let width = match first {
        253 => 2,
        254 => 4,
        255 => 8,
        n => return Ok((u64::from(n), 1)),
    };

    let rest = &input[1..];
    if rest.len() < width {
        return Err(CoreError::Truncated {
            needed: width + 1,
            available: input.len(),
        });
    }

    let n = rest[..width]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Ok((n, width + 1))
}

/// Append a complete TLV element.
pub fn write_tlv(buf: &mut Vec<u8>, tlv_type: u64, value: &[u8]) {
    write_var_number(buf, tlv_type);
    write_var_number(buf, value.len() as u64);
    buf.extend_from_slice(value);
}

/// Encoded size of a TLV element with the given type and value length.
pub fn tlv_len(tlv_type: u64, value_len: usize) -> usize {
    var_number_len(tlv_type) + var_number_len(value_len as u64) + value_len
}

/// Read one TLV element from the front of `input`.
///
/// Returns `(type, value, consumed)`.
pub fn read_tlv(input: &[u8]) -> Result<(u64, &[u8], usize)> {
    let (tlv_type, type_len) = read_var_number(input)?;
    let (length, length_len) = read_var_number(&input[type_len..])?;

    let header = type_len + length_len;
    let length = usize::try_from(length).map_err(|_| CoreError::Truncated {
        needed: usize::MAX,
        available: input.len(),
    })?;
    let end = header.checked_add(length).ok_or(CoreError::Truncated {
        needed: usize::MAX,
        available: input.len(),
    })?;
    if input.len() < end {
        return Err(CoreError::Truncated {
            needed: end,
            available: input.len(),
        });
    }

    Ok((tlv_type, &input[header..end], end))
}

/// Encode a NonNegativeInteger in its shortest form.
pub fn encode_nni(n: u64) -> Vec<u8> {
    if n <= 0xff {
        vec![n as u8]
    } else if n <= 0xffff {
        (n as u16).to_be_bytes().to_vec()
    } else if n <= 0xffff_ffff {
        (n as u32).to_be_bytes().to_vec()
    } else {
        n.to_be_bytes().to_vec()
    }
}

/// Decode a NonNegativeInteger.
///
/// Only lengths 1, 2, 4 and 8 are valid.
pub fn decode_nni(bytes: &[u8]) -> Result<u64> {
    match bytes.len() {
        1 | 2 | 4 | 8 => Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))),
        n => Err(CoreError::InvalidNniLength(n)),
    }
}
