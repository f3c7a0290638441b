//! LEB128 integers with a zig-zag transform for signed values.
//!
//! The zig-zag transform rotates the sign bit into the lowest bit, so small
//! negative numbers stay as short as small positive ones.

use crate::error::FormatError;

#[inline]
pub(crate) const fn zigzag(value: i128) -> u128 {
    ((value << 1) ^ (value >> 127)) as u128
}

#[inline]
pub(crate) const fn unzigzag(value: u128) -> i128 {
    ((value >> 1) as i128) ^ -((value & 1) as i128)
}

pub(crate) fn write_unsigned(out: &mut Vec<u8>, mut value: u128) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

#[inline]
pub(crate) fn write_signed(out: &mut Vec<u8>, value: i128) {
    write_unsigned(out, zigzag(value));
}

/// Reads one varint at `*pos`, advancing past it.
pub(crate) fn read_unsigned(bytes: &[u8], pos: &mut usize) -> Result<u128, FormatError> {
    let mut value = 0_u128;
    let mut shift = 0_u32;
    loop {
        let Some(&byte) = bytes.get(*pos) else {
            return Err(FormatError::UnexpectedEnd);
        };
        *pos += 1;
        if shift >= 128 || (shift == 126 && byte > 0x03) {
            return Err(FormatError::malformed("varint overflows 128 bits"));
        }
        value |= u128::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

#[inline]
pub(crate) fn read_signed(bytes: &[u8], pos: &mut usize) -> Result<i128, FormatError> {
    read_unsigned(bytes, pos).map(unzigzag)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_keeps_small_magnitudes_small() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(-1), 1);
        assert_eq!(zigzag(1), 2);
        assert_eq!(zigzag(-2), 3);
        for value in [i128::MIN, i128::MAX, -300, 300] {
            assert_eq!(unzigzag(zigzag(value)), value);
        }
    }

    #[test]
    fn lengths_and_limits() {
        let mut out = Vec::new();
        write_unsigned(&mut out, 127);
        assert_eq!(out, [0x7F]);
        out.clear();
        write_unsigned(&mut out, 128);
        assert_eq!(out, [0x80, 0x01]);

        out.clear();
        write_unsigned(&mut out, u128::MAX);
        assert_eq!(out.len(), 19);
        let mut pos = 0;
        assert_eq!(read_unsigned(&out, &mut pos).unwrap(), u128::MAX);
        assert_eq!(pos, 19);

        let mut pos = 0;
        assert!(matches!(
            read_unsigned(&[0x80, 0x80], &mut pos),
            Err(FormatError::UnexpectedEnd)
        ));
        let mut pos = 0;
        assert!(read_unsigned(&[0xFF; 20], &mut pos).is_err());
    }
}
