//! The 32-bit floating point format stored in tokenized AMOS source
//!
//! Layout (big-endian):
//! - bits 31-8: mantissa (24 bits)
//! - bit 7: sign, negative if set
//! - bits 6-0: exponent, biased by 0x40
//!
//! value = (-1)^sign * (mantissa / 2^24) * 2^(exponent - 0x40)

use bitreader::{BitReader, BitReaderError};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};

const EXPONENT_BIAS: i32 = 0x40;
const MANTISSA_SCALE: f64 = (1u32 << 24) as f64;

/// How the four bytes of a float literal are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatMode {
    /// Mantissa/sign/exponent reconstruction
    #[default]
    Amos,
    /// Reinterpret the bits as an IEEE-754 single
    Ieee,
}

pub fn decode_float(bytes: [u8; 4], mode: FloatMode) -> Result<f32> {
    match mode {
        FloatMode::Amos => decode_amos_float(bytes),
        FloatMode::Ieee => Ok(f32::from_bits(u32::from_be_bytes(bytes))),
    }
}

pub fn decode_amos_float(bytes: [u8; 4]) -> Result<f32> {
    let (mantissa, negative, exponent) = split_fields(&bytes)
        .map_err(|e| DecodeError::corrupt_data(format!("float literal: {}", e)))?;

    let magnitude =
        (mantissa as f64 / MANTISSA_SCALE) * 2f64.powi(exponent as i32 - EXPONENT_BIAS);
    let value = magnitude as f32;
    Ok(if negative { -value } else { value })
}

fn split_fields(bytes: &[u8; 4]) -> std::result::Result<(u32, bool, u8), BitReaderError> {
    let mut br = BitReader::new(bytes);
    let mantissa = br.read_u32(24)?;
    let negative = br.read_bool()?;
    let exponent = br.read_u8(7)?;
    Ok((mantissa, negative, exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amos_float_one() {
        // 0.5 * 2^1
        assert_eq!(decode_amos_float([0x80, 0x00, 0x00, 0x41]).unwrap(), 1.0);
    }

    #[test]
    fn test_amos_float_fraction_and_sign() {
        assert_eq!(decode_amos_float([0xC0, 0x00, 0x00, 0x41]).unwrap(), 1.5);
        assert_eq!(decode_amos_float([0x80, 0x00, 0x00, 0xC2]).unwrap(), -2.0);
        assert_eq!(decode_amos_float([0x80, 0x00, 0x00, 0x40]).unwrap(), 0.5);
    }

    #[test]
    fn test_amos_float_zero() {
        assert_eq!(decode_amos_float([0, 0, 0, 0]).unwrap(), 0.0);
    }

    #[test]
    fn test_ieee_mode_differs() {
        let bytes = 1.0f32.to_bits().to_be_bytes();
        assert_eq!(decode_float(bytes, FloatMode::Ieee).unwrap(), 1.0);
        // The same bytes read as an AMOS float are tiny, not 1.0
        assert_ne!(decode_float(bytes, FloatMode::Amos).unwrap(), 1.0);
    }
}
