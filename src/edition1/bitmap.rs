use std::cell::OnceCell;

use crate::error::{BuildError, DecodeError, GribError};
use crate::helpers::{read_as, read_u24};
use crate::message::SectionBytes;

use super::bds::UnpackedValues;

/// The bit-map section (3) of an edition 1 GRIB message.
///
/// One bit per grid point, most significant bit first; a zero bit marks a
/// missing point.
#[derive(Debug)]
pub struct BitMapSection {
    pub(crate) raw: SectionBytes,
    bits: OnceCell<Box<[bool]>>,
}

impl BitMapSection {
    pub(crate) fn from_bytes(raw: SectionBytes) -> Result<Self, BuildError> {
        if raw.payload.len() < 6 {
            return Err(BuildError::SectionSizeTooSmall(raw.payload.len()));
        }
        Ok(Self {
            raw,
            bits: OnceCell::new(),
        })
    }

    pub fn section3_length(&self) -> u32 {
        read_u24(&self.raw.payload, 0)
    }

    #[inline]
    pub fn number_of_unused_bits(&self) -> u8 {
        self.raw.payload[3]
    }

    /// Bit-map catalogue number; zero means the bit-map follows inline.
    pub fn table_reference(&self) -> u16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 4)
    }

    /// The unpacked bit-map, one flag per grid point. Decoded once and
    /// memoised.
    pub fn bits(&self) -> Result<&[bool], GribError> {
        if let Some(bits) = self.bits.get() {
            return Ok(bits);
        }

        if self.table_reference() > 0 {
            return Err(GribError::NotSupported(format!(
                "catalogued bit-maps (table reference {})",
                self.table_reference()
            )));
        }

        let octets = &self.raw.payload[6..];
        let unused = usize::from(self.number_of_unused_bits());
        let kept = (octets.len() * 8)
            .checked_sub(unused)
            .ok_or(DecodeError::LengthMismatch)?;

        let mut bits = Vec::with_capacity(kept);
        'outer: for byte in octets {
            for position in 0..8 {
                if bits.len() == kept {
                    break 'outer;
                }
                bits.push(byte & (0x80 >> position) != 0);
            }
        }
        Ok(self.bits.get_or_init(|| bits.into_boxed_slice()))
    }

    /// Scatters the unpacked values over the bit-map, filling missing
    /// points with `f64::NAN`.
    pub(crate) fn apply_mask(&self, values: UnpackedValues) -> Result<Vec<f64>, GribError> {
        let bits = self.bits()?;
        match values {
            UnpackedValues::Constant(value) => Ok(bits
                .iter()
                .map(|&present| if present { value } else { f64::NAN })
                .collect()),
            UnpackedValues::Points(values) => {
                let present = bits.iter().filter(|&&bit| bit).count();
                if present != values.len() {
                    return Err(DecodeError::LengthMismatch.into());
                }
                let mut unmasked = values.into_iter();
                Ok(bits
                    .iter()
                    .map(|&bit| {
                        if bit {
                            unmasked.next().unwrap_or(f64::NAN)
                        } else {
                            f64::NAN
                        }
                    })
                    .collect())
            }
        }
    }
}
