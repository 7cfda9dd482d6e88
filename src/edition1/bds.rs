use std::cell::OnceCell;

use num::ToPrimitive;

use crate::error::{BuildError, DecodeError, GribError};
use crate::grid::Grid2D;
use crate::helpers::{GribInt, grib1_float_from_bytes, read_as, read_u24};
use crate::message::SectionBytes;

/// Values reconstructed from a binary data section, before any geographic
/// ordering: either one constant for every grid point (zero bits per
/// value) or one value per packed point in scan order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UnpackedValues {
    Constant(f64),
    Points(Vec<f64>),
}

impl UnpackedValues {
    pub(crate) fn into_flat_grid(self) -> Grid2D<f64> {
        match self {
            Self::Constant(value) => Grid2D::new(vec![value], (1, 1)),
            Self::Points(values) => {
                let n = values.len();
                Grid2D::new(values, (1, n))
            }
        }
    }
}

/// The binary data section (4) of an edition 1 GRIB message.
#[derive(Debug)]
pub struct BinaryDataSection {
    pub(crate) raw: SectionBytes,
    samples: OnceCell<Box<[u64]>>,
}

impl BinaryDataSection {
    pub(crate) fn from_bytes(raw: SectionBytes) -> Result<Self, BuildError> {
        if raw.payload.len() < 11 {
            return Err(BuildError::SectionSizeTooSmall(raw.payload.len()));
        }
        Ok(Self {
            raw,
            samples: OnceCell::new(),
        })
    }

    pub fn section4_length(&self) -> u32 {
        read_u24(&self.raw.payload, 0)
    }

    /// Packing flags in the high nibble, the number of unused trailing
    /// bits in the low nibble (octet 4).
    #[inline]
    pub fn data_flag(&self) -> u8 {
        self.raw.payload[3]
    }

    /// Binary scale factor E (octet 5); packed samples are multiplied by
    /// `2^E`.
    pub fn binary_scale_factor(&self) -> i16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 4).as_grib_int()
    }

    /// Reference value R (octets 7-10), the minimum of the field.
    pub fn reference_value(&self) -> f64 {
        grib1_float_from_bytes(&self.raw.payload, 6)
    }

    #[inline]
    pub fn bits_per_value(&self) -> u8 {
        self.raw.payload[10]
    }

    /// The packed samples as raw integers, in scan order. Decoded once
    /// and memoised.
    pub fn raw_samples(&self) -> Result<&[u64], GribError> {
        if let Some(samples) = self.samples.get() {
            return Ok(samples);
        }
        let samples = self.decode_samples()?;
        Ok(self.samples.get_or_init(|| samples.into_boxed_slice()))
    }

    fn decode_samples(&self) -> Result<Vec<u64>, GribError> {
        if self.data_flag() & 0xf0 != 0 {
            return Err(GribError::NotSupported(format!(
                "packing with data flag 0x{:02x}",
                self.data_flag() & 0xf0
            )));
        }

        let payload = &self.raw.payload;
        let unused_bytes = usize::from(self.data_flag() & 0x0f) / 8;
        let end = payload
            .len()
            .checked_sub(unused_bytes)
            .ok_or(DecodeError::LengthMismatch)?;
        let data = payload.get(11..end).ok_or(DecodeError::LengthMismatch)?;

        match self.bits_per_value() {
            8 => Ok(data.iter().map(|&b| u64::from(b)).collect()),
            16 => {
                if data.len() % 2 != 0 {
                    return Err(DecodeError::LengthMismatch.into());
                }
                Ok(data
                    .chunks_exact(2)
                    .map(|pair| u64::from(read_as!(u16, pair, 0)))
                    .collect())
            }
            32 => {
                if data.len() % 4 != 0 {
                    return Err(DecodeError::LengthMismatch.into());
                }
                Ok(data
                    .chunks_exact(4)
                    .map(|quad| u64::from(read_as!(u32, quad, 0)))
                    .collect())
            }
            64 => {
                if data.len() % 8 != 0 {
                    return Err(DecodeError::LengthMismatch.into());
                }
                Ok(data
                    .chunks_exact(8)
                    .map(|octuple| read_as!(u64, octuple, 0))
                    .collect())
            }
            // Two 12-bit samples per three octets; a dangling one- or
            // two-octet tail is ignored.
            12 => Ok(data
                .chunks_exact(3)
                .flat_map(|triple| {
                    let (a, b, c) = (u64::from(triple[0]), u64::from(triple[1]), u64::from(triple[2]));
                    [(a << 4) | (b >> 4), ((b & 0x0f) << 8) | c]
                })
                .collect()),
            24 => {
                if data.len() % 3 != 0 {
                    return Err(DecodeError::LengthMismatch.into());
                }
                Ok(data
                    .chunks_exact(3)
                    .map(|triple| {
                        (u64::from(triple[0]) << 16)
                            | (u64::from(triple[1]) << 8)
                            | u64::from(triple[2])
                    })
                    .collect())
            }
            width => Err(GribError::NotSupported(format!("{width} bits per value"))),
        }
    }

    /// Reconstructs physical values as `R + sample * 2^E`.
    pub(crate) fn unpack_values(&self) -> Result<UnpackedValues, GribError> {
        if self.data_flag() & 0xf0 != 0 {
            return Err(GribError::NotSupported(format!(
                "packing with data flag 0x{:02x}",
                self.data_flag() & 0xf0
            )));
        }

        let reference = self.reference_value();
        if self.bits_per_value() == 0 {
            return Ok(UnpackedValues::Constant(reference));
        }

        let factor = 2f64.powi(i32::from(self.binary_scale_factor()));
        let samples = self.raw_samples()?;
        let mut values = Vec::with_capacity(samples.len());
        for sample in samples {
            let sample = sample
                .to_f64()
                .ok_or_else(|| GribError::InvalidValueError("sample out of range".to_owned()))?;
            values.push(reference + sample * factor);
        }
        Ok(UnpackedValues::Points(values))
    }
}
