use crate::error::BuildError;
use crate::helpers::{GribInt, read_as, read_u24};
use crate::message::SectionBytes;

use super::bds::UnpackedValues;

/// Level types whose level octets carry two 8-bit values instead of one
/// 16-bit value.
const SPLIT_LEVEL_TYPES: [u8; 12] = [101, 104, 106, 108, 110, 112, 114, 116, 120, 121, 128, 141];

/// Height, pressure, etc. of the level a product applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Single(u16),
    Layer(u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProductKind {
    Base,
    Local,
    MatchV1,
}

/// The product definition section (1) of an edition 1 GRIB message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDefinitionSection {
    pub(crate) raw: SectionBytes,
    kind: ProductKind,
}

impl ProductDefinitionSection {
    pub(crate) fn from_bytes(raw: SectionBytes) -> Result<Self, BuildError> {
        if raw.payload.len() < 28 {
            return Err(BuildError::SectionSizeTooSmall(raw.payload.len()));
        }

        let mut section = Self {
            raw,
            kind: ProductKind::Base,
        };
        if section.raw.payload.len() > 40 {
            section.kind = ProductKind::Local;
            let discriminator = (
                section.centre(),
                section.sub_centre(),
                section.local_definition_number(),
            );
            if discriminator == (82, 0, Some(2)) && section.raw.payload.len() >= 70 {
                section.kind = ProductKind::MatchV1;
            }
        }
        Ok(section)
    }

    pub fn section1_length(&self) -> u32 {
        read_u24(&self.raw.payload, 0)
    }

    /// Parameter table version number (octet 4).
    #[inline]
    pub fn table2_version(&self) -> u8 {
        self.raw.payload[3]
    }

    /// Identification of the originating/generating centre (octet 5).
    #[inline]
    pub fn centre(&self) -> u8 {
        self.raw.payload[4]
    }

    #[inline]
    pub fn generating_process_identifier(&self) -> u8 {
        self.raw.payload[5]
    }

    #[inline]
    pub fn grid_definition(&self) -> u8 {
        self.raw.payload[6]
    }

    /// Presence flags for the grid description (0x80) and bit-map (0x40)
    /// sections (octet 8).
    #[inline]
    pub fn section1_flags(&self) -> u8 {
        self.raw.payload[7]
    }

    #[inline]
    pub fn indicator_of_parameter(&self) -> u8 {
        self.raw.payload[8]
    }

    #[inline]
    pub fn indicator_of_type_of_level(&self) -> u8 {
        self.raw.payload[9]
    }

    /// The level value (octets 11-12), split into two octets for the
    /// layer-type levels of the GRIB tables.
    pub fn level(&self) -> Level {
        let payload = &self.raw.payload;
        if SPLIT_LEVEL_TYPES.contains(&self.indicator_of_type_of_level()) {
            Level::Layer(payload[10], payload[11])
        } else {
            Level::Single(read_as!(u16, payload, 10))
        }
    }

    #[inline]
    pub fn year_of_century(&self) -> u8 {
        self.raw.payload[12]
    }

    #[inline]
    pub fn month(&self) -> u8 {
        self.raw.payload[13]
    }

    #[inline]
    pub fn day(&self) -> u8 {
        self.raw.payload[14]
    }

    #[inline]
    pub fn hour(&self) -> u8 {
        self.raw.payload[15]
    }

    #[inline]
    pub fn minute(&self) -> u8 {
        self.raw.payload[16]
    }

    #[inline]
    pub fn unit_of_time_range(&self) -> u8 {
        self.raw.payload[17]
    }

    #[inline]
    pub fn p1(&self) -> u8 {
        self.raw.payload[18]
    }

    #[inline]
    pub fn p2(&self) -> u8 {
        self.raw.payload[19]
    }

    #[inline]
    pub fn time_range_indicator(&self) -> u8 {
        self.raw.payload[20]
    }

    pub fn number_included_in_average(&self) -> u16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 21)
    }

    #[inline]
    pub fn number_missing_from_averages(&self) -> u8 {
        self.raw.payload[23]
    }

    /// Century of the reference time (octet 25); 20 covers 1901-2000.
    #[inline]
    pub fn century_of_reference_time(&self) -> u8 {
        self.raw.payload[24]
    }

    #[inline]
    pub fn sub_centre(&self) -> u8 {
        self.raw.payload[25]
    }

    /// Decimal scale factor D (octet 27); decoded values are multiplied
    /// by `10^-D`.
    pub fn decimal_scale_factor(&self) -> i16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 26).as_grib_int()
    }

    /// Local definition number (octet 41), present when the section
    /// extends past the 40 standard octets.
    pub fn local_definition_number(&self) -> Option<u8> {
        if self.kind == ProductKind::Base {
            None
        } else {
            Some(self.raw.payload[40])
        }
    }

    fn match_octet(&self, offset: usize) -> Option<u8> {
        if self.kind == ProductKind::MatchV1 {
            Some(self.raw.payload[offset])
        } else {
            None
        }
    }

    fn match_u16(&self, offset: usize) -> Option<u16> {
        if self.kind == ProductKind::MatchV1 {
            let payload = &self.raw.payload;
            Some(read_as!(u16, payload, offset))
        } else {
            None
        }
    }

    pub fn generating_process(&self) -> Option<u8> {
        self.match_octet(41)
    }

    pub fn sort(&self) -> Option<u8> {
        self.match_octet(42)
    }

    pub fn time_repres(&self) -> Option<u8> {
        self.match_octet(43)
    }

    pub fn land_type(&self) -> Option<u8> {
        self.match_octet(44)
    }

    pub fn supl_scale(&self) -> Option<i16> {
        self.match_u16(45).map(|v| v.as_grib_int())
    }

    pub fn molar_mass(&self) -> Option<u16> {
        self.match_u16(47)
    }

    /// Nonzero when the packed values are natural logarithms (a MATCH
    /// v1.0 local extension).
    pub fn log_transform(&self) -> Option<u8> {
        self.match_octet(49)
    }

    pub fn threshold(&self) -> Option<i16> {
        self.match_u16(50).map(|v| v.as_grib_int())
    }

    pub fn total_size_classes(&self) -> Option<u8> {
        self.match_octet(59)
    }

    pub fn size_class_number(&self) -> Option<u8> {
        self.match_octet(60)
    }

    pub fn integer_scale_factor(&self) -> Option<i8> {
        self.match_octet(61).map(|v| v.as_grib_int())
    }

    pub fn lower_range(&self) -> Option<u16> {
        self.match_u16(62)
    }

    pub fn upper_range(&self) -> Option<u16> {
        self.match_u16(64)
    }

    pub fn mean_size(&self) -> Option<u16> {
        self.match_u16(66)
    }

    pub fn stdv(&self) -> Option<u16> {
        self.match_u16(68)
    }

    /// Applies the decimal scale factor, and for MATCH v1.0 products with
    /// a log transform, the inverse transform.
    pub(crate) fn scale_values(&self, values: UnpackedValues) -> UnpackedValues {
        let factor = 10f64.powi(-i32::from(self.decimal_scale_factor()));
        let log_transformed = self.log_transform().is_some_and(|t| t != 0);
        let scale = |value: f64| {
            let value = value * factor;
            if log_transformed { value.exp() } else { value }
        };

        match values {
            UnpackedValues::Constant(value) => UnpackedValues::Constant(scale(value)),
            UnpackedValues::Points(values) => {
                UnpackedValues::Points(values.into_iter().map(scale).collect())
            }
        }
    }
}
