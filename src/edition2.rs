//! Edition 2 GRIB messages, parsed down to their section structure.
//!
//! Value and coordinate extraction for edition 2 is not implemented;
//! the accessors report that explicitly.

use chrono::{DateTime, Utc};

use crate::error::{BuildError, GribError};
use crate::grid::Grid2D;
use crate::helpers::read_as;
use crate::message::{Section, SectionBytes, create_date_time, impl_section};

macro_rules! section_struct {
    ($(#[$attr:meta])* $name:ident, $min_len:expr) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub(crate) raw: SectionBytes,
        }

        impl $name {
            pub(crate) fn from_bytes(raw: SectionBytes) -> Result<Self, BuildError> {
                if raw.payload.len() < $min_len {
                    return Err(BuildError::SectionSizeTooSmall(raw.payload.len()));
                }
                Ok(Self { raw })
            }

            /// Length of the section in octets (octets 1-4).
            pub fn section_length(&self) -> u32 {
                let payload = &self.raw.payload;
                read_as!(u32, payload, 0)
            }

            /// Number of the section (octet 5).
            #[inline]
            pub fn number_of_section(&self) -> u8 {
                self.raw.payload[4]
            }
        }
    };
}

/// The indicator section (0) of an edition 2 GRIB message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSection {
    pub(crate) raw: SectionBytes,
}

impl IndicatorSection {
    pub(crate) fn from_bytes(raw: SectionBytes) -> Result<Self, BuildError> {
        if raw.payload.len() < 16 {
            return Err(BuildError::SectionSizeTooSmall(raw.payload.len()));
        }
        Ok(Self { raw })
    }

    pub fn identifier(&self) -> &[u8] {
        &self.raw.payload[..4]
    }

    /// Discipline - GRIB Master Table Number (octet 7).
    #[inline]
    pub fn discipline(&self) -> u8 {
        self.raw.payload[6]
    }

    #[inline]
    pub fn edition_number(&self) -> u8 {
        self.raw.payload[7]
    }

    /// Total length of the message in octets, including this section.
    pub fn total_length(&self) -> u64 {
        let payload = &self.raw.payload;
        read_as!(u64, payload, 8)
    }
}

section_struct! {
    /// The identification section (1) of an edition 2 GRIB message.
    IdentificationSection, 21
}

impl IdentificationSection {
    /// Identification of the originating/generating centre (octets 6-7).
    pub fn centre(&self) -> u16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 5)
    }

    pub fn sub_centre(&self) -> u16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 7)
    }

    #[inline]
    pub fn tables_version(&self) -> u8 {
        self.raw.payload[9]
    }

    #[inline]
    pub fn local_tables_version(&self) -> u8 {
        self.raw.payload[10]
    }

    #[inline]
    pub fn significance_of_reference_time(&self) -> u8 {
        self.raw.payload[11]
    }

    pub fn year(&self) -> u16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 12)
    }

    #[inline]
    pub fn month(&self) -> u8 {
        self.raw.payload[14]
    }

    #[inline]
    pub fn day(&self) -> u8 {
        self.raw.payload[15]
    }

    #[inline]
    pub fn hour(&self) -> u8 {
        self.raw.payload[16]
    }

    #[inline]
    pub fn minute(&self) -> u8 {
        self.raw.payload[17]
    }

    #[inline]
    pub fn second(&self) -> u8 {
        self.raw.payload[18]
    }

    #[inline]
    pub fn production_status_of_processed_data(&self) -> u8 {
        self.raw.payload[19]
    }

    #[inline]
    pub fn type_of_processed_data(&self) -> u8 {
        self.raw.payload[20]
    }
}

section_struct! {
    /// The local use section (2) of an edition 2 GRIB message.
    LocalUseSection, 5
}

section_struct! {
    /// The grid description section (3) of an edition 2 GRIB message.
    GridDescriptionSection, 14
}

impl GridDescriptionSection {
    #[inline]
    pub fn source_of_grid_definition(&self) -> u8 {
        self.raw.payload[5]
    }

    pub fn number_of_data_points(&self) -> u32 {
        let payload = &self.raw.payload;
        read_as!(u32, payload, 6)
    }

    #[inline]
    pub fn number_of_octets_for_number_of_points(&self) -> u8 {
        self.raw.payload[10]
    }

    #[inline]
    pub fn interpretation_of_number_of_points(&self) -> u8 {
        self.raw.payload[11]
    }

    pub fn grid_definition_template_number(&self) -> u16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 12)
    }
}

section_struct! {
    /// The product definition section (4) of an edition 2 GRIB message.
    ProductDefinitionSection, 9
}

impl ProductDefinitionSection {
    /// Number of coordinate values after the template (octets 6-7).
    pub fn nv(&self) -> u16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 5)
    }

    pub fn product_definition_template_number(&self) -> u16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 7)
    }
}

section_struct! {
    /// The data representation section (5) of an edition 2 GRIB message.
    DataRepresentationSection, 11
}

impl DataRepresentationSection {
    pub fn number_of_values(&self) -> u32 {
        let payload = &self.raw.payload;
        read_as!(u32, payload, 5)
    }

    pub fn data_representation_template_number(&self) -> u16 {
        let payload = &self.raw.payload;
        read_as!(u16, payload, 9)
    }
}

section_struct! {
    /// The bit-map section (6) of an edition 2 GRIB message.
    BitMapSection, 6
}

impl BitMapSection {
    #[inline]
    pub fn bit_map_indicator(&self) -> u8 {
        self.raw.payload[5]
    }
}

section_struct! {
    /// The data section (7) of an edition 2 GRIB message.
    DataSection, 5
}

/// The end section (8) of an edition 2 GRIB message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndSection {
    pub(crate) raw: SectionBytes,
}

impl EndSection {
    pub fn end_of_message(&self) -> &[u8] {
        &self.raw.payload
    }
}

impl_section! {
    IndicatorSection,
    IdentificationSection,
    LocalUseSection,
    GridDescriptionSection,
    ProductDefinitionSection,
    DataRepresentationSection,
    BitMapSection,
    DataSection,
    EndSection,
}

/// An edition 2 GRIB message.
///
/// The section chain is resolved structurally; sections 2 and 5 are
/// detected by peeking the section-number octet of the candidate.
pub struct Grib2Message {
    buf: Box<[u8]>,
    source: Option<String>,
    indicator: IndicatorSection,
    identification: IdentificationSection,
    local_use: Option<LocalUseSection>,
    grid: GridDescriptionSection,
    product: ProductDefinitionSection,
    data_representation: Option<DataRepresentationSection>,
    bitmap: BitMapSection,
    data: DataSection,
    end: EndSection,
}

fn section_length(buf: &[u8], offset: usize) -> Result<usize, GribError> {
    if offset + 4 > buf.len() {
        return Err(GribError::ParseError(
            crate::error::ParseError::UnexpectedEndOfFile,
        ));
    }
    Ok(read_as!(u32, buf, offset) as usize)
}

fn section_number(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset + 4).copied()
}

impl Grib2Message {
    pub(crate) fn from_bytes(
        buf: Box<[u8]>,
        source: Option<String>,
    ) -> Result<Self, GribError> {
        let indicator = IndicatorSection::from_bytes(SectionBytes::slice(&buf, 0, 16)?)?;
        let mut offset = 16;

        let length = section_length(&buf, offset)?;
        let identification =
            IdentificationSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
        offset += length;

        let local_use = if section_number(&buf, offset) == Some(2) {
            let length = section_length(&buf, offset)?;
            let section = LocalUseSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
            offset += length;
            Some(section)
        } else {
            None
        };

        let length = section_length(&buf, offset)?;
        let grid = GridDescriptionSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
        offset += length;

        let length = section_length(&buf, offset)?;
        let product =
            ProductDefinitionSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
        offset += length;

        let data_representation = if section_number(&buf, offset) == Some(5) {
            let length = section_length(&buf, offset)?;
            let section =
                DataRepresentationSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
            offset += length;
            Some(section)
        } else {
            None
        };

        let length = section_length(&buf, offset)?;
        let bitmap = BitMapSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
        offset += length;

        let length = section_length(&buf, offset)?;
        let data = DataSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
        offset += length;

        let end = EndSection {
            raw: SectionBytes::slice(&buf, offset, 4)?,
        };

        Ok(Self {
            buf,
            source,
            indicator,
            identification,
            local_use,
            grid,
            product,
            data_representation,
            bitmap,
            data,
            end,
        })
    }

    pub fn indicator(&self) -> &IndicatorSection {
        &self.indicator
    }

    pub fn identification(&self) -> &IdentificationSection {
        &self.identification
    }

    pub fn local_use(&self) -> Option<&LocalUseSection> {
        self.local_use.as_ref()
    }

    pub fn grid_description(&self) -> &GridDescriptionSection {
        &self.grid
    }

    pub fn product_definition(&self) -> &ProductDefinitionSection {
        &self.product
    }

    pub fn data_representation(&self) -> Option<&DataRepresentationSection> {
        self.data_representation.as_ref()
    }

    pub fn bit_map(&self) -> &BitMapSection {
        &self.bitmap
    }

    pub fn data_section(&self) -> &DataSection {
        &self.data
    }

    pub fn end_section(&self) -> &EndSection {
        &self.end
    }

    /// The reference time of the message.
    pub fn time(&self) -> Result<DateTime<Utc>, GribError> {
        let ids = &self.identification;
        create_date_time(
            ids.year().into(),
            ids.month().into(),
            ids.day().into(),
            ids.hour().into(),
            ids.minute().into(),
            ids.second().into(),
        )
        .ok_or_else(|| {
            GribError::InvalidValueError(format!(
                "invalid reference time {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                ids.year(),
                ids.month(),
                ids.day(),
                ids.hour(),
                ids.minute(),
                ids.second()
            ))
        })
    }

    pub fn coordinates(&self) -> Result<(Grid2D<f64>, Grid2D<f64>), GribError> {
        Err(GribError::NotSupported(
            "coordinate unpacking for edition 2 messages".to_owned(),
        ))
    }

    pub fn values(&self) -> Result<Grid2D<f64>, GribError> {
        Err(GribError::NotSupported(
            "value unpacking for edition 2 messages".to_owned(),
        ))
    }

    pub fn section(&self, index: usize) -> Option<&dyn Section> {
        match index {
            0 => Some(&self.indicator as &dyn Section),
            1 => Some(&self.identification as &dyn Section),
            2 => self.local_use.as_ref().map(|s| s as &dyn Section),
            3 => Some(&self.grid as &dyn Section),
            4 => Some(&self.product as &dyn Section),
            5 => self.data_representation.as_ref().map(|s| s as &dyn Section),
            6 => Some(&self.bitmap as &dyn Section),
            7 => Some(&self.data as &dyn Section),
            8 => Some(&self.end as &dyn Section),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}
