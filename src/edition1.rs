//! Edition 1 GRIB messages.

use chrono::{DateTime, Utc};

use crate::error::GribError;
use crate::grid::Grid2D;
use crate::helpers::read_u24;
use crate::message::{Section, SectionBytes, create_date_time, impl_section};

mod bds;
mod bitmap;
mod gds;
mod pds;

pub(crate) use bds::UnpackedValues;
pub use bds::BinaryDataSection;
pub use bitmap::BitMapSection;
pub use gds::{DataRepresentationType, GridDescriptionSection, LatLonGridDefinition, RotatedPole};
pub use pds::{Level, ProductDefinitionSection};

/// The indicator section (0) of an edition 1 GRIB message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSection {
    pub(crate) raw: SectionBytes,
}

impl IndicatorSection {
    pub fn identifier(&self) -> &[u8] {
        &self.raw.payload[..4]
    }

    /// Total length of the message in octets, including this section.
    pub fn total_length(&self) -> u32 {
        read_u24(&self.raw.payload, 4)
    }

    #[inline]
    pub fn edition_number(&self) -> u8 {
        self.raw.payload[7]
    }
}

/// The end section (5) of an edition 1 GRIB message.
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
    ProductDefinitionSection,
    GridDescriptionSection,
    BitMapSection,
    BinaryDataSection,
    EndSection,
}

/// An edition 1 GRIB message.
///
/// Sections 2 (grid description) and 3 (bit-map) are optional and gated
/// by the flag octet of the product definition section.
pub struct Grib1Message {
    buf: Box<[u8]>,
    source: Option<String>,
    indicator: IndicatorSection,
    product: ProductDefinitionSection,
    grid: Option<GridDescriptionSection>,
    bitmap: Option<BitMapSection>,
    binary: BinaryDataSection,
    end: EndSection,
}

fn section_length(buf: &[u8], offset: usize) -> Result<usize, GribError> {
    if offset + 3 > buf.len() {
        return Err(GribError::ParseError(
            crate::error::ParseError::UnexpectedEndOfFile,
        ));
    }
    Ok(read_u24(buf, offset) as usize)
}

impl Grib1Message {
    pub(crate) fn from_bytes(
        buf: Box<[u8]>,
        source: Option<String>,
    ) -> Result<Self, GribError> {
        let indicator = IndicatorSection {
            raw: SectionBytes::slice(&buf, 0, 8)?,
        };
        let mut offset = 8;

        let length = section_length(&buf, offset)?;
        let product = ProductDefinitionSection::from_bytes(SectionBytes::slice(
            &buf, offset, length,
        )?)?;
        offset += length;

        let flags = product.section1_flags();
        let grid = if flags & 0x80 != 0 {
            let length = section_length(&buf, offset)?;
            let section =
                GridDescriptionSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
            offset += length;
            Some(section)
        } else {
            None
        };

        let bitmap = if flags & 0x40 != 0 {
            let length = section_length(&buf, offset)?;
            let section = BitMapSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
            offset += length;
            Some(section)
        } else {
            None
        };

        let length = section_length(&buf, offset)?;
        let binary = BinaryDataSection::from_bytes(SectionBytes::slice(&buf, offset, length)?)?;
        offset += length;

        let end = EndSection {
            raw: SectionBytes::slice(&buf, offset, 4)?,
        };

        Ok(Self {
            buf,
            source,
            indicator,
            product,
            grid,
            bitmap,
            binary,
            end,
        })
    }

    pub fn indicator(&self) -> &IndicatorSection {
        &self.indicator
    }

    pub fn product_definition(&self) -> &ProductDefinitionSection {
        &self.product
    }

    pub fn grid_description(&self) -> Option<&GridDescriptionSection> {
        self.grid.as_ref()
    }

    pub fn bit_map(&self) -> Option<&BitMapSection> {
        self.bitmap.as_ref()
    }

    pub fn binary_data(&self) -> &BinaryDataSection {
        &self.binary
    }

    pub fn end_section(&self) -> &EndSection {
        &self.end
    }

    /// The reference time of the message.
    ///
    /// The stored year is split into a century and a year of century in
    /// 1-100 form; seconds do not exist in edition 1.
    pub fn time(&self) -> Result<DateTime<Utc>, GribError> {
        let pds = &self.product;
        let century = i32::from(pds.century_of_reference_time());
        let year = if pds.year_of_century() == 100 {
            century * 100
        } else {
            (century - 1) * 100 + i32::from(pds.year_of_century())
        };
        create_date_time(
            year,
            pds.month().into(),
            pds.day().into(),
            pds.hour().into(),
            pds.minute().into(),
            0,
        )
        .ok_or_else(|| {
            GribError::InvalidValueError(format!(
                "invalid reference time {year:04}-{:02}-{:02} {:02}:{:02}",
                pds.month(),
                pds.day(),
                pds.hour(),
                pds.minute()
            ))
        })
    }

    /// The longitudes and latitudes of the grid points.
    pub fn coordinates(&self) -> Result<(Grid2D<f64>, Grid2D<f64>), GribError> {
        match &self.grid {
            Some(grid) => grid.latlons(),
            None => Err(GribError::NotSupported("catalogued grids".to_owned())),
        }
    }

    /// The decoded data values in geographic order.
    ///
    /// Samples are unpacked, scaled, scattered over the bit-map when one
    /// is present, and reordered per the scanning mode. Missing points
    /// are `f64::NAN`.
    pub fn values(&self) -> Result<Grid2D<f64>, GribError> {
        let unpacked = self.binary.unpack_values()?;
        let scaled = self.product.scale_values(unpacked);
        let masked = match &self.bitmap {
            Some(bitmap) => UnpackedValues::Points(bitmap.apply_mask(scaled)?),
            None => scaled,
        };
        match &self.grid {
            Some(grid) => grid.order_values(masked),
            None => Ok(masked.into_flat_grid()),
        }
    }

    pub fn section(&self, index: usize) -> Option<&dyn Section> {
        match index {
            0 => Some(&self.indicator as &dyn Section),
            1 => Some(&self.product as &dyn Section),
            2 => self.grid.as_ref().map(|s| s as &dyn Section),
            3 => self.bitmap.as_ref().map(|s| s as &dyn Section),
            4 => Some(&self.binary as &dyn Section),
            5 => Some(&self.end as &dyn Section),
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
