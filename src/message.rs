use chrono::{DateTime, TimeZone, Utc};

use crate::edition1::Grib1Message;
use crate::edition2::Grib2Message;
use crate::error::{BuildError, DecodeError, GribError};
use crate::grid::{AreaBounds, Grid2D};

/// A bounded, owned view of one section of a message buffer.
///
/// `payload` holds the complete section octets, so a field located at
/// 1-based octet `n` by the GRIB tables lives at `payload[n - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SectionBytes {
    pub(crate) offset: usize,
    pub(crate) payload: Box<[u8]>,
}

impl SectionBytes {
    pub(crate) fn slice(buf: &[u8], offset: usize, length: usize) -> Result<Self, BuildError> {
        let end = offset
            .checked_add(length)
            .ok_or(BuildError::SectionOutOfBounds(offset))?;
        if end > buf.len() {
            return Err(BuildError::SectionOutOfBounds(offset));
        }
        Ok(Self {
            offset,
            payload: buf[offset..end].to_vec().into_boxed_slice(),
        })
    }
}

/// Common read-only access to a section of a GRIB message.
pub trait Section {
    /// Octet offset of the section within its message.
    fn offset(&self) -> usize;

    /// Length of the section in octets.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw octets of the section.
    fn octets(&self) -> &[u8];
}

macro_rules! impl_section {
    ($($ty:ty,)*) => ($(
        impl $crate::message::Section for $ty {
            fn offset(&self) -> usize {
                self.raw.offset
            }

            fn len(&self) -> usize {
                self.raw.payload.len()
            }

            fn octets(&self) -> &[u8] {
                &self.raw.payload
            }
        }
    )*);
}
pub(crate) use impl_section;

/// A single self-contained GRIB message.
///
/// Messages are produced by [`read`](crate::read) and own their byte
/// buffer; sections are views into it and never outlive the message.
pub enum Message {
    Edition1(Grib1Message),
    Edition2(Grib2Message),
}

impl Message {
    /// The GRIB edition number of the message, 1 or 2.
    pub fn edition(&self) -> u8 {
        match self {
            Self::Edition1(_) => 1,
            Self::Edition2(_) => 2,
        }
    }

    /// The reference time of the message.
    pub fn time(&self) -> Result<DateTime<Utc>, GribError> {
        match self {
            Self::Edition1(message) => message.time(),
            Self::Edition2(message) => message.time(),
        }
    }

    /// The longitudes and latitudes of the grid points, as two grids of
    /// shape `(nj, ni)` in degrees.
    pub fn coordinates(&self) -> Result<(Grid2D<f64>, Grid2D<f64>), GribError> {
        match self {
            Self::Edition1(message) => message.coordinates(),
            Self::Edition2(message) => message.coordinates(),
        }
    }

    /// The decoded data values in geographic order, missing points set to
    /// `f64::NAN`.
    pub fn values(&self) -> Result<Grid2D<f64>, GribError> {
        match self {
            Self::Edition1(message) => message.values(),
            Self::Edition2(message) => message.values(),
        }
    }

    /// The decoded, non-missing values whose grid point falls inside
    /// `area`.
    pub fn values_in_area(&self, area: &AreaBounds) -> Result<Vec<f64>, GribError> {
        let (longitudes, latitudes) = self.coordinates()?;
        let values = self.values()?;
        if values.shape() != longitudes.shape() {
            return Err(DecodeError::LengthMismatch.into());
        }

        let points = values
            .values()
            .iter()
            .zip(longitudes.values())
            .zip(latitudes.values());
        let mut selected = Vec::new();
        for ((&value, &lon), &lat) in points {
            if !value.is_nan() && area.contains(lon, lat) {
                selected.push(value);
            }
        }
        Ok(selected)
    }

    /// Returns the section with the given index, or `None` when the index
    /// is valid for the edition but the section is not present.
    pub fn section(&self, index: usize) -> Option<&dyn Section> {
        match self {
            Self::Edition1(message) => message.section(index),
            Self::Edition2(message) => message.section(index),
        }
    }

    /// The raw octets of the whole message.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Edition1(message) => message.as_bytes(),
            Self::Edition2(message) => message.as_bytes(),
        }
    }

    /// The path the message was read from, when known.
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Edition1(message) => message.source(),
            Self::Edition2(message) => message.source(),
        }
    }
}

pub(crate) fn create_date_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
}
