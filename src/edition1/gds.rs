use std::mem;

use num_enum::TryFromPrimitive;

use crate::error::{BuildError, DecodeError, GribError};
use crate::grid::{Grid2D, ScanningMode, evenly_spaced};
use crate::helpers::{grib1_float_from_bytes, grib_int_from_bytes, read_as, read_u24};
use crate::message::SectionBytes;

use super::bds::UnpackedValues;

/// Data representation types this crate can decode (GRIB 1, table 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum DataRepresentationType {
    LatitudeLongitude = 0,
    RotatedLatitudeLongitude = 10,
}

/// The grid description section (2) of an edition 1 GRIB message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDescriptionSection {
    pub(crate) raw: SectionBytes,
    representation: Option<DataRepresentationType>,
}

impl GridDescriptionSection {
    pub(crate) fn from_bytes(raw: SectionBytes) -> Result<Self, BuildError> {
        if raw.payload.len() < 6 {
            return Err(BuildError::SectionSizeTooSmall(raw.payload.len()));
        }

        let representation = DataRepresentationType::try_from(raw.payload[5]).ok();
        let min_len = match representation {
            Some(DataRepresentationType::LatitudeLongitude) => 28,
            Some(DataRepresentationType::RotatedLatitudeLongitude) => 42,
            None => 6,
        };
        if raw.payload.len() < min_len {
            return Err(BuildError::SectionSizeTooSmall(raw.payload.len()));
        }
        Ok(Self {
            raw,
            representation,
        })
    }

    pub fn section2_length(&self) -> u32 {
        read_u24(&self.raw.payload, 0)
    }

    #[inline]
    pub fn number_of_vertical_coordinate_values(&self) -> u8 {
        self.raw.payload[3]
    }

    #[inline]
    pub fn pvl_location(&self) -> u8 {
        self.raw.payload[4]
    }

    /// Data representation type (octet 6, code table 6).
    #[inline]
    pub fn data_representation_type(&self) -> u8 {
        self.raw.payload[5]
    }

    /// The representation type, when it is one this crate understands.
    pub fn representation(&self) -> Option<DataRepresentationType> {
        self.representation
    }

    /// The latitude/longitude grid parameters, for both the plain and the
    /// rotated representation.
    pub fn grid_definition(&self) -> Option<LatLonGridDefinition> {
        self.representation
            .map(|_| LatLonGridDefinition::from_payload(&self.raw.payload))
    }

    /// The pole of rotation, for the rotated representation only.
    pub fn rotated_pole(&self) -> Option<RotatedPole> {
        match self.representation {
            Some(DataRepresentationType::RotatedLatitudeLongitude) => {
                let payload = &self.raw.payload;
                Some(RotatedPole {
                    southern_pole_lat: grib_int_from_bytes(&payload[32..35]),
                    southern_pole_lon: grib_int_from_bytes(&payload[35..38]),
                    angle_of_rotation: grib1_float_from_bytes(payload, 38),
                })
            }
            _ => None,
        }
    }

    fn unsupported(&self) -> GribError {
        GribError::NotSupported(format!(
            "grids with data representation type {}",
            self.data_representation_type()
        ))
    }

    pub(crate) fn latlons(&self) -> Result<(Grid2D<f64>, Grid2D<f64>), GribError> {
        match self.grid_definition() {
            Some(definition) => Ok(definition.latlons()),
            None => Err(self.unsupported()),
        }
    }

    pub(crate) fn order_values(&self, values: UnpackedValues) -> Result<Grid2D<f64>, GribError> {
        match self.grid_definition() {
            Some(definition) => definition.order_values(values),
            // Unknown representations pass the values through unordered.
            None => Ok(values.into_flat_grid()),
        }
    }
}

/// Grid parameters of a (possibly rotated) latitude/longitude grid.
///
/// First/last coordinates are in millidegrees, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatLonGridDefinition {
    pub ni: u16,
    pub nj: u16,
    pub first_point_lat: i32,
    pub first_point_lon: i32,
    pub resolution_and_component_flags: u8,
    pub last_point_lat: i32,
    pub last_point_lon: i32,
    pub i_direction_increment: u16,
    pub j_direction_increment: u16,
    pub scanning_mode: ScanningMode,
}

impl LatLonGridDefinition {
    pub(crate) fn from_payload(payload: &[u8]) -> Self {
        Self {
            ni: read_as!(u16, payload, 6),
            nj: read_as!(u16, payload, 8),
            first_point_lat: grib_int_from_bytes(&payload[10..13]),
            first_point_lon: grib_int_from_bytes(&payload[13..16]),
            resolution_and_component_flags: payload[16],
            last_point_lat: grib_int_from_bytes(&payload[17..20]),
            last_point_lon: grib_int_from_bytes(&payload[20..23]),
            i_direction_increment: read_as!(u16, payload, 23),
            j_direction_increment: read_as!(u16, payload, 25),
            scanning_mode: ScanningMode(payload[27]),
        }
    }

    /// Returns the shape of the grid as `(nj, ni)`.
    pub fn grid_shape(&self) -> (usize, usize) {
        (usize::from(self.nj), usize::from(self.ni))
    }

    /// Longitudes and latitudes of the grid points in degrees, as two
    /// grids of shape `(nj, ni)`.
    pub fn latlons(&self) -> (Grid2D<f64>, Grid2D<f64>) {
        let (nj, ni) = self.grid_shape();

        let mut lon0 = 1e-3 * f64::from(self.first_point_lon);
        let mut lon1 = 1e-3 * f64::from(self.last_point_lon);
        if !self.scanning_mode.scans_positively_for_i() {
            mem::swap(&mut lon0, &mut lon1);
        }
        let longitudes = evenly_spaced(lon0, lon1, ni);

        let mut lat0 = 1e-3 * f64::from(self.first_point_lat);
        let mut lat1 = 1e-3 * f64::from(self.last_point_lat);
        if self.scanning_mode.scans_positively_for_j() {
            mem::swap(&mut lat0, &mut lat1);
        }
        let latitudes = evenly_spaced(lat0, lat1, nj);

        let mut lon_grid = Vec::with_capacity(ni * nj);
        let mut lat_grid = Vec::with_capacity(ni * nj);
        for lat in &latitudes {
            for lon in &longitudes {
                lon_grid.push(*lon);
                lat_grid.push(*lat);
            }
        }
        (
            Grid2D::new(lon_grid, (nj, ni)),
            Grid2D::new(lat_grid, (nj, ni)),
        )
    }

    /// Reorders a flat array of unpacked values (or broadcasts a
    /// constant) into geographic order with shape `(nj, ni)`.
    pub(crate) fn order_values(&self, values: UnpackedValues) -> Result<Grid2D<f64>, GribError> {
        let (nj, ni) = self.grid_shape();
        let mut flat = match values {
            UnpackedValues::Constant(value) => vec![value; ni * nj],
            UnpackedValues::Points(values) => values,
        };
        if flat.len() != ni * nj {
            return Err(DecodeError::LengthMismatch.into());
        }

        let mode = self.scanning_mode;
        if mode.is_consecutive_for_i() {
            if !mode.scans_positively_for_i() {
                flat.reverse();
            }
            let mut grid = Grid2D::new(flat, (nj, ni));
            if mode.scans_positively_for_j() {
                grid.flip_rows();
            }
            Ok(grid)
        } else {
            if mode.scans_positively_for_j() {
                flat.reverse();
            }
            // i varies slowest in the packed order here.
            let mut grid = Grid2D::new(flat, (ni, nj));
            if !mode.scans_positively_for_i() {
                grid.flip_columns();
            }
            Ok(grid.transposed())
        }
    }
}

/// The pole of rotation of a rotated latitude/longitude grid, in
/// millidegrees and degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedPole {
    pub southern_pole_lat: i32,
    pub southern_pole_lon: i32,
    pub angle_of_rotation: f64,
}
