//! Builders for synthetic GRIB messages used by the integration tests.
#![allow(dead_code)]

/// Encodes a signed-magnitude 16-bit integer.
pub fn i16_sm(value: i16) -> [u8; 2] {
    let magnitude = value.unsigned_abs();
    let mut bytes = magnitude.to_be_bytes();
    if value < 0 {
        bytes[0] |= 0x80;
    }
    bytes
}

/// Encodes a signed-magnitude 24-bit integer.
pub fn i24_sm(value: i32) -> [u8; 3] {
    let magnitude = value.unsigned_abs();
    let mut bytes = [
        ((magnitude >> 16) & 0x7f) as u8,
        (magnitude >> 8) as u8,
        magnitude as u8,
    ];
    if value < 0 {
        bytes[0] |= 0x80;
    }
    bytes
}

/// Encodes an unsigned 24-bit integer.
pub fn u24(value: u32) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// The GRIB 1 encoding of 8.0: sign 0, exponent 65, significand 2^23.
pub const REF_EIGHT: [u8; 4] = [0x41, 0x80, 0x00, 0x00];
/// The GRIB 1 encoding of 0.0.
pub const REF_ZERO: [u8; 4] = [0x00, 0x00, 0x00, 0x00];

pub struct GridSpec {
    pub representation: u8,
    pub ni: u16,
    pub nj: u16,
    pub lat_first: i32,
    pub lon_first: i32,
    pub lat_last: i32,
    pub lon_last: i32,
    pub scanning_mode: u8,
    pub rotated_pole: Option<(i32, i32, [u8; 4])>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            representation: 0,
            ni: 2,
            nj: 2,
            lat_first: 60_000,
            lon_first: -10_000,
            lat_last: 50_000,
            lon_last: 10_000,
            scanning_mode: 0x00,
            rotated_pole: None,
        }
    }
}

pub struct BitmapSpec {
    pub unused_bits: u8,
    pub octets: Vec<u8>,
}

pub struct Grib1Builder {
    pub centre: u8,
    pub sub_centre: u8,
    pub parameter: u8,
    pub level_type: u8,
    pub level: [u8; 2],
    pub year_of_century: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub century: u8,
    pub decimal_scale_factor: i16,
    pub grid: Option<GridSpec>,
    pub bitmap: Option<BitmapSpec>,
    pub data_flag: u8,
    pub binary_scale_factor: i16,
    pub reference_value: [u8; 4],
    pub bits_per_value: u8,
    pub data: Vec<u8>,
    /// `Some(log_transform)` builds a 72-octet MATCH v1.0 product
    /// definition section (centre 82, sub-centre 0, local definition 2).
    pub match_v1: Option<u8>,
    pub trailer: [u8; 4],
}

impl Default for Grib1Builder {
    fn default() -> Self {
        Self {
            centre: 98,
            sub_centre: 0,
            parameter: 61,
            level_type: 105,
            level: [0, 0],
            year_of_century: 20,
            month: 6,
            day: 1,
            hour: 12,
            minute: 30,
            century: 21,
            decimal_scale_factor: 0,
            grid: Some(GridSpec::default()),
            bitmap: None,
            data_flag: 0x00,
            binary_scale_factor: 0,
            reference_value: REF_ZERO,
            bits_per_value: 8,
            data: vec![1, 2, 3, 4],
            match_v1: None,
            trailer: *b"7777",
        }
    }
}

impl Grib1Builder {
    pub fn build(&self) -> Vec<u8> {
        let pds_len = if self.match_v1.is_some() { 72 } else { 28 };
        let mut pds = vec![0u8; pds_len];
        pds[..3].copy_from_slice(&u24(pds_len as u32));
        pds[3] = 128;
        pds[4] = if self.match_v1.is_some() { 82 } else { self.centre };
        pds[5] = 1;
        pds[6] = 255;
        pds[7] = (if self.grid.is_some() { 0x80 } else { 0 })
            | (if self.bitmap.is_some() { 0x40 } else { 0 });
        pds[8] = self.parameter;
        pds[9] = self.level_type;
        pds[10..12].copy_from_slice(&self.level);
        pds[12] = self.year_of_century;
        pds[13] = self.month;
        pds[14] = self.day;
        pds[15] = self.hour;
        pds[16] = self.minute;
        pds[17] = 1;
        pds[24] = self.century;
        pds[25] = if self.match_v1.is_some() { 0 } else { self.sub_centre };
        pds[26..28].copy_from_slice(&i16_sm(self.decimal_scale_factor));
        if let Some(log_transform) = self.match_v1 {
            pds[40] = 2;
            pds[49] = log_transform;
        }

        let gds = self.grid.as_ref().map(|grid| {
            let gds_len = if grid.rotated_pole.is_some() { 42 } else { 28 };
            let mut gds = vec![0u8; gds_len];
            gds[..3].copy_from_slice(&u24(gds_len as u32));
            gds[4] = 255;
            gds[5] = grid.representation;
            gds[6..8].copy_from_slice(&grid.ni.to_be_bytes());
            gds[8..10].copy_from_slice(&grid.nj.to_be_bytes());
            gds[10..13].copy_from_slice(&i24_sm(grid.lat_first));
            gds[13..16].copy_from_slice(&i24_sm(grid.lon_first));
            gds[16] = 0x80;
            gds[17..20].copy_from_slice(&i24_sm(grid.lat_last));
            gds[20..23].copy_from_slice(&i24_sm(grid.lon_last));
            gds[27] = grid.scanning_mode;
            if let Some((pole_lat, pole_lon, angle)) = grid.rotated_pole {
                gds[32..35].copy_from_slice(&i24_sm(pole_lat));
                gds[35..38].copy_from_slice(&i24_sm(pole_lon));
                gds[38..42].copy_from_slice(&angle);
            }
            gds
        });

        let bitmap = self.bitmap.as_ref().map(|bitmap| {
            let mut section = Vec::with_capacity(6 + bitmap.octets.len());
            section.extend_from_slice(&u24(6 + bitmap.octets.len() as u32));
            section.push(bitmap.unused_bits);
            section.extend_from_slice(&[0, 0]);
            section.extend_from_slice(&bitmap.octets);
            section
        });

        let mut bds = Vec::with_capacity(11 + self.data.len());
        bds.extend_from_slice(&u24(11 + self.data.len() as u32));
        bds.push(self.data_flag);
        bds.extend_from_slice(&i16_sm(self.binary_scale_factor));
        bds.extend_from_slice(&self.reference_value);
        bds.push(self.bits_per_value);
        bds.extend_from_slice(&self.data);

        let total = 8
            + pds.len()
            + gds.as_ref().map_or(0, Vec::len)
            + bitmap.as_ref().map_or(0, Vec::len)
            + bds.len()
            + 4;

        let mut message = Vec::with_capacity(total);
        message.extend_from_slice(b"GRIB");
        message.extend_from_slice(&u24(total as u32));
        message.push(1);
        message.extend_from_slice(&pds);
        if let Some(gds) = gds {
            message.extend_from_slice(&gds);
        }
        if let Some(bitmap) = bitmap {
            message.extend_from_slice(&bitmap);
        }
        message.extend_from_slice(&bds);
        message.extend_from_slice(&self.trailer);
        message
    }
}

/// Builds a structurally complete edition 2 message with four data
/// points and no decodable payload.
pub fn grib2_message(
    with_local_use: bool,
    with_data_representation: bool,
    time: (u16, u8, u8, u8, u8, u8),
) -> Vec<u8> {
    let (year, month, day, hour, minute, second) = time;

    let mut sect1 = vec![0u8; 21];
    sect1[..4].copy_from_slice(&21u32.to_be_bytes());
    sect1[4] = 1;
    sect1[5..7].copy_from_slice(&98u16.to_be_bytes());
    sect1[9] = 2;
    sect1[11] = 1;
    sect1[12..14].copy_from_slice(&year.to_be_bytes());
    sect1[14] = month;
    sect1[15] = day;
    sect1[16] = hour;
    sect1[17] = minute;
    sect1[18] = second;
    sect1[20] = 1;

    let sect2 = with_local_use.then(|| {
        let mut sect2 = vec![0u8; 8];
        sect2[..4].copy_from_slice(&8u32.to_be_bytes());
        sect2[4] = 2;
        sect2[5..8].copy_from_slice(b"loc");
        sect2
    });

    let mut sect3 = vec![0u8; 14];
    sect3[..4].copy_from_slice(&14u32.to_be_bytes());
    sect3[4] = 3;
    sect3[6..10].copy_from_slice(&4u32.to_be_bytes());

    let mut sect4 = vec![0u8; 9];
    sect4[..4].copy_from_slice(&9u32.to_be_bytes());
    sect4[4] = 4;

    let sect5 = with_data_representation.then(|| {
        let mut sect5 = vec![0u8; 11];
        sect5[..4].copy_from_slice(&11u32.to_be_bytes());
        sect5[4] = 5;
        sect5[5..9].copy_from_slice(&4u32.to_be_bytes());
        sect5
    });

    let mut sect6 = vec![0u8; 6];
    sect6[..4].copy_from_slice(&6u32.to_be_bytes());
    sect6[4] = 6;
    sect6[5] = 255;

    let mut sect7 = vec![0u8; 5];
    sect7[..4].copy_from_slice(&5u32.to_be_bytes());
    sect7[4] = 7;

    let total = 16
        + sect1.len()
        + sect2.as_ref().map_or(0, Vec::len)
        + sect3.len()
        + sect4.len()
        + sect5.as_ref().map_or(0, Vec::len)
        + sect6.len()
        + sect7.len()
        + 4;

    let mut message = Vec::with_capacity(total);
    message.extend_from_slice(b"GRIB");
    message.extend_from_slice(&[0, 0]);
    message.push(0);
    message.push(2);
    message.extend_from_slice(&(total as u64).to_be_bytes());
    message.extend_from_slice(&sect1);
    if let Some(sect2) = sect2 {
        message.extend_from_slice(&sect2);
    }
    message.extend_from_slice(&sect3);
    message.extend_from_slice(&sect4);
    if let Some(sect5) = sect5 {
        message.extend_from_slice(&sect5);
    }
    message.extend_from_slice(&sect6);
    message.extend_from_slice(&sect7);
    message.extend_from_slice(b"7777");
    message
}
