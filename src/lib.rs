//! A light-weight reader for files in the WMO GRIB format.
//!
//! [`read`] frames GRIB messages out of any seekable byte stream and
//! yields them lazily. Edition 1 messages with simple grid-point packing
//! on (optionally rotated) latitude/longitude grids decode fully into
//! reference times, coordinate grids and value grids; edition 2 messages
//! parse down to their section structure. Everything else fails with an
//! explicit error instead of producing wrong numbers.
//!
//! ```no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let f = std::fs::File::open("total_precipitation.grib")?;
//!     for message in rugrib::read(f) {
//!         let message = message?;
//!         println!("reference time: {}", message.time()?);
//!
//!         let values = message.values()?;
//!         let (nj, ni) = values.shape();
//!         println!("decoded a {nj} x {ni} grid");
//!     }
//!     Ok(())
//! }
//! ```

pub mod edition1;
pub mod edition2;
mod error;
mod grid;
mod helpers;
mod message;
mod reader;

pub use crate::{
    error::*,
    grid::{AreaBounds, Grid2D, ScanningMode},
    message::{Message, Section},
    reader::{MessageStream, read, read_from_path},
};
