//! Streaming reading and writing of EWKB-encoded geometries.
//!
//! Both ISO (`1000`/`2000`/`3000` offsets) and EWKB (high-bit flags) type codes are accepted on
//! read. Output always uses EWKB flags, with the SRID on the top-level geometry only.

mod common;
mod reader;
mod writer;

pub use common::Endianness;
pub use reader::WkbReader;
pub use writer::{WkbWriter, WkbWriterOptions};
