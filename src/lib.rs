//! Streaming readers and writers for well-known geometry encodings.
//!
//! Every format is read feature by feature into a sequence of events on a
//! [`GeometryHandler`](handler::GeometryHandler): WKT and (E)WKB through the readers in
//! [`io::wkt`] and [`io::wkb`], coordinate columns through [`io::fields`]. Writers are handlers
//! themselves, so converting between formats is a matter of connecting a reader to a writer
//! with [`io::translate`], or calling one of the functions in [`io::api`].

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod coord;
pub mod error;
pub mod geometry;
pub mod handler;
pub mod io;
pub mod meta;
#[cfg(test)]
pub(crate) mod test;

pub use coord::Coord;
pub use error::{Result, WkError};
pub use geometry::Geometry;
pub use meta::{GeometryMeta, GeometryType};
