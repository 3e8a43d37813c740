//! Reading and writing WKT, with an optional `SRID=<n>;` prefix.
//!
//! [`WktStreamer`] emits events while it parses; [`WktReader`] builds a
//! [`Geometry`](crate::geometry::Geometry) first so that sizes are known up front.

mod formatter;
mod reader;
mod streamer;
mod tokenizer;
mod writer;

pub use formatter::WktFormatter;
pub use reader::WktReader;
pub use streamer::WktStreamer;
pub use writer::{WktWriter, WktWriterOptions};
