//! Providers and exporters for raw features, and the readers and writers that connect them to a
//! [`GeometryHandler`](crate::handler::GeometryHandler).

pub mod api;
mod exporter;
pub mod fields;
mod provider;
mod reader;
pub mod wkb;
pub mod wkt;
mod writer;

pub use exporter::{format_f64, BytesExporter, Exporter, StringExporter, WkbExporter, WktExporter};
pub use provider::{BytesProvider, Provider, StringProvider, WkbProvider, WktProvider};
pub use reader::{translate, ReadFeature, Reader};
pub use writer::{DimensionPolicy, Inclusion};
