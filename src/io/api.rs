//! One-call conversions between owned collections of features.
//!
//! Each function runs a single reader into a single writer. `None` stands for a null feature
//! on both sides.
//!
//! ```
//! use wk::io::api::{wkb_to_wkt, wkt_to_wkb};
//!
//! let wkb = wkt_to_wkb(vec![Some("POINT (30 10)"), None], Default::default()).unwrap();
//! let wkt = wkb_to_wkt(wkb, Default::default()).unwrap();
//! assert_eq!(wkt, vec![Some("POINT (30 10)".to_string()), None]);
//! ```

use crate::error::Result;
use crate::io::fields::{FieldsExporter, FieldsProvider, RctReader, XyzmReader, XyzmWriter};
use crate::io::wkb::{WkbReader, WkbWriter, WkbWriterOptions};
use crate::io::wkt::{WktFormatter, WktReader, WktStreamer, WktWriter, WktWriterOptions};
use crate::io::{
    translate, DimensionPolicy, Provider, ReadFeature, WkbExporter, WkbProvider, WktExporter,
    WktProvider,
};

type WkbOutput = Vec<Option<Vec<u8>>>;
type WktOutput = Vec<Option<String>>;

fn to_wkb<D: ReadFeature>(
    decoder: D,
    n_features: usize,
    options: WkbWriterOptions,
) -> Result<WkbOutput> {
    let mut writer = WkbWriter::with_options(WkbExporter::new(n_features), options);
    translate(decoder, &mut writer)?;
    Ok(writer.into_exporter().into_output())
}

fn to_wkt<D: ReadFeature>(
    decoder: D,
    n_features: usize,
    options: WktWriterOptions,
) -> Result<WktOutput> {
    let mut writer = WktWriter::with_options(WktExporter::new(n_features), options);
    translate(decoder, &mut writer)?;
    Ok(writer.into_exporter().into_output())
}

fn to_xyzm<D: ReadFeature>(
    decoder: D,
    n_features: usize,
    dimensions: DimensionPolicy,
) -> Result<Vec<Vec<f64>>> {
    let mut writer = XyzmWriter::with_dimensions(FieldsExporter::new(4, n_features), dimensions);
    translate(decoder, &mut writer)?;
    Ok(writer.into_exporter().into_columns())
}

fn to_formatted<D: ReadFeature>(
    decoder: D,
    n_features: usize,
    max_coords: usize,
) -> Result<WktOutput> {
    let mut formatter = WktFormatter::new(WktExporter::new(n_features), max_coords);
    translate(decoder, &mut formatter)?;
    Ok(formatter.into_exporter().into_output())
}

/// Parses WKT and encodes it as EWKB.
pub fn wkt_to_wkb<T: AsRef<str>>(
    wkt: Vec<Option<T>>,
    options: WkbWriterOptions,
) -> Result<WkbOutput> {
    let n = wkt.len();
    to_wkb(WktReader::new(WktProvider::new(wkt)), n, options)
}

pub fn wkb_to_wkt<T: AsRef<[u8]>>(
    wkb: Vec<Option<T>>,
    options: WktWriterOptions,
) -> Result<WktOutput> {
    let n = wkb.len();
    to_wkt(WkbReader::new(WkbProvider::new(wkb)), n, options)
}

/// Normalizes WKT: canonical spacing, number formatting and the dimension policy in `options`.
pub fn wkt_to_wkt<T: AsRef<str>>(
    wkt: Vec<Option<T>>,
    options: WktWriterOptions,
) -> Result<WktOutput> {
    let n = wkt.len();
    to_wkt(WktStreamer::new(WktProvider::new(wkt)), n, options)
}

/// Re-encodes WKB, for example to change byte order or drop a dimension.
pub fn wkb_to_wkb<T: AsRef<[u8]>>(
    wkb: Vec<Option<T>>,
    options: WkbWriterOptions,
) -> Result<WkbOutput> {
    let n = wkb.len();
    to_wkb(WkbReader::new(WkbProvider::new(wkb)), n, options)
}

/// Short WKT previews capped at `max_coords` coordinates; invalid features are described
/// rather than rejected.
pub fn format_wkt<T: AsRef<str>>(wkt: Vec<Option<T>>, max_coords: usize) -> Result<WktOutput> {
    let n = wkt.len();
    to_formatted(WktReader::new(WktProvider::new(wkt)), n, max_coords)
}

pub fn format_wkb<T: AsRef<[u8]>>(wkb: Vec<Option<T>>, max_coords: usize) -> Result<WktOutput> {
    let n = wkb.len();
    to_formatted(WkbReader::new(WkbProvider::new(wkb)), n, max_coords)
}

/// Encodes `x`, `y`, `z`, `m` columns as points.
pub fn xyzm_to_wkb(columns: Vec<Vec<f64>>, options: WkbWriterOptions) -> Result<WkbOutput> {
    let provider = FieldsProvider::new(columns)?;
    let n = provider.n_features();
    to_wkb(XyzmReader::new(provider), n, options)
}

/// Encodes `xmin`, `ymin`, `xmax`, `ymax` columns as rectangular polygons.
pub fn rct_to_wkb(columns: Vec<Vec<f64>>, options: WkbWriterOptions) -> Result<WkbOutput> {
    let provider = FieldsProvider::new(columns)?;
    let n = provider.n_features();
    to_wkb(RctReader::new(provider), n, options)
}

/// Decodes points into `x`, `y`, `z`, `m` columns.
pub fn wkb_to_xyzm<T: AsRef<[u8]>>(
    wkb: Vec<Option<T>>,
    dimensions: DimensionPolicy,
) -> Result<Vec<Vec<f64>>> {
    let n = wkb.len();
    to_xyzm(WkbReader::new(WkbProvider::new(wkb)), n, dimensions)
}

pub fn wkt_to_xyzm<T: AsRef<str>>(
    wkt: Vec<Option<T>>,
    dimensions: DimensionPolicy,
) -> Result<Vec<Vec<f64>>> {
    let n = wkt.len();
    to_xyzm(WktStreamer::new(WktProvider::new(wkt)), n, dimensions)
}
