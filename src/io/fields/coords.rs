use std::ops::Range;

use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::geometry::Geometry;
use crate::handler::{GeometryHandler, PART_ID_NONE};
use crate::io::{Provider, ReadFeature};
use crate::meta::{GeometryMeta, GeometryType};

/// Coordinate columns shared by the coordinate providers. `z` and `m` are optional.
#[derive(Debug, Clone, Default)]
pub struct CoordColumns {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Option<Vec<f64>>,
    pub m: Option<Vec<f64>>,
}

impl CoordColumns {
    pub fn xy(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    pub fn with_z(mut self, z: Vec<f64>) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_m(mut self, m: Vec<f64>) -> Self {
        self.m = Some(m);
        self
    }

    fn has_z(&self) -> bool {
        self.z.is_some()
    }

    fn has_m(&self) -> bool {
        self.m.is_some()
    }

    fn len(&self) -> Result<usize> {
        let n = self.x.len();
        let others = [
            ("y", Some(&self.y)),
            ("z", self.z.as_ref()),
            ("m", self.m.as_ref()),
        ];
        for (name, column) in others {
            if let Some(column) = column {
                check_length(name, column.len(), n)?;
            }
        }
        Ok(n)
    }

    /// The coordinate in row `i`, with every column that was supplied.
    fn coord(&self, i: usize) -> Coord {
        let z = self.z.as_ref().map_or(f64::NAN, |z| z[i]);
        let m = self.m.as_ref().map_or(f64::NAN, |m| m[i]);
        Coord::new(self.x[i], self.y[i], z, m, self.has_z(), self.has_m())
    }
}

/// Splits `ids` into runs of equal consecutive values.
fn runs(ids: &[u32]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=ids.len() {
        if i == ids.len() || ids[i] != ids[start] {
            runs.push(start..i);
            start = i;
        }
    }
    runs
}

fn check_length(name: &str, len: usize, expected: usize) -> Result<()> {
    if len != expected {
        return Err(WkError::InvalidArgument(format!(
            "{name} has {len} values, expected {expected}"
        )));
    }
    Ok(())
}

/// A provider whose current feature is assembled from coordinate rows.
pub trait CoordProvider: Provider {
    /// Builds the geometry for the current feature.
    fn geometry(&self) -> Result<Geometry>;
}

/// A cursor over the groups of a coordinate provider.
#[derive(Debug, Clone, Default)]
struct Cursor {
    index: Option<usize>,
}

impl Cursor {
    fn seek(&mut self, n: usize) -> bool {
        let next = self.index.map_or(0, |i| i + 1);
        self.index = Some(next);
        next < n
    }

    fn current(&self, n: usize) -> Result<usize> {
        self.index.filter(|i| *i < n).ok_or_else(|| {
            WkError::IndexOutOfRange(format!("no current feature in {n} features"))
        })
    }

    fn current_run(&self, runs: &[Range<usize>]) -> Result<Range<usize>> {
        Ok(runs[self.current(runs.len())?].clone())
    }
}

/// One point per row.
///
/// A row whose ordinates are all NaN is an empty point; a NaN `z` or `m` drops that dimension
/// for the row.
#[derive(Debug, Clone)]
pub struct PointCoordProvider {
    columns: CoordColumns,
    n_features: usize,
    cursor: Cursor,
}

impl PointCoordProvider {
    pub fn new(columns: CoordColumns) -> Result<Self> {
        let n_features = columns.len()?;
        Ok(Self {
            columns,
            n_features,
            cursor: Cursor::default(),
        })
    }
}

impl Provider for PointCoordProvider {
    fn seek_next_feature(&mut self) -> bool {
        self.cursor.seek(self.n_features)
    }

    fn feature_is_null(&self) -> bool {
        false
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn reset(&mut self) {
        self.cursor = Cursor::default();
    }
}

impl CoordProvider for PointCoordProvider {
    fn geometry(&self) -> Result<Geometry> {
        let row = self.cursor.current(self.n_features)?;
        let mut coord = self.columns.coord(row);
        let empty = coord.x.is_nan() && coord.y.is_nan() && coord.z.is_nan() && coord.m.is_nan();
        coord.has_z = !coord.z.is_nan();
        coord.has_m = !coord.m.is_nan();

        let meta = GeometryMeta::new(GeometryType::Point).with_dims(coord.has_z, coord.has_m);
        let mut point = Geometry::new(meta);
        if !empty {
            point.add_coord(coord)?;
        }
        point.finalize();
        Ok(point)
    }
}

/// Consecutive rows sharing a feature id form one linestring.
#[derive(Debug, Clone)]
pub struct LineStringCoordProvider {
    columns: CoordColumns,
    features: Vec<Range<usize>>,
    cursor: Cursor,
}

impl LineStringCoordProvider {
    pub fn new(columns: CoordColumns, feature_id: Vec<u32>) -> Result<Self> {
        check_length("feature_id", feature_id.len(), columns.len()?)?;
        Ok(Self {
            features: runs(&feature_id),
            columns,
            cursor: Cursor::default(),
        })
    }
}

impl Provider for LineStringCoordProvider {
    fn seek_next_feature(&mut self) -> bool {
        self.cursor.seek(self.features.len())
    }

    fn feature_is_null(&self) -> bool {
        false
    }

    fn n_features(&self) -> usize {
        self.features.len()
    }

    fn reset(&mut self) {
        self.cursor = Cursor::default();
    }
}

impl CoordProvider for LineStringCoordProvider {
    fn geometry(&self) -> Result<Geometry> {
        let rows = self.cursor.current_run(&self.features)?;
        let meta = GeometryMeta::new(GeometryType::LineString)
            .with_dims(self.columns.has_z(), self.columns.has_m());

        let mut linestring = Geometry::new(meta);
        for row in rows {
            linestring.add_coord(self.columns.coord(row))?;
        }
        linestring.finalize();
        Ok(linestring)
    }
}

/// Consecutive rows sharing a feature id form one polygon, and within it consecutive rows
/// sharing a ring id form one ring. Rings that don't end where they start are closed.
#[derive(Debug, Clone)]
pub struct PolygonCoordProvider {
    columns: CoordColumns,
    ring_id: Vec<u32>,
    features: Vec<Range<usize>>,
    cursor: Cursor,
}

impl PolygonCoordProvider {
    pub fn new(columns: CoordColumns, feature_id: Vec<u32>, ring_id: Vec<u32>) -> Result<Self> {
        let n_coords = columns.len()?;
        check_length("feature_id", feature_id.len(), n_coords)?;
        check_length("ring_id", ring_id.len(), n_coords)?;
        Ok(Self {
            features: runs(&feature_id),
            columns,
            ring_id,
            cursor: Cursor::default(),
        })
    }
}

impl Provider for PolygonCoordProvider {
    fn seek_next_feature(&mut self) -> bool {
        self.cursor.seek(self.features.len())
    }

    fn feature_is_null(&self) -> bool {
        false
    }

    fn n_features(&self) -> usize {
        self.features.len()
    }

    fn reset(&mut self) {
        self.cursor = Cursor::default();
    }
}

impl CoordProvider for PolygonCoordProvider {
    fn geometry(&self) -> Result<Geometry> {
        let rows = self.cursor.current_run(&self.features)?;
        let meta = GeometryMeta::new(GeometryType::Polygon)
            .with_dims(self.columns.has_z(), self.columns.has_m());

        let mut polygon = Geometry::new(meta);
        for ring in runs(&self.ring_id[rows.clone()]) {
            let ring = (ring.start + rows.start)..(ring.end + rows.start);
            let first = self.columns.coord(ring.start);
            let last = self.columns.coord(ring.end - 1);

            polygon.add_ring()?;
            for row in ring {
                polygon.add_coord(self.columns.coord(row))?;
            }
            if first != last {
                polygon.add_coord(first)?;
            }
        }
        polygon.finalize();
        Ok(polygon)
    }
}

/// Emits the geometries assembled by a [`CoordProvider`], one per feature.
pub struct CoordReader<P> {
    provider: P,
}

impl<P: CoordProvider> CoordReader<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn into_provider(self) -> P {
        self.provider
    }
}

impl<P: CoordProvider> ReadFeature for CoordReader<P> {
    type Provider = P;

    fn provider(&self) -> &P {
        &self.provider
    }

    fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    fn read_feature<H: GeometryHandler + ?Sized>(
        &mut self,
        feature_id: usize,
        handler: &mut H,
    ) -> Result<()> {
        handler.feature_start(feature_id)?;
        self.provider.geometry()?.process(handler, PART_ID_NONE)?;
        handler.feature_end(feature_id)
    }
}
