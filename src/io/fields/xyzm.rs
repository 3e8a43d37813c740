use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::handler::{GeometryHandler, HandlerState, PART_ID_NONE};
use crate::io::fields::{FieldsExporter, FieldsProvider};
use crate::io::{DimensionPolicy, Exporter, Inclusion, ReadFeature};
use crate::meta::{GeometryMeta, GeometryType};

/// Reads `x`, `y`, `z`, `m` columns as one point per row.
///
/// A NaN `z` or `m` means the point doesn't have that dimension; a row that is NaN everywhere
/// is an empty point.
pub struct XyzmReader {
    provider: FieldsProvider,
}

impl XyzmReader {
    pub fn new(provider: FieldsProvider) -> Self {
        Self { provider }
    }

    pub fn into_provider(self) -> FieldsProvider {
        self.provider
    }
}

impl ReadFeature for XyzmReader {
    type Provider = FieldsProvider;

    fn provider(&self) -> &FieldsProvider {
        &self.provider
    }

    fn provider_mut(&mut self) -> &mut FieldsProvider {
        &mut self.provider
    }

    fn read_feature<H: GeometryHandler + ?Sized>(
        &mut self,
        feature_id: usize,
        handler: &mut H,
    ) -> Result<()> {
        handler.feature_start(feature_id)?;

        let x = self.provider.field(0)?;
        let y = self.provider.field(1)?;
        let z = self.provider.field(2)?;
        let m = self.provider.field(3)?;

        let coord = Coord::new(x, y, z, m, !z.is_nan(), !m.is_nan());
        let empty = x.is_nan() && y.is_nan() && z.is_nan() && m.is_nan();
        let meta = GeometryMeta::new(GeometryType::Point)
            .with_dims(coord.has_z, coord.has_m)
            .with_size(if empty { 0 } else { 1 });

        handler.geometry_start(&meta, PART_ID_NONE)?;
        if !empty {
            handler.coord(&meta, &coord, 0)?;
        }
        handler.geometry_end(&meta, PART_ID_NONE)?;

        handler.feature_end(feature_id)
    }
}

/// Writes points into four `x`, `y`, `z`, `m` columns.
///
/// Null features, empty points and missing dimensions are written as NaN. Anything other than a
/// point is an error.
pub struct XyzmWriter {
    exporter: FieldsExporter,
    dimensions: DimensionPolicy,
    state: HandlerState,
    current: Option<GeometryMeta>,
}

impl XyzmWriter {
    pub fn new(exporter: FieldsExporter) -> Self {
        Self::with_dimensions(exporter, Default::default())
    }

    pub fn with_dimensions(exporter: FieldsExporter, dimensions: DimensionPolicy) -> Self {
        Self {
            exporter,
            dimensions,
            state: HandlerState::Fresh,
            current: None,
        }
    }

    pub fn set_include_z(&mut self, include: Inclusion) {
        self.dimensions.include_z = include;
    }

    pub fn set_include_m(&mut self, include: Inclusion) {
        self.dimensions.include_m = include;
    }

    pub fn into_exporter(self) -> FieldsExporter {
        self.exporter
    }

    fn write_nan(&mut self) -> Result<()> {
        for field in 0..4 {
            self.exporter.set_field(field, f64::NAN)?;
        }
        Ok(())
    }
}

impl GeometryHandler for XyzmWriter {
    fn initialize(&mut self) -> Result<()> {
        if self.exporter.n_fields() < 4 {
            return Err(WkError::InvalidArgument(format!(
                "xyzm output needs 4 fields, found {}",
                self.exporter.n_fields()
            )));
        }
        self.state.initialize()
    }

    fn feature_start(&mut self, _feature_id: usize) -> Result<()> {
        self.current = None;
        self.exporter.prepare_next_feature()
    }

    fn null_feature(&mut self, _feature_id: usize) -> Result<()> {
        self.write_nan()
    }

    fn geometry_start(&mut self, meta: &GeometryMeta, _part_id: u32) -> Result<()> {
        if meta.geometry_type != GeometryType::Point {
            return Err(WkError::IncorrectGeometryType(
                "Can't create xy(zm) from a non-point".to_string(),
            ));
        }

        let effective = self.dimensions.effective_meta(meta, true)?;
        if effective.is_empty() {
            self.write_nan()?;
        }
        self.current = Some(effective);
        Ok(())
    }

    fn coord(&mut self, _meta: &GeometryMeta, coord: &Coord, _coord_id: u32) -> Result<()> {
        let (has_z, has_m) = self
            .current
            .as_ref()
            .map(|meta| (meta.has_z, meta.has_m))
            .ok_or_else(|| WkError::InvalidGeometry("coordinate outside a point".to_string()))?;

        self.exporter.set_field(0, coord.x)?;
        self.exporter.set_field(1, coord.y)?;
        self.exporter
            .set_field(2, if has_z && coord.has_z { coord.z } else { f64::NAN })?;
        self.exporter
            .set_field(3, if has_m && coord.has_m { coord.m } else { f64::NAN })
    }

    fn feature_end(&mut self, _feature_id: usize) -> Result<()> {
        self.exporter.write_next_feature()
    }

    fn deinitialize(&mut self) -> Result<()> {
        self.state.deinitialize();
        Ok(())
    }
}
