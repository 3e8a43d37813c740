use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::handler::{GeometryHandler, HandlerState};
use crate::io::wkb::Endianness;
use crate::io::{BytesExporter, DimensionPolicy, Inclusion};
use crate::meta::{GeometryMeta, GeometryType};

/// Options for [`WkbWriter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WkbWriterOptions {
    pub endian: Endianness,
    pub dimensions: DimensionPolicy,
}

/// Encodes handler events as EWKB, one buffer per feature.
///
/// Every geometry must arrive with a known size. An empty point has no count field in WKB, so
/// it is written as a point whose ordinates are all NaN.
pub struct WkbWriter<E> {
    exporter: E,
    options: WkbWriterOptions,
    state: HandlerState,
    /// Effective metas of the open geometries, outermost first.
    stack: Vec<GeometryMeta>,
}

impl<E: BytesExporter> WkbWriter<E> {
    pub fn new(exporter: E) -> Self {
        Self::with_options(exporter, Default::default())
    }

    pub fn with_options(exporter: E, options: WkbWriterOptions) -> Self {
        Self {
            exporter,
            options,
            state: HandlerState::Fresh,
            stack: Vec::new(),
        }
    }

    pub fn set_endian(&mut self, endian: Endianness) {
        self.options.endian = endian;
    }

    pub fn set_include_z(&mut self, include: Inclusion) {
        self.options.dimensions.include_z = include;
    }

    pub fn set_include_m(&mut self, include: Inclusion) {
        self.options.dimensions.include_m = include;
    }

    pub fn set_include_srid(&mut self, include: Inclusion) {
        self.options.dimensions.include_srid = include;
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    pub fn into_exporter(self) -> E {
        self.exporter
    }

    fn write_header(&mut self, meta: &GeometryMeta, size: u32) -> Result<()> {
        let endian = self.options.endian;
        self.exporter.write_u8(endian.into())?;
        self.exporter.write_u32(meta.ewkb_type(), endian)?;
        if let Some(srid) = meta.srid {
            self.exporter.write_u32(srid, endian)?;
        }

        if meta.geometry_type != GeometryType::Point {
            self.exporter.write_u32(size, endian)?;
        } else if size == 0 {
            let nan = Coord::with_dims(meta.has_z, meta.has_m);
            for i in 0..nan.dim() {
                self.exporter.write_f64(nan[i], endian)?;
            }
        }

        Ok(())
    }
}

impl<E: BytesExporter> GeometryHandler for WkbWriter<E> {
    fn initialize(&mut self) -> Result<()> {
        self.state.initialize()
    }

    fn feature_start(&mut self, _feature_id: usize) -> Result<()> {
        self.stack.clear();
        self.exporter.prepare_next_feature()
    }

    fn null_feature(&mut self, _feature_id: usize) -> Result<()> {
        self.exporter.write_null()
    }

    fn geometry_start(&mut self, meta: &GeometryMeta, _part_id: u32) -> Result<()> {
        let size = meta.size.ok_or(WkError::MissingSize)?;

        let effective = self
            .options
            .dimensions
            .effective_meta(meta, self.stack.is_empty())?;

        self.write_header(&effective, size)?;
        self.stack.push(effective);
        Ok(())
    }

    fn ring_start(&mut self, _meta: &GeometryMeta, size: Option<u32>, _ring_id: u32) -> Result<()> {
        let size = size.ok_or(WkError::MissingSize)?;
        self.exporter.write_u32(size, self.options.endian)
    }

    fn coord(&mut self, _meta: &GeometryMeta, coord: &Coord, _coord_id: u32) -> Result<()> {
        let endian = self.options.endian;
        let effective = self
            .stack
            .last()
            .ok_or_else(|| WkError::InvalidGeometry("coordinate outside a geometry".to_string()))?;

        self.exporter.write_f64(coord.x, endian)?;
        self.exporter.write_f64(coord.y, endian)?;
        if effective.has_z && coord.has_z {
            self.exporter.write_f64(coord.z, endian)?;
        }
        if effective.has_m && coord.has_m {
            self.exporter.write_f64(coord.m, endian)?;
        }
        Ok(())
    }

    fn geometry_end(&mut self, _meta: &GeometryMeta, _part_id: u32) -> Result<()> {
        self.stack.pop();
        Ok(())
    }

    fn feature_end(&mut self, _feature_id: usize) -> Result<()> {
        self.exporter.write_next_feature()
    }

    fn deinitialize(&mut self) -> Result<()> {
        self.state.deinitialize();
        Ok(())
    }
}
