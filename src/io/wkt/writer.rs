use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::handler::{GeometryHandler, HandlerState};
use crate::io::{DimensionPolicy, Inclusion, StringExporter};
use crate::meta::GeometryMeta;

/// Options for [`WktWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WktWriterOptions {
    /// Significant digits when `trim` is set, decimal places otherwise.
    pub precision: usize,
    pub trim: bool,
    pub dimensions: DimensionPolicy,
}

impl Default for WktWriterOptions {
    fn default() -> Self {
        Self {
            precision: 16,
            trim: true,
            dimensions: Default::default(),
        }
    }
}

/// An open geometry: what was written for it and whether it needs a closing parenthesis.
struct Frame {
    meta: GeometryMeta,
    open: bool,
}

/// Serializes handler events as WKT, one string per feature.
///
/// Parts of a multi geometry are written without a type keyword; parts of a geometry collection
/// always carry one. Only the top-level geometry gets an `SRID=<n>;` prefix.
pub struct WktWriter<E> {
    exporter: E,
    dimensions: DimensionPolicy,
    state: HandlerState,
    stack: Vec<Frame>,
}

impl<E: StringExporter> WktWriter<E> {
    pub fn new(exporter: E) -> Self {
        Self::with_options(exporter, Default::default())
    }

    pub fn with_options(mut exporter: E, options: WktWriterOptions) -> Self {
        exporter.set_rounding_precision(options.precision);
        exporter.set_trim(options.trim);
        Self {
            exporter,
            dimensions: options.dimensions,
            state: HandlerState::Fresh,
            stack: Vec::new(),
        }
    }

    pub fn set_include_z(&mut self, include: Inclusion) {
        self.dimensions.include_z = include;
    }

    pub fn set_include_m(&mut self, include: Inclusion) {
        self.dimensions.include_m = include;
    }

    pub fn set_include_srid(&mut self, include: Inclusion) {
        self.dimensions.include_srid = include;
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    pub fn exporter_mut(&mut self) -> &mut E {
        &mut self.exporter
    }

    pub fn into_exporter(self) -> E {
        self.exporter
    }

    /// Separator, `SRID=` prefix and type keyword, depending on the enclosing geometry.
    fn write_prefix(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        let parent_type = self.stack.last().map(|frame| frame.meta.geometry_type);

        match parent_type {
            Some(parent) if parent.is_multi() => {
                if part_id > 0 {
                    self.exporter.write_str(", ")?;
                }
            }
            Some(_) => {
                if part_id > 0 {
                    self.exporter.write_str(", ")?;
                }
                self.exporter.write_str(&meta.wkt_type())?;
                self.exporter.write_str(" ")?;
            }
            None => {
                if let Some(srid) = meta.srid {
                    self.exporter.write_str("SRID=")?;
                    self.exporter.write_u32(srid)?;
                    self.exporter.write_str(";")?;
                }
                self.exporter.write_str(&meta.wkt_type())?;
                self.exporter.write_str(" ")?;
            }
        }

        Ok(())
    }
}

impl<E: StringExporter> GeometryHandler for WktWriter<E> {
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

    fn geometry_start(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        let effective = self.dimensions.effective_meta(meta, self.stack.is_empty())?;
        self.write_prefix(&effective, part_id)?;

        let open = !effective.is_empty();
        self.exporter.write_str(if open { "(" } else { "EMPTY" })?;
        self.stack.push(Frame {
            meta: effective,
            open,
        });
        Ok(())
    }

    fn ring_start(&mut self, _meta: &GeometryMeta, _size: Option<u32>, ring_id: u32) -> Result<()> {
        if ring_id > 0 {
            self.exporter.write_str(", ")?;
        }
        self.exporter.write_str("(")
    }

    fn coord(&mut self, _meta: &GeometryMeta, coord: &Coord, coord_id: u32) -> Result<()> {
        let (has_z, has_m) = match self.stack.last() {
            Some(frame) => (frame.meta.has_z, frame.meta.has_m),
            None => {
                return Err(WkError::InvalidGeometry(
                    "coordinate outside a geometry".to_string(),
                ))
            }
        };

        if coord_id > 0 {
            self.exporter.write_str(", ")?;
        }
        self.exporter.write_f64(coord.x)?;
        self.exporter.write_str(" ")?;
        self.exporter.write_f64(coord.y)?;
        if has_z && coord.has_z {
            self.exporter.write_str(" ")?;
            self.exporter.write_f64(coord.z)?;
        }
        if has_m && coord.has_m {
            self.exporter.write_str(" ")?;
            self.exporter.write_f64(coord.m)?;
        }
        Ok(())
    }

    fn ring_end(&mut self, _meta: &GeometryMeta, _size: Option<u32>, _ring_id: u32) -> Result<()> {
        self.exporter.write_str(")")
    }

    fn geometry_end(&mut self, _meta: &GeometryMeta, _part_id: u32) -> Result<()> {
        if let Some(frame) = self.stack.pop() {
            if frame.open {
                self.exporter.write_str(")")?;
            }
        }
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
