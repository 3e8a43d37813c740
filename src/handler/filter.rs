use std::collections::HashMap;

use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::handler::GeometryHandler;
use crate::meta::GeometryMeta;

type MetaFn = fn(&GeometryMeta, u32) -> GeometryMeta;

/// Forwards every event to an inner handler, swapping each geometry's meta for the one produced
/// by `f(meta, part_id)`.
///
/// The replacement is computed once at `geometry_start` and reused for that geometry's rings,
/// coordinates and `geometry_end`, keyed by [`GeometryMeta::handle`]. Readers that learn a size
/// late (WKT) report it at `geometry_end`; it is copied onto the replacement before forwarding.
pub struct MetaFilter<H, F> {
    inner: H,
    f: F,
    replacements: HashMap<u32, GeometryMeta>,
}

impl<H: GeometryHandler, F: FnMut(&GeometryMeta, u32) -> GeometryMeta> MetaFilter<H, F> {
    pub fn new(inner: H, f: F) -> Self {
        Self {
            inner,
            f,
            replacements: HashMap::new(),
        }
    }
}

impl<H: GeometryHandler> MetaFilter<H, MetaFn> {
    /// A filter that leaves every meta untouched.
    pub fn passthrough(inner: H) -> Self {
        Self::new(inner, |meta, _| meta.clone())
    }
}

impl<H: GeometryHandler> MetaFilter<H, Box<dyn FnMut(&GeometryMeta, u32) -> GeometryMeta>> {
    /// A filter that removes the selected dimensions and the SRID.
    ///
    /// Coordinates keep their own flags; writers drop the ordinates the replaced meta no longer
    /// declares.
    pub fn strip(inner: H, z: bool, m: bool, srid: bool) -> Self {
        Self::new(
            inner,
            Box::new(move |meta: &GeometryMeta, _: u32| {
                let mut out = meta.clone();
                out.has_z &= !z;
                out.has_m &= !m;
                if srid {
                    out.srid = None;
                }
                out
            }),
        )
    }
}

impl<H, F> MetaFilter<H, F> {
    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: GeometryHandler, F: FnMut(&GeometryMeta, u32) -> GeometryMeta> GeometryHandler
    for MetaFilter<H, F>
{
    fn initialize(&mut self) -> Result<()> {
        self.inner.initialize()
    }

    fn feature_start(&mut self, feature_id: usize) -> Result<()> {
        self.replacements.clear();
        self.inner.feature_start(feature_id)
    }

    fn null_feature(&mut self, feature_id: usize) -> Result<()> {
        self.inner.null_feature(feature_id)
    }

    fn geometry_start(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        let replacement = (self.f)(meta, part_id);
        self.inner.geometry_start(&replacement, part_id)?;
        self.replacements.insert(meta.handle, replacement);
        Ok(())
    }

    fn ring_start(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        let replacement = self.replacements.get(&meta.handle).unwrap_or(meta);
        self.inner.ring_start(replacement, size, ring_id)
    }

    fn coord(&mut self, meta: &GeometryMeta, coord: &Coord, coord_id: u32) -> Result<()> {
        let replacement = self.replacements.get(&meta.handle).unwrap_or(meta);
        self.inner.coord(replacement, coord, coord_id)
    }

    fn ring_end(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        let replacement = self.replacements.get(&meta.handle).unwrap_or(meta);
        self.inner.ring_end(replacement, size, ring_id)
    }

    fn geometry_end(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        match self.replacements.remove(&meta.handle) {
            Some(mut replacement) => {
                replacement.size = meta.size;
                self.inner.geometry_end(&replacement, part_id)
            }
            None => self.inner.geometry_end(meta, part_id),
        }
    }

    fn feature_end(&mut self, feature_id: usize) -> Result<()> {
        self.inner.feature_end(feature_id)
    }

    fn next_error(&mut self, error: &WkError, feature_id: usize) -> Result<bool> {
        self.inner.next_error(error, feature_id)
    }

    fn deinitialize(&mut self) -> Result<()> {
        self.inner.deinitialize()
    }
}
