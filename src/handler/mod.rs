//! The event protocol shared by every reader and consumer.
//!
//! A reader calls, for each feature:
//!
//! ```text
//! feature_start
//!   null_feature
//!   | geometry_start
//!       (ring_start coord* ring_end)*  for polygons
//!       | coord*                        for points and linestrings
//!       | (geometry_start ... geometry_end)*  for multi geometries and collections
//!     geometry_end
//! feature_end
//! ```

mod debug;
mod filter;

pub use debug::DebugHandler;
pub use filter::MetaFilter;

use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::meta::GeometryMeta;

/// `part_id` passed for a top-level geometry.
pub const PART_ID_NONE: u32 = u32::MAX;

/// A consumer of geometry events.
///
/// Every callback has a no-op default so implementors only override what they need. Errors
/// returned from a callback abort the current feature; see [`GeometryHandler::next_error`] for
/// how a reader decides what happens next.
#[allow(unused_variables)]
pub trait GeometryHandler {
    /// Called once before the first feature of a run.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn feature_start(&mut self, feature_id: usize) -> Result<()> {
        Ok(())
    }

    /// Replaces the geometry events for a null feature.
    fn null_feature(&mut self, feature_id: usize) -> Result<()> {
        Ok(())
    }

    /// `part_id` is [`PART_ID_NONE`] at the top level, otherwise the 0-based index within the
    /// enclosing multi geometry or collection.
    fn geometry_start(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        Ok(())
    }

    /// `meta` is the enclosing polygon. `size` is the number of coordinates when known.
    fn ring_start(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        Ok(())
    }

    fn coord(&mut self, meta: &GeometryMeta, coord: &Coord, coord_id: u32) -> Result<()> {
        Ok(())
    }

    fn ring_end(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        Ok(())
    }

    fn geometry_end(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        Ok(())
    }

    fn feature_end(&mut self, feature_id: usize) -> Result<()> {
        Ok(())
    }

    /// Offered every per-feature parse error.
    ///
    /// `Ok(true)` treats the feature as consumed and the reader moves on, `Ok(false)` hands the
    /// error back to the caller.
    fn next_error(&mut self, error: &WkError, feature_id: usize) -> Result<bool> {
        Ok(false)
    }

    /// Called once after the last feature of a run.
    fn deinitialize(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<H: GeometryHandler + ?Sized> GeometryHandler for &mut H {
    fn initialize(&mut self) -> Result<()> {
        (**self).initialize()
    }

    fn feature_start(&mut self, feature_id: usize) -> Result<()> {
        (**self).feature_start(feature_id)
    }

    fn null_feature(&mut self, feature_id: usize) -> Result<()> {
        (**self).null_feature(feature_id)
    }

    fn geometry_start(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        (**self).geometry_start(meta, part_id)
    }

    fn ring_start(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        (**self).ring_start(meta, size, ring_id)
    }

    fn coord(&mut self, meta: &GeometryMeta, coord: &Coord, coord_id: u32) -> Result<()> {
        (**self).coord(meta, coord, coord_id)
    }

    fn ring_end(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        (**self).ring_end(meta, size, ring_id)
    }

    fn geometry_end(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        (**self).geometry_end(meta, part_id)
    }

    fn feature_end(&mut self, feature_id: usize) -> Result<()> {
        (**self).feature_end(feature_id)
    }

    fn next_error(&mut self, error: &WkError, feature_id: usize) -> Result<bool> {
        (**self).next_error(error, feature_id)
    }

    fn deinitialize(&mut self) -> Result<()> {
        (**self).deinitialize()
    }
}

/// Lifecycle of a handler that may only run once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandlerState {
    #[default]
    Fresh,
    Initialized,
    Deinitialized,
}

impl HandlerState {
    /// Moves `Fresh` to `Initialized`; any other starting state is a reuse.
    pub fn initialize(&mut self) -> Result<()> {
        match self {
            HandlerState::Fresh => {
                *self = HandlerState::Initialized;
                Ok(())
            }
            _ => Err(WkError::HandlerReused),
        }
    }

    pub fn deinitialize(&mut self) {
        *self = HandlerState::Deinitialized;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lifecycle_rejects_reuse() {
        let mut state = HandlerState::default();
        state.initialize().unwrap();
        assert!(matches!(state.initialize(), Err(WkError::HandlerReused)));
        state.deinitialize();
        assert!(matches!(state.initialize(), Err(WkError::HandlerReused)));
    }

    #[test]
    fn default_callbacks_are_noops() {
        struct Nothing;
        impl GeometryHandler for Nothing {}

        let mut handler = Nothing;
        let meta = GeometryMeta::new(crate::meta::GeometryType::Point);
        handler.feature_start(0).unwrap();
        handler.geometry_start(&meta, PART_ID_NONE).unwrap();
        handler.coord(&meta, &Coord::xy(0., 0.), 0).unwrap();
        handler.geometry_end(&meta, PART_ID_NONE).unwrap();
        handler.feature_end(0).unwrap();
        assert!(!handler.next_error(&WkError::MaxCoordinatesExceeded, 0).unwrap());
    }
}
