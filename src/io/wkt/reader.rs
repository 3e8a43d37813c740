use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::geometry::Geometry;
use crate::handler::{GeometryHandler, PART_ID_NONE};
use crate::io::wkt::streamer::WktParser;
use crate::io::{ReadFeature, StringProvider};
use crate::meta::GeometryMeta;

/// Collects the events of one WKT geometry into a [`Geometry`].
#[derive(Debug, Default)]
struct GeometryBuilder {
    stack: Vec<Geometry>,
    feature: Option<Geometry>,
}

impl GeometryBuilder {
    fn current(&mut self) -> Result<&mut Geometry> {
        self.stack
            .last_mut()
            .ok_or_else(|| WkError::InvalidGeometry("event outside a geometry".to_string()))
    }
}

impl GeometryHandler for GeometryBuilder {
    fn geometry_start(&mut self, meta: &GeometryMeta, _part_id: u32) -> Result<()> {
        self.stack.push(Geometry::new(meta.clone()));
        Ok(())
    }

    fn ring_start(&mut self, _meta: &GeometryMeta, _size: Option<u32>, _ring_id: u32) -> Result<()> {
        self.current()?.add_ring()
    }

    fn coord(&mut self, _meta: &GeometryMeta, coord: &Coord, _coord_id: u32) -> Result<()> {
        self.current()?.add_coord(*coord)
    }

    fn geometry_end(&mut self, _meta: &GeometryMeta, _part_id: u32) -> Result<()> {
        let mut geometry = self
            .stack
            .pop()
            .ok_or_else(|| WkError::InvalidGeometry("unbalanced geometry end".to_string()))?;
        geometry.finalize();

        match self.stack.last_mut() {
            Some(parent) => parent.add_child(geometry),
            None => {
                self.feature = Some(geometry);
                Ok(())
            }
        }
    }
}

/// Reads each WKT feature into a [`Geometry`] before replaying it, so every event carries a
/// known size.
///
/// This is the reader to put in front of [`WkbWriter`](crate::io::wkb::WkbWriter).
pub struct WktReader<P> {
    provider: P,
}

impl<P: StringProvider> WktReader<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Parses the current feature without emitting anything; `None` for a null feature.
    pub fn read_geometry(&self) -> Result<Option<Geometry>> {
        if self.provider.feature_is_null() {
            return Ok(None);
        }

        let text = self.provider.feature_string()?;
        let mut builder = GeometryBuilder::default();
        WktParser::new(text, &mut builder).read_geometry(PART_ID_NONE)?;
        builder
            .feature
            .map(Some)
            .ok_or_else(|| WkError::InvalidGeometry("no geometry in feature".to_string()))
    }
}

impl<P: StringProvider> ReadFeature for WktReader<P> {
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

        match self.read_geometry()? {
            Some(geometry) => geometry.process(handler, PART_ID_NONE)?,
            None => handler.null_feature(feature_id)?,
        }

        handler.feature_end(feature_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::{translate, Provider, WktProvider};
    use crate::meta::GeometryType;
    use crate::test::EventLog;

    fn events(input: &str) -> Vec<String> {
        let mut log = EventLog::default();
        translate(WktReader::new(WktProvider::new(vec![Some(input)])), &mut log).unwrap();
        log.events
    }

    #[test]
    fn sizes_are_known_at_start() {
        assert_eq!(
            events("POLYGON ((0 0, 1 0, 0 1, 0 0))"),
            vec![
                "feature_start(0)",
                "geometry_start(POLYGON [1], NONE)",
                "ring_start(4, 0)",
                "coord(0 0, 0)",
                "coord(1 0, 1)",
                "coord(0 1, 2)",
                "coord(0 0, 3)",
                "ring_end(4, 0)",
                "geometry_end(POLYGON [1], NONE)",
                "feature_end(0)",
            ]
        );
    }

    #[test]
    fn nesting_fidelity() {
        let mut log = EventLog::default();
        translate(
            WktReader::new(WktProvider::new(vec![Some(
                "SRID=4326;GEOMETRYCOLLECTION (POINT (0 0), MULTIPOINT (1 1, 2 2))",
            )])),
            &mut log,
        )
        .unwrap();
        assert_eq!(
            log.started(),
            vec![
                "geometry_start(GEOMETRYCOLLECTION SRID=4326 [2], NONE)",
                "geometry_start(POINT [1], 0)",
                "geometry_start(MULTIPOINT [2], 1)",
                "geometry_start(POINT [1], 0)",
                "geometry_start(POINT [1], 1)",
            ]
        );
    }

    #[test]
    fn read_geometry_without_handler() {
        let mut reader = WktReader::new(WktProvider::new(vec![
            Some("MULTILINESTRING ((0 0, 1 1), (2 2, 3 3, 4 4))"),
            None,
        ]));
        assert!(reader.provider_mut().seek_next_feature());
        let geometry = reader.read_geometry().unwrap().unwrap();
        assert_eq!(geometry.meta().geometry_type, GeometryType::MultiLineString);
        assert_eq!(geometry.meta().size, Some(2));
        match &geometry {
            Geometry::Collection { geometries, .. } => {
                assert_eq!(geometries[1].meta().size, Some(3));
            }
            _ => unreachable!(),
        }

        assert!(reader.provider_mut().seek_next_feature());
        assert!(reader.read_geometry().unwrap().is_none());
    }

    #[test]
    fn parse_errors_emit_nothing() {
        let mut log = EventLog::swallowing();
        translate(
            WktReader::new(WktProvider::new(vec![Some("LINESTRING (0 0, 1 1"), Some("POINT (1 2)")])),
            &mut log,
        )
        .unwrap();
        assert_eq!(
            log.errors,
            vec![(0, "Expected ',' or ')' but found end of input (:20)".to_string())]
        );
        assert_eq!(log.events[0], "feature_start(0)");
        assert_eq!(log.events[1], "feature_start(1)");
    }
}
