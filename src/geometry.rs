//! An owned geometry tree, for when a geometry has to be held in memory before it is emitted.

use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::handler::GeometryHandler;
use crate::meta::{GeometryMeta, GeometryType};

/// A geometry and everything it owns.
///
/// Multi geometries and geometry collections share the [`Geometry::Collection`] variant; the
/// meta tells them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point {
        meta: GeometryMeta,
        coords: Vec<Coord>,
    },
    LineString {
        meta: GeometryMeta,
        coords: Vec<Coord>,
    },
    Polygon {
        meta: GeometryMeta,
        rings: Vec<Vec<Coord>>,
    },
    Collection {
        meta: GeometryMeta,
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    /// An empty node of the kind `meta` describes.
    pub fn new(meta: GeometryMeta) -> Self {
        match meta.geometry_type {
            GeometryType::Point => Geometry::Point {
                meta,
                coords: Vec::new(),
            },
            GeometryType::LineString => Geometry::LineString {
                meta,
                coords: Vec::new(),
            },
            GeometryType::Polygon => Geometry::Polygon {
                meta,
                rings: Vec::new(),
            },
            GeometryType::MultiPoint
            | GeometryType::MultiLineString
            | GeometryType::MultiPolygon
            | GeometryType::GeometryCollection => Geometry::Collection {
                meta,
                geometries: Vec::new(),
            },
        }
    }

    pub fn meta(&self) -> &GeometryMeta {
        match self {
            Geometry::Point { meta, .. }
            | Geometry::LineString { meta, .. }
            | Geometry::Polygon { meta, .. }
            | Geometry::Collection { meta, .. } => meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut GeometryMeta {
        match self {
            Geometry::Point { meta, .. }
            | Geometry::LineString { meta, .. }
            | Geometry::Polygon { meta, .. }
            | Geometry::Collection { meta, .. } => meta,
        }
    }

    /// The number of coordinates, rings or parts actually held.
    pub fn size(&self) -> usize {
        match self {
            Geometry::Point { coords, .. } | Geometry::LineString { coords, .. } => coords.len(),
            Geometry::Polygon { rings, .. } => rings.len(),
            Geometry::Collection { geometries, .. } => geometries.len(),
        }
    }

    /// Records the realized size on the meta.
    pub fn finalize(&mut self) {
        let size = self.size() as u32;
        self.meta_mut().size = Some(size);
    }

    /// Appends a coordinate to a point, a linestring, the last ring of a polygon or the last
    /// part of a collection.
    pub fn add_coord(&mut self, coord: Coord) -> Result<()> {
        match self {
            Geometry::Point { coords, .. } | Geometry::LineString { coords, .. } => {
                coords.push(coord);
                Ok(())
            }
            Geometry::Polygon { rings, .. } => match rings.last_mut() {
                Some(ring) => {
                    ring.push(coord);
                    Ok(())
                }
                None => Err(WkError::InvalidGeometry(
                    "coordinate in a polygon without a ring".to_string(),
                )),
            },
            Geometry::Collection { geometries, .. } => match geometries.last_mut() {
                Some(geometry) => geometry.add_coord(coord),
                None => Err(WkError::InvalidGeometry(
                    "coordinate in a collection without a part".to_string(),
                )),
            },
        }
    }

    /// Starts a new ring; only polygons have rings.
    pub fn add_ring(&mut self) -> Result<()> {
        match self {
            Geometry::Polygon { rings, .. } => {
                rings.push(Vec::new());
                Ok(())
            }
            other => Err(WkError::InvalidGeometry(format!(
                "ring in a {}",
                other.meta().geometry_type
            ))),
        }
    }

    /// Appends a part; only collections have parts.
    pub fn add_child(&mut self, child: Geometry) -> Result<()> {
        match self {
            Geometry::Collection { geometries, .. } => {
                geometries.push(child);
                Ok(())
            }
            other => Err(WkError::InvalidGeometry(format!(
                "{} nested in a {}",
                child.meta().geometry_type,
                other.meta().geometry_type
            ))),
        }
    }

    /// Replays this geometry through `handler`.
    pub fn process<H: GeometryHandler + ?Sized>(&self, handler: &mut H, part_id: u32) -> Result<()> {
        let meta = self.meta();
        handler.geometry_start(meta, part_id)?;

        match self {
            Geometry::Point { coords, .. } | Geometry::LineString { coords, .. } => {
                for (coord_id, coord) in coords.iter().enumerate() {
                    handler.coord(meta, coord, coord_id as u32)?;
                }
            }
            Geometry::Polygon { rings, .. } => {
                for (ring_id, ring) in rings.iter().enumerate() {
                    let size = Some(ring.len() as u32);
                    handler.ring_start(meta, size, ring_id as u32)?;
                    for (coord_id, coord) in ring.iter().enumerate() {
                        handler.coord(meta, coord, coord_id as u32)?;
                    }
                    handler.ring_end(meta, size, ring_id as u32)?;
                }
            }
            Geometry::Collection { geometries, .. } => {
                for (child_id, child) in geometries.iter().enumerate() {
                    child.process(handler, child_id as u32)?;
                }
            }
        }

        handler.geometry_end(meta, part_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handler::PART_ID_NONE;
    use crate::test::EventLog;

    fn polygon() -> Geometry {
        let mut polygon = Geometry::new(GeometryMeta::new(GeometryType::Polygon));
        polygon.add_ring().unwrap();
        for (x, y) in [(0., 0.), (1., 0.), (0., 1.), (0., 0.)] {
            polygon.add_coord(Coord::xy(x, y)).unwrap();
        }
        polygon.finalize();
        polygon
    }

    #[test]
    fn builds_and_replays_polygon() {
        let polygon = polygon();
        assert_eq!(polygon.meta().size, Some(1));

        let mut log = EventLog::default();
        polygon.process(&mut log, PART_ID_NONE).unwrap();
        assert_eq!(log.events[0], "geometry_start(POLYGON [1], NONE)");
        assert_eq!(log.events[1], "ring_start(4, 0)");
        assert_eq!(log.events[5], "coord(0 0, 3)");
        assert_eq!(log.events[6], "ring_end(4, 0)");
    }

    #[test]
    fn collection_delegates_coordinates_to_last_part() {
        let mut multi = Geometry::new(GeometryMeta::new(GeometryType::MultiLineString));
        multi
            .add_child(Geometry::new(GeometryMeta::new(GeometryType::LineString)))
            .unwrap();
        multi.add_coord(Coord::xy(1., 2.)).unwrap();
        multi.add_coord(Coord::xy(3., 4.)).unwrap();

        match &multi {
            Geometry::Collection { geometries, .. } => assert_eq!(geometries[0].size(), 2),
            _ => unreachable!(),
        }
    }

    #[test]
    fn structural_misuse_is_reported() {
        let mut point = Geometry::new(GeometryMeta::new(GeometryType::Point));
        assert!(point.add_ring().is_err());
        assert!(point.add_child(polygon()).is_err());

        let mut empty_polygon = Geometry::new(GeometryMeta::new(GeometryType::Polygon));
        assert!(empty_polygon.add_coord(Coord::xy(0., 0.)).is_err());

        let mut collection = Geometry::new(GeometryMeta::new(GeometryType::GeometryCollection));
        let err = collection.add_coord(Coord::xy(0., 0.)).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn replays_parts_with_their_index() {
        let mut collection = Geometry::new(GeometryMeta::new(GeometryType::GeometryCollection));
        collection.add_child(polygon()).unwrap();
        collection.add_child(polygon()).unwrap();
        collection.finalize();

        let mut log = EventLog::default();
        collection.process(&mut log, PART_ID_NONE).unwrap();
        assert_eq!(
            log.started(),
            vec![
                "geometry_start(GEOMETRYCOLLECTION [2], NONE)",
                "geometry_start(POLYGON [1], 0)",
                "geometry_start(POLYGON [1], 1)",
            ]
        );
    }
}
