use crate::coord::Coord;
use crate::error::Result;
use crate::handler::{GeometryHandler, PART_ID_NONE};
use crate::io::wkb::Endianness;
use crate::io::{BytesProvider, ReadFeature};
use crate::meta::{EwkbType, GeometryMeta, GeometryType};

/// Decodes (E)WKB features into handler events.
///
/// Every nested geometry carries its own byte-order marker, so parts of one feature may mix
/// big- and little-endian encodings.
pub struct WkbReader<P> {
    provider: P,
    next_handle: u32,
}

impl<P: BytesProvider> WkbReader<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            next_handle: 0,
        }
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    fn read_meta(&mut self) -> Result<(GeometryMeta, Endianness)> {
        let endian = Endianness::try_from(self.provider.read_u8()?)?;
        let ewkb_type = EwkbType::decode(self.provider.read_u32(endian)?)?;

        let mut meta = GeometryMeta::from(ewkb_type).with_handle(self.next_handle);
        self.next_handle += 1;

        if ewkb_type.has_srid {
            meta.srid = Some(self.provider.read_u32(endian)?);
        }

        if meta.geometry_type != GeometryType::Point {
            meta.size = Some(self.provider.read_u32(endian)?);
        }

        Ok((meta, endian))
    }

    fn read_geometry<H: GeometryHandler + ?Sized>(
        &mut self,
        handler: &mut H,
        part_id: u32,
    ) -> Result<()> {
        let (mut meta, endian) = self.read_meta()?;

        match meta.geometry_type {
            GeometryType::Point => {
                // An all-NaN point is how empty points are written.
                let coord = self.read_coord(&meta, endian)?;
                let empty = (0..coord.dim()).all(|i| coord[i].is_nan());
                meta.size = Some(if empty { 0 } else { 1 });

                handler.geometry_start(&meta, part_id)?;
                if !empty {
                    handler.coord(&meta, &coord, 0)?;
                }
            }
            GeometryType::LineString => {
                handler.geometry_start(&meta, part_id)?;
                for coord_id in 0..meta.size.unwrap_or(0) {
                    let coord = self.read_coord(&meta, endian)?;
                    handler.coord(&meta, &coord, coord_id)?;
                }
            }
            GeometryType::Polygon => {
                handler.geometry_start(&meta, part_id)?;
                for ring_id in 0..meta.size.unwrap_or(0) {
                    let size = self.provider.read_u32(endian)?;
                    handler.ring_start(&meta, Some(size), ring_id)?;
                    for coord_id in 0..size {
                        let coord = self.read_coord(&meta, endian)?;
                        handler.coord(&meta, &coord, coord_id)?;
                    }
                    handler.ring_end(&meta, Some(size), ring_id)?;
                }
            }
            GeometryType::MultiPoint
            | GeometryType::MultiLineString
            | GeometryType::MultiPolygon
            | GeometryType::GeometryCollection => {
                handler.geometry_start(&meta, part_id)?;
                for child_id in 0..meta.size.unwrap_or(0) {
                    self.read_geometry(handler, child_id)?;
                }
            }
        }

        handler.geometry_end(&meta, part_id)
    }

    fn read_coord(&mut self, meta: &GeometryMeta, endian: Endianness) -> Result<Coord> {
        let mut coord = Coord::with_dims(meta.has_z, meta.has_m);
        for i in 0..coord.dim() {
            coord[i] = self.provider.read_f64(endian)?;
        }
        Ok(coord)
    }
}

impl<P: BytesProvider> ReadFeature for WkbReader<P> {
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
        self.next_handle = 0;
        handler.feature_start(feature_id)?;

        if self.provider.feature_is_null() {
            handler.null_feature(feature_id)?;
        } else {
            self.read_geometry(handler, PART_ID_NONE)?;
        }

        handler.feature_end(feature_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::WkError;
    use crate::io::{translate, WkbProvider};
    use crate::test::wkb::{big_endian_point_z, little_endian_point_z, multipoint_mixed_endian};
    use crate::test::EventLog;

    fn events(features: Vec<Option<Vec<u8>>>) -> Vec<String> {
        let mut log = EventLog::default();
        translate(WkbReader::new(WkbProvider::new(features)), &mut log).unwrap();
        log.events
    }

    #[test]
    fn byte_order_does_not_change_events() {
        let expected = vec![
            "feature_start(0)",
            "geometry_start(POINT Z [1], NONE)",
            "coord(1 2 3, 0)",
            "geometry_end(POINT Z [1], NONE)",
            "feature_end(0)",
        ];
        assert_eq!(events(vec![Some(little_endian_point_z())]), expected);
        assert_eq!(events(vec![Some(big_endian_point_z())]), expected);
    }

    #[test]
    fn per_part_byte_order() {
        assert_eq!(
            events(vec![Some(multipoint_mixed_endian()), None]),
            vec![
                "feature_start(0)",
                "geometry_start(MULTIPOINT [2], NONE)",
                "geometry_start(POINT [1], 0)",
                "coord(1 2, 0)",
                "geometry_end(POINT [1], 0)",
                "geometry_start(POINT [1], 1)",
                "coord(3 4, 0)",
                "geometry_end(POINT [1], 1)",
                "geometry_end(MULTIPOINT [2], NONE)",
                "feature_end(0)",
                "feature_start(1)",
                "null_feature(1)",
                "feature_end(1)",
            ]
        );
    }

    #[test]
    fn polygon_rings_carry_sizes() {
        // POLYGON ((0 0, 1 0, 0 1, 0 0)) with SRID 4326
        let mut wkb = vec![0x01];
        wkb.extend_from_slice(&(3u32 | 0x20000000).to_le_bytes());
        wkb.extend_from_slice(&4326u32.to_le_bytes());
        wkb.extend_from_slice(&1u32.to_le_bytes());
        wkb.extend_from_slice(&4u32.to_le_bytes());
        for v in [0., 0., 1., 0., 0., 1., 0., 0.] {
            wkb.extend_from_slice(&f64::to_le_bytes(v));
        }

        let events = events(vec![Some(wkb)]);
        assert_eq!(events[1], "geometry_start(POLYGON SRID=4326 [1], NONE)");
        assert_eq!(events[2], "ring_start(4, 0)");
        assert_eq!(events[6], "coord(0 0, 3)");
        assert_eq!(events[7], "ring_end(4, 0)");
    }

    #[test]
    fn nan_point_reads_as_empty() {
        let mut wkb = vec![0x01];
        wkb.extend_from_slice(&1u32.to_le_bytes());
        wkb.extend_from_slice(&f64::NAN.to_le_bytes());
        wkb.extend_from_slice(&f64::NAN.to_le_bytes());

        assert_eq!(
            events(vec![Some(wkb)]),
            vec![
                "feature_start(0)",
                "geometry_start(POINT [0], NONE)",
                "geometry_end(POINT [0], NONE)",
                "feature_end(0)",
            ]
        );
    }

    #[test]
    fn malformed_input_is_recoverable() {
        let mut log = EventLog::swallowing();
        let truncated = little_endian_point_z()[..12].to_vec();
        let bad_type = vec![0x01, 0x09, 0x00, 0x00, 0x00];
        let bad_endian = vec![0x02, 0x01, 0x00, 0x00, 0x00];
        translate(
            WkbReader::new(WkbProvider::new(vec![
                Some(truncated),
                Some(bad_type),
                Some(bad_endian),
                Some(little_endian_point_z()),
            ])),
            &mut log,
        )
        .unwrap();

        assert_eq!(log.errors.len(), 3);
        assert_eq!(log.errors[0], (0, "Reached end of WKB input".to_string()));
        assert_eq!(log.events.last().unwrap(), "feature_end(3)");
    }

    #[test]
    fn unknown_type_aborts_by_default() {
        let mut log = EventLog::default();
        let err = translate(
            WkbReader::new(WkbProvider::new(vec![Some(vec![0x00, 0, 0, 0, 0])])),
            &mut log,
        )
        .unwrap_err();
        assert!(matches!(err, WkError::WkbParse(_)));
    }
}
