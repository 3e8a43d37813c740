use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::handler::GeometryHandler;
use crate::io::wkt::{WktWriter, WktWriterOptions};
use crate::io::StringExporter;
use crate::meta::GeometryMeta;

/// A [`WktWriter`] for previews: output stops after `max_coords` coordinates per feature and
/// ends with `...`, and features that fail to parse are written as `!!! <message>` instead of
/// aborting the run.
pub struct WktFormatter<E> {
    writer: WktWriter<E>,
    max_coords: usize,
    n_coords: usize,
}

impl<E: StringExporter> WktFormatter<E> {
    pub fn new(exporter: E, max_coords: usize) -> Self {
        Self::with_options(exporter, max_coords, Default::default())
    }

    pub fn with_options(exporter: E, max_coords: usize, options: WktWriterOptions) -> Self {
        Self {
            writer: WktWriter::with_options(exporter, options),
            max_coords,
            n_coords: 0,
        }
    }

    pub fn into_exporter(self) -> E {
        self.writer.into_exporter()
    }
}

impl<E: StringExporter> GeometryHandler for WktFormatter<E> {
    fn initialize(&mut self) -> Result<()> {
        self.writer.initialize()
    }

    fn feature_start(&mut self, feature_id: usize) -> Result<()> {
        self.n_coords = 0;
        self.writer.feature_start(feature_id)
    }

    fn null_feature(&mut self, feature_id: usize) -> Result<()> {
        self.writer.null_feature(feature_id)
    }

    fn geometry_start(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        self.writer.geometry_start(meta, part_id)
    }

    fn ring_start(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        self.writer.ring_start(meta, size, ring_id)
    }

    fn coord(&mut self, meta: &GeometryMeta, coord: &Coord, coord_id: u32) -> Result<()> {
        self.writer.coord(meta, coord, coord_id)?;
        self.n_coords += 1;
        if self.n_coords >= self.max_coords {
            return Err(WkError::MaxCoordinatesExceeded);
        }
        Ok(())
    }

    fn ring_end(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        self.writer.ring_end(meta, size, ring_id)
    }

    fn geometry_end(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        self.writer.geometry_end(meta, part_id)
    }

    fn feature_end(&mut self, feature_id: usize) -> Result<()> {
        self.writer.feature_end(feature_id)
    }

    fn next_error(&mut self, error: &WkError, feature_id: usize) -> Result<bool> {
        match error {
            WkError::MaxCoordinatesExceeded => self.writer.exporter_mut().write_str("...")?,
            other => self
                .writer
                .exporter_mut()
                .write_str(&format!("!!! {other}"))?,
        }
        self.writer.feature_end(feature_id)?;
        Ok(true)
    }

    fn deinitialize(&mut self) -> Result<()> {
        self.writer.deinitialize()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::wkb::WkbReader;
    use crate::io::wkt::WktReader;
    use crate::io::{translate, WkbProvider, WktExporter, WktProvider};
    use crate::test::wkb::multipoint_mixed_endian;

    fn format(inputs: Vec<Option<&str>>, max_coords: usize) -> Vec<Option<String>> {
        let mut formatter = WktFormatter::new(WktExporter::new(inputs.len()), max_coords);
        translate(WktReader::new(WktProvider::new(inputs)), &mut formatter).unwrap();
        formatter.into_exporter().into_output()
    }

    #[test]
    fn caps_coordinates_with_ellipsis() {
        let line = "LINESTRING (0 0, 1 1, 2 2, 3 3, 4 4, 5 5, 6 6, 7 7, 8 8, 9 9)";
        assert_eq!(
            format(vec![Some(line)], 5),
            vec![Some("LINESTRING (0 0, 1 1, 2 2, 3 3, 4 4...".to_string())]
        );
    }

    #[test]
    fn short_features_are_untouched() {
        assert_eq!(
            format(
                vec![Some("POINT (1 2)"), None, Some("MULTIPOINT EMPTY")],
                5
            ),
            vec![
                Some("POINT (1 2)".to_string()),
                None,
                Some("MULTIPOINT EMPTY".to_string())
            ]
        );
    }

    #[test]
    fn counter_resets_per_feature() {
        assert_eq!(
            format(vec![Some("LINESTRING (0 0, 1 1)"), Some("POINT (2 2)")], 3),
            vec![
                Some("LINESTRING (0 0, 1 1)".to_string()),
                Some("POINT (2 2)".to_string())
            ]
        );
    }

    #[test]
    fn parse_errors_are_annotated() {
        assert_eq!(
            format(vec![Some("POINT (1 TWO)"), Some("POINT (3 4)")], 10),
            vec![
                Some("!!! Expected a number but found 'TWO' (:9)".to_string()),
                Some("POINT (3 4)".to_string())
            ]
        );
    }

    #[test]
    fn formats_wkb() {
        let mut formatter = WktFormatter::new(WktExporter::new(1), 1);
        translate(
            WkbReader::new(WkbProvider::new(vec![Some(multipoint_mixed_endian())])),
            &mut formatter,
        )
        .unwrap();
        assert_eq!(
            formatter.into_exporter().into_output(),
            vec![Some("MULTIPOINT ((1 2...".to_string())]
        );
    }
}
