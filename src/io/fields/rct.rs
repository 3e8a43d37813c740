use crate::coord::Coord;
use crate::error::Result;
use crate::handler::{GeometryHandler, PART_ID_NONE};
use crate::io::fields::FieldsProvider;
use crate::io::ReadFeature;
use crate::meta::{GeometryMeta, GeometryType};

/// Reads `xmin`, `ymin`, `xmax`, `ymax` columns as closed rectangular polygons.
///
/// A rectangle whose width or height is NaN or negative infinity is an empty polygon. Infinite
/// positive extents are kept, so a rectangle can cover everything.
pub struct RctReader {
    provider: FieldsProvider,
}

impl RctReader {
    pub fn new(provider: FieldsProvider) -> Self {
        Self { provider }
    }

    pub fn into_provider(self) -> FieldsProvider {
        self.provider
    }
}

fn is_empty_extent(extent: f64) -> bool {
    extent.is_nan() || extent == f64::NEG_INFINITY
}

impl ReadFeature for RctReader {
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

        let xmin = self.provider.field(0)?;
        let ymin = self.provider.field(1)?;
        let xmax = self.provider.field(2)?;
        let ymax = self.provider.field(3)?;

        if is_empty_extent(xmax - xmin) || is_empty_extent(ymax - ymin) {
            let meta = GeometryMeta::new(GeometryType::Polygon).with_size(0);
            handler.geometry_start(&meta, PART_ID_NONE)?;
            handler.geometry_end(&meta, PART_ID_NONE)?;
        } else {
            let meta = GeometryMeta::new(GeometryType::Polygon).with_size(1);
            let ring = [
                Coord::xy(xmin, ymin),
                Coord::xy(xmax, ymin),
                Coord::xy(xmax, ymax),
                Coord::xy(xmin, ymax),
                Coord::xy(xmin, ymin),
            ];

            handler.geometry_start(&meta, PART_ID_NONE)?;
            handler.ring_start(&meta, Some(5), 0)?;
            for (coord_id, coord) in ring.iter().enumerate() {
                handler.coord(&meta, coord, coord_id as u32)?;
            }
            handler.ring_end(&meta, Some(5), 0)?;
            handler.geometry_end(&meta, PART_ID_NONE)?;
        }

        handler.feature_end(feature_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::WkError;
    use crate::io::wkt::WktWriter;
    use crate::io::{translate, Provider, WktExporter};

    fn rct_to_wkt(columns: Vec<Vec<f64>>) -> Vec<Option<String>> {
        let provider = FieldsProvider::new(columns).unwrap();
        let mut writer = WktWriter::new(WktExporter::new(provider.n_features()));
        translate(RctReader::new(provider), &mut writer).unwrap();
        writer.into_exporter().into_output()
    }

    #[test]
    fn rectangles_become_closed_rings() {
        assert_eq!(
            rct_to_wkt(vec![vec![0.], vec![1.], vec![2.], vec![3.]]),
            vec![Some("POLYGON ((0 1, 2 1, 2 3, 0 3, 0 1))".to_string())]
        );
    }

    #[test]
    fn degenerate_rectangles_are_empty() {
        let nan = f64::NAN;
        let inf = f64::INFINITY;
        assert_eq!(
            rct_to_wkt(vec![
                vec![nan, 0., inf, -inf],
                vec![0., 0., 0., 0.],
                vec![1., 1., 1., inf],
                vec![1., nan, 1., 1.],
            ]),
            vec![
                Some("POLYGON EMPTY".to_string()),
                Some("POLYGON EMPTY".to_string()),
                Some("POLYGON EMPTY".to_string()),
                Some("POLYGON ((-inf 0, inf 0, inf 1, -inf 1, -inf 0))".to_string()),
            ]
        );
    }

    #[test]
    fn missing_columns_are_reported() {
        let provider = FieldsProvider::new(vec![vec![0.], vec![0.]]).unwrap();
        let mut writer = WktWriter::new(WktExporter::new(1));
        let err = translate(RctReader::new(provider), &mut writer).unwrap_err();
        assert!(matches!(err, WkError::IndexOutOfRange(_)));
    }
}
