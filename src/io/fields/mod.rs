//! Geometries stored as parallel numeric columns rather than encoded blobs.
//!
//! [`FieldsProvider`] and [`FieldsExporter`] hold one `Vec<f64>` per field with one row per
//! feature. The readers and writers in this module decide what the fields mean.

mod coords;
mod rct;
mod xyzm;

pub use coords::{
    CoordColumns, CoordProvider, CoordReader, LineStringCoordProvider, PointCoordProvider,
    PolygonCoordProvider,
};
pub use rct::RctReader;
pub use xyzm::{XyzmReader, XyzmWriter};

use crate::error::{Result, WkError};
use crate::io::{Exporter, Provider};

/// Checks that every column has the same length and returns it.
fn column_length(columns: &[Vec<f64>]) -> Result<usize> {
    let n = columns.first().map_or(0, |column| column.len());
    if let Some((i, column)) = columns.iter().enumerate().find(|(_, c)| c.len() != n) {
        return Err(WkError::InvalidArgument(format!(
            "column {i} has {} values, expected {n}",
            column.len()
        )));
    }
    Ok(n)
}

/// Rows of equal-length numeric columns, one row per feature.
///
/// No row is ever null at this level; readers that need a null representation resolve it from
/// the values themselves.
#[derive(Debug, Clone)]
pub struct FieldsProvider {
    columns: Vec<Vec<f64>>,
    n_features: usize,
    index: Option<usize>,
}

impl FieldsProvider {
    pub fn new(columns: Vec<Vec<f64>>) -> Result<Self> {
        let n_features = column_length(&columns)?;
        Ok(Self {
            columns,
            n_features,
            index: None,
        })
    }

    pub fn n_fields(&self) -> usize {
        self.columns.len()
    }

    /// The value of field `field` in the current row.
    pub fn field(&self, field: usize) -> Result<f64> {
        let row = self
            .index
            .ok_or_else(|| WkError::IndexOutOfRange("no current feature".to_string()))?;
        self.columns
            .get(field)
            .and_then(|column| column.get(row))
            .copied()
            .ok_or_else(|| {
                WkError::IndexOutOfRange(format!(
                    "field {field} of row {row} in {} fields",
                    self.columns.len()
                ))
            })
    }
}

impl Provider for FieldsProvider {
    fn seek_next_feature(&mut self) -> bool {
        let next = self.index.map_or(0, |i| i + 1);
        self.index = Some(next);
        next < self.n_features
    }

    fn feature_is_null(&self) -> bool {
        false
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn reset(&mut self) {
        self.index = None;
    }
}

/// Collects one row of numeric fields per feature.
#[derive(Debug, Clone)]
pub struct FieldsExporter {
    columns: Vec<Vec<f64>>,
    n_features: usize,
    index: usize,
}

impl FieldsExporter {
    /// `n_fields` columns of `n_features` NaN values.
    pub fn new(n_fields: usize, n_features: usize) -> Self {
        Self {
            columns: vec![vec![f64::NAN; n_features]; n_fields],
            n_features,
            index: 0,
        }
    }

    pub fn n_fields(&self) -> usize {
        self.columns.len()
    }

    /// Sets field `field` of the row being written.
    pub fn set_field(&mut self, field: usize, value: f64) -> Result<()> {
        let row = self.index;
        let n_fields = self.columns.len();
        let slot = self
            .columns
            .get_mut(field)
            .and_then(|column| column.get_mut(row))
            .ok_or_else(|| {
                WkError::IndexOutOfRange(format!("field {field} of row {row} in {n_fields} fields"))
            })?;
        *slot = value;
        Ok(())
    }

    pub fn into_columns(self) -> Vec<Vec<f64>> {
        self.columns
    }
}

impl Exporter for FieldsExporter {
    fn prepare_next_feature(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_null(&mut self) -> Result<()> {
        Err(WkError::InvalidArgument(
            "write_null() is not meaningful for a fields exporter".to_string(),
        ))
    }

    fn write_next_feature(&mut self) -> Result<()> {
        if self.index >= self.n_features {
            return Err(WkError::IndexOutOfRange(format!(
                "feature {} of an exporter sized for {}",
                self.index, self.n_features
            )));
        }
        self.index += 1;
        Ok(())
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn provider_reads_rows() {
        let mut provider = FieldsProvider::new(vec![vec![1., 2.], vec![3., 4.]]).unwrap();
        assert_eq!(provider.n_features(), 2);
        assert_eq!(provider.n_fields(), 2);
        assert!(provider.field(0).is_err());

        assert!(provider.seek_next_feature());
        assert_eq!(provider.field(1).unwrap(), 3.);
        assert!(provider.seek_next_feature());
        assert_eq!(provider.field(0).unwrap(), 2.);
        assert!(matches!(
            provider.field(2),
            Err(WkError::IndexOutOfRange(_))
        ));
        assert!(!provider.seek_next_feature());

        provider.reset();
        assert!(provider.seek_next_feature());
        assert_eq!(provider.field(0).unwrap(), 1.);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = FieldsProvider::new(vec![vec![1., 2.], vec![3.]]).unwrap_err();
        assert!(matches!(err, WkError::InvalidArgument(_)));
    }

    #[test]
    fn no_columns_means_no_features() {
        let mut provider = FieldsProvider::new(Vec::new()).unwrap();
        assert_eq!(provider.n_features(), 0);
        assert!(!provider.seek_next_feature());
    }

    #[test]
    fn exporter_writes_rows() {
        let mut exporter = FieldsExporter::new(2, 2);
        exporter.set_field(0, 1.).unwrap();
        exporter.write_next_feature().unwrap();
        exporter.set_field(1, 2.).unwrap();
        exporter.write_next_feature().unwrap();

        assert!(exporter.set_field(0, 3.).is_err());
        assert!(exporter.write_next_feature().is_err());
        assert!(exporter.write_null().is_err());

        let columns = exporter.into_columns();
        assert_eq!(columns[0][0], 1.);
        assert!(columns[0][1].is_nan());
        assert!(columns[1][0].is_nan());
        assert_eq!(columns[1][1], 2.);
    }
}
