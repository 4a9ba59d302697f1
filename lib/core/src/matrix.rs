use crate::error::{Error, Result};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// Row-major feature matrix, one row per book.
///
/// Every row has exactly `n_cols` components. Rows keep the order of the
/// book list they were encoded from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureMatrix {
    n_cols: usize,
    rows: Vec<Vector>,
}

impl FeatureMatrix {
    #[inline]
    #[must_use]
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(n_cols: usize, n_rows: usize) -> Self {
        Self {
            n_cols,
            rows: Vec::with_capacity(n_rows),
        }
    }

    /// Build a matrix from rows, all of which must share one width
    pub fn from_rows(n_cols: usize, rows: Vec<Vector>) -> Result<Self> {
        let mut matrix = Self::with_capacity(n_cols, rows.len());
        for row in rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    pub fn push_row(&mut self, row: Vector) -> Result<()> {
        if row.dim() != self.n_cols {
            return Err(Error::InvalidDimension {
                expected: self.n_cols,
                actual: row.dim(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&Vector> {
        self.rows.get(index)
    }

    #[inline]
    pub fn rows(&self) -> &[Vector] {
        &self.rows
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.rows.get(row).and_then(|r| r.as_slice().get(col).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_checks_width() {
        let mut matrix = FeatureMatrix::new(2);
        assert!(matrix.push_row(Vector::new(vec![1.0, 2.0])).is_ok());
        assert!(matches!(
            matrix.push_row(Vector::new(vec![1.0])),
            Err(Error::InvalidDimension { expected: 2, actual: 1 })
        ));
        assert_eq!(matrix.n_rows(), 1);
        assert_eq!(matrix.get(0, 1), Some(2.0));
        assert_eq!(matrix.get(1, 0), None);
    }

    #[test]
    fn test_from_rows() {
        let matrix = FeatureMatrix::from_rows(
            3,
            vec![Vector::zeros(3), Vector::new(vec![1.0, 0.0, 0.0])],
        )
        .unwrap();
        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.n_cols(), 3);
        assert!(!matrix.is_empty());
    }
}
