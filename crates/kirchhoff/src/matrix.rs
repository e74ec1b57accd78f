//! Input matrix: the dependent half `B` of an `[I | B]` basis representation.
//!
//! Row `d` holds the `d`-th basis coordinate of every dependent vector, so
//! column `i` is the displacement of cross vector `dimensions + i` on the
//! lattice. The identity block is implicit.

use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_traits::{One, Signed};

use crate::rational::{ceil_to_usize, common_denominator, Rational};

/// Validation failures when building an [`InputMatrix`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    #[error("matrix has no rows")]
    NoRows,
    #[error("matrix has no columns")]
    NoColumns,
    #[error("row {row} has {found} entries, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row} has an entry too large for a lattice extent")]
    ExtentOverflow { row: usize },
}

/// Validated `dimensions x columns` rational matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct InputMatrix {
    m: DMatrix<Rational>,
}

impl InputMatrix {
    /// Build from rows; all rows must have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<Rational>>) -> Result<Self, MatrixError> {
        let dims = rows.len();
        if dims == 0 {
            return Err(MatrixError::NoRows);
        }
        let cols = rows[0].len();
        if cols == 0 {
            return Err(MatrixError::NoColumns);
        }
        for (row, r) in rows.iter().enumerate() {
            if r.len() != cols {
                return Err(MatrixError::Ragged {
                    row,
                    expected: cols,
                    found: r.len(),
                });
            }
        }
        let m = DMatrix::from_fn(dims, cols, |i, j| rows[i][j].clone());
        let out = Self { m };
        // Reject extents that cannot be represented before anything is built.
        for row in 0..dims {
            out.row_extent(row)?;
        }
        Ok(out)
    }

    /// Convenience for integer matrices (tests, samples, benches).
    pub fn from_integers<R: AsRef<[i64]>>(rows: &[R]) -> Result<Self, MatrixError> {
        Self::from_rows(
            rows.iter()
                .map(|r| r.as_ref().iter().map(|&v| Rational::from_integer(BigInt::from(v))).collect())
                .collect(),
        )
    }

    /// Number of lattice dimensions (rows).
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.m.nrows()
    }

    /// Number of dependent vectors (columns).
    #[inline]
    pub fn columns(&self) -> usize {
        self.m.ncols()
    }

    /// Total vector types: coordinate vectors followed by cross vectors.
    #[inline]
    pub fn num_vectors(&self) -> usize {
        self.dimensions() + self.columns()
    }

    #[inline]
    pub fn entry(&self, row: usize, col: usize) -> &Rational {
        &self.m[(row, col)]
    }

    /// Displacement of dependent vector `col` (a column of the matrix).
    pub fn column(&self, col: usize) -> Vec<Rational> {
        self.m.column(col).iter().cloned().collect()
    }

    pub fn rows(&self) -> Vec<Vec<Rational>> {
        (0..self.dimensions())
            .map(|r| self.m.row(r).iter().cloned().collect())
            .collect()
    }

    /// Finest subdivision per dimension: least common denominator of each row.
    pub fn steps(&self) -> Vec<BigInt> {
        (0..self.dimensions())
            .map(|r| common_denominator(self.m.row(r).iter()))
            .collect()
    }

    /// Seed extent per dimension: largest |entry| of the row, rounded up, at least 1.
    pub fn first_shape(&self) -> Vec<usize> {
        (0..self.dimensions())
            .map(|r| self.row_extent(r).unwrap_or(1))
            .collect()
    }

    fn row_extent(&self, row: usize) -> Result<usize, MatrixError> {
        let max = self
            .m
            .row(row)
            .iter()
            .map(|v| v.abs())
            .max()
            .unwrap_or_else(Rational::one);
        let extent = ceil_to_usize(&max).ok_or(MatrixError::ExtentOverflow { row })?;
        Ok(extent.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::{int, ratio};

    #[test]
    fn rejects_malformed_rows() {
        assert_eq!(InputMatrix::from_rows(vec![]), Err(MatrixError::NoRows));
        assert_eq!(
            InputMatrix::from_rows(vec![vec![]]),
            Err(MatrixError::NoColumns)
        );
        let ragged = vec![vec![int(1), int(2)], vec![int(3)]];
        assert_eq!(
            InputMatrix::from_rows(ragged),
            Err(MatrixError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn steps_and_first_shape() {
        let m = InputMatrix::from_rows(vec![
            vec![ratio(-3, 2), ratio(1, 2)],
            vec![ratio(1, 2), ratio(1, 3)],
            vec![int(0), int(0)],
        ])
        .unwrap();
        assert_eq!(m.dimensions(), 3);
        assert_eq!(m.columns(), 2);
        assert_eq!(m.num_vectors(), 5);
        assert_eq!(
            m.steps(),
            vec![BigInt::from(2), BigInt::from(6), BigInt::from(1)]
        );
        // ceil(3/2) = 2; ceil(1/2) = 1; zero row still gets extent 1.
        assert_eq!(m.first_shape(), vec![2, 1, 1]);
        assert_eq!(m.column(0), vec![ratio(-3, 2), ratio(1, 2), int(0)]);
    }

    #[test]
    fn integer_constructor_matches_rows() {
        let m = InputMatrix::from_integers(&[[2, 1], [1, 2]]).unwrap();
        assert_eq!(m.entry(0, 1), &int(1));
        assert_eq!(m.rows(), vec![vec![int(2), int(1)], vec![int(1), int(2)]]);
        assert_eq!(m.first_shape(), vec![2, 2]);
    }
}
