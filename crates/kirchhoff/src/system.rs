//! Per-vertex conservation equations as a dense rational matrix.
//!
//! For every vertex (position order) and every dependent column `i` one row:
//! coordinate slot `j` contributes `-B[j,i]` on its incoming edge and
//! `+B[j,i]` on its outgoing edge; the cross slot `dimensions + i` contributes
//! `+1` incoming and `-1` outgoing. A weighting `w` is consistent with the
//! matrix at every vertex iff `E w = 0`.

use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_traits::Zero;

use crate::lattice::{Frame, VectorId};
use crate::matrix::InputMatrix;
use crate::rational::Rational;

/// Generated system `E`; columns are edge pins.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSystem {
    matrix: DMatrix<Rational>,
}

impl LinearSystem {
    #[inline]
    pub fn matrix(&self) -> &DMatrix<Rational> {
        &self.matrix
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Dense rows, the layout the simplex works on.
    pub fn rows(&self) -> Vec<Vec<Rational>> {
        (0..self.nrows())
            .map(|r| self.matrix.row(r).iter().cloned().collect())
            .collect()
    }

    /// `E w`, exactly. Pre: `w.len() == ncols()`.
    pub fn residual(&self, w: &[Rational]) -> Vec<Rational> {
        debug_assert_eq!(w.len(), self.ncols());
        (0..self.nrows())
            .map(|r| {
                self.matrix
                    .row(r)
                    .iter()
                    .zip(w)
                    .filter(|(a, _)| !a.is_zero())
                    .fold(Rational::zero(), |acc, (a, x)| acc + a * x)
            })
            .collect()
    }

    pub fn is_satisfied_by(&self, w: &[Rational]) -> bool {
        w.len() == self.ncols() && self.residual(w).iter().all(Zero::is_zero)
    }

    /// Integer-weight variant of [`LinearSystem::is_satisfied_by`].
    pub fn is_satisfied_by_integers(&self, w: &[BigInt]) -> bool {
        let as_rational: Vec<Rational> = w.iter().cloned().map(Rational::from_integer).collect();
        self.is_satisfied_by(&as_rational)
    }
}

/// Build `E` for the current frame.
///
/// Pre: `frame` was built from `matrix`.
pub fn generate_linear_system(frame: &Frame, matrix: &InputMatrix) -> LinearSystem {
    let dims = matrix.dimensions();
    let cols = matrix.columns();
    let n = frame.edge_count();
    let mut e = DMatrix::<Rational>::zeros(frame.vertex_count() * cols, n);
    let one = Rational::from_integer(BigInt::from(1));
    for (v_idx, vertex) in frame.vertices().enumerate() {
        for i in 0..cols {
            let row = v_idx * cols + i;
            for j in 0..dims {
                let b = matrix.entry(j, i);
                let slot = vertex.slot(VectorId(j));
                if let Some(p) = slot.incoming {
                    e[(row, p.0)] = -b.clone();
                }
                if let Some(p) = slot.outgoing {
                    e[(row, p.0)] = b.clone();
                }
            }
            let slot = vertex.slot(VectorId(dims + i));
            if let Some(p) = slot.incoming {
                e[(row, p.0)] = one.clone();
            }
            if let Some(p) = slot.outgoing {
                e[(row, p.0)] = -one.clone();
            }
        }
    }
    LinearSystem { matrix: e }
}
