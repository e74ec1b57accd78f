//! Exact two-phase simplex over `BigRational`.
//!
//! Purpose
//! - Decide whether the Kirchhoff system `E w = 0, w >= 0` has a non-trivial
//!   solution, and produce one. The normalization `sum(w) >= 1` is added as
//!   one more equality row with a surplus column.
//! - Offer a general `min c.x, A x = b, x >= 0` solver for tests and callers.
//!
//! Why this design
//! - Exact rationals: degenerate tableaus are the norm here (the right-hand
//!   side is almost all zeros) and any epsilon would misclassify them.
//! - Bland's rule on both the entering column and ties in the ratio test, so
//!   degenerate cycling cannot happen. `SimplexCfg::max_pivots` exists so
//!   tests can assert termination rather than hang.
//!
//! Layout: `tableau.rs` (state + pivoting), `phase.rs` (two-phase driver).

mod phase;
mod tableau;

use nalgebra::DMatrix;
use num_traits::{One, Zero};

use crate::rational::Rational;

pub use phase::{LinearProgram, LpOutcome};
pub use tableau::{Tableau, TableauState};

/// Simplex configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimplexCfg {
    /// Total pivot budget per solve; `None` runs to completion.
    pub max_pivots: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimplexError {
    #[error("pivot limit of {limit} reached")]
    PivotLimit { limit: usize },
    #[error("phase {phase} objective is unbounded along column {col}")]
    Unbounded { phase: u8, col: usize },
    #[error("{what} has {found} entries, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Non-negative `w` with `E w = 0` and `sum(w) >= 1`, or `None` if none exists.
///
/// Returns a basic feasible point of the phase I problem, restricted to the
/// `E.ncols()` weight columns.
pub fn solve_kirky(e: &DMatrix<Rational>, cfg: SimplexCfg) -> Result<Option<Vec<Rational>>, SimplexError> {
    let n = e.ncols();
    let mut a = Vec::with_capacity(e.nrows() + 1);
    for r in 0..e.nrows() {
        let mut row: Vec<Rational> = e.row(r).iter().cloned().collect();
        row.push(Rational::zero());
        a.push(row);
    }
    let mut normalization = vec![Rational::one(); n];
    normalization.push(-Rational::one());
    a.push(normalization);
    let mut b = vec![Rational::zero(); e.nrows()];
    b.push(Rational::one());
    let lp = LinearProgram::new(a, b, vec![Rational::zero(); n + 1])?;
    let point = lp.feasible_point(cfg)?;
    tracing::trace!(
        rows = lp.num_constraints(),
        cols = n,
        feasible = point.is_some(),
        "solve_kirky"
    );
    Ok(point.map(|mut x| {
        x.truncate(n);
        x
    }))
}

#[cfg(test)]
mod tests;
