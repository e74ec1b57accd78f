//! Two-phase driver over [`Tableau`].
//!
//! Phase I adds one auxiliary column per row and minimizes their sum; the
//! program is feasible iff that optimum is exactly zero. Phase II pivots any
//! auxiliary still basic (at level zero) out of the basis, drops rows that
//! turn out redundant, strips the auxiliary block, installs the real costs
//! and runs the same pivot loop.

use num_traits::{One, Signed, Zero};

use crate::rational::Rational;

use super::tableau::{Tableau, TableauState};
use super::{SimplexCfg, SimplexError};

/// `min c.x  s.t.  A x = b, x >= 0` over exact rationals.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProgram {
    a: Vec<Vec<Rational>>,
    b: Vec<Rational>,
    c: Vec<Rational>,
}

/// Result of [`LinearProgram::solve`].
#[derive(Clone, Debug, PartialEq)]
pub enum LpOutcome {
    Optimal { x: Vec<Rational>, value: Rational },
    Infeasible,
    Unbounded,
}

impl LinearProgram {
    /// `a` is `m x n` with `n == c.len()`, `b` has `m` entries.
    pub fn new(a: Vec<Vec<Rational>>, b: Vec<Rational>, c: Vec<Rational>) -> Result<Self, SimplexError> {
        if b.len() != a.len() {
            return Err(SimplexError::ShapeMismatch {
                what: "right-hand side",
                expected: a.len(),
                found: b.len(),
            });
        }
        if let Some(row) = a.iter().find(|row| row.len() != c.len()) {
            return Err(SimplexError::ShapeMismatch {
                what: "constraint row",
                expected: c.len(),
                found: row.len(),
            });
        }
        Ok(Self { a, b, c })
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.c.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.a.len()
    }

    /// Full two-phase solve.
    pub fn solve(&self, cfg: SimplexCfg) -> Result<LpOutcome, SimplexError> {
        let n = self.num_vars();
        let Some(mut t) = self.phase_one(cfg)? else {
            return Ok(LpOutcome::Infeasible);
        };
        drive_out_auxiliaries(&mut t, n);
        t.install_objective(&self.c);
        let outcome = match t.run(cfg.max_pivots)? {
            TableauState::Unbounded { .. } => LpOutcome::Unbounded,
            _ => LpOutcome::Optimal {
                x: t.solution(n),
                value: t.value().clone(),
            },
        };
        tracing::trace!(pivots = t.pivots(), "phase II done");
        Ok(outcome)
    }

    /// Phase I only: some basic feasible point, or `None`.
    pub fn feasible_point(&self, cfg: SimplexCfg) -> Result<Option<Vec<Rational>>, SimplexError> {
        Ok(self.phase_one(cfg)?.map(|t| t.solution(self.num_vars())))
    }

    /// Build and run the auxiliary problem; `None` if its optimum is positive.
    fn phase_one(&self, cfg: SimplexCfg) -> Result<Option<Tableau>, SimplexError> {
        let m = self.num_constraints();
        let n = self.num_vars();
        let mut rows = Vec::with_capacity(m);
        let mut rhs = Vec::with_capacity(m);
        for (i, (row, b)) in self.a.iter().zip(&self.b).enumerate() {
            let flip = b.is_negative();
            let mut r: Vec<Rational> = Vec::with_capacity(n + m);
            r.extend(row.iter().map(|v| if flip { -v } else { v.clone() }));
            r.extend((0..m).map(|k| if k == i { Rational::one() } else { Rational::zero() }));
            rows.push(r);
            rhs.push(if flip { -b } else { b.clone() });
        }
        // Costs are 1 on auxiliaries; pricing them out leaves minus the column sums.
        let mut objective = vec![Rational::zero(); n + m];
        for r in &rows {
            for (o, v) in objective.iter_mut().zip(&r[..n]) {
                if !v.is_zero() {
                    *o -= v;
                }
            }
        }
        let value = rhs.iter().fold(Rational::zero(), |acc, b| acc + b);
        let basis = (n..n + m).collect();
        let mut t = Tableau::new(rows, rhs, objective, value, basis);
        if let TableauState::Unbounded { col } = t.run(cfg.max_pivots)? {
            // Phase I is bounded below by zero.
            return Err(SimplexError::Unbounded { phase: 1, col });
        }
        tracing::trace!(pivots = t.pivots(), feasible = t.value().is_zero(), "phase I done");
        if !t.value().is_zero() {
            return Ok(None);
        }
        Ok(Some(t))
    }
}

/// Pivot zero-level auxiliaries out of the basis, or drop their row if it has
/// no non-zero structural entry, then strip the auxiliary columns.
fn drive_out_auxiliaries(t: &mut Tableau, n: usize) {
    let mut r = 0;
    while r < t.nrows() {
        if t.basis()[r] < n {
            r += 1;
            continue;
        }
        match (0..n).find(|&j| !t.entry(r, j).is_zero()) {
            Some(j) => {
                t.pivot(r, j);
                r += 1;
            }
            None => t.drop_row(r),
        }
    }
    t.truncate_columns(n);
}
