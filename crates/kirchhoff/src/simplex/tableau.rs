//! Dense exact tableau with Bland's-rule pivoting.

use std::cmp::Ordering;

use num_traits::{One, Signed, Zero};

use crate::rational::Rational;

use super::SimplexError;

/// Pivots between two `trace!` lines of the pivot loop.
const TRACE_EVERY: usize = 256;

/// What the next step of the pivot loop would be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableauState {
    /// A pivot exists at `(row, col)`.
    Unsolved { row: usize, col: usize },
    /// No reduced cost is negative; the basic solution is optimal.
    Solved,
    /// Column `col` prices negative but has no positive entry.
    Unbounded { col: usize },
}

/// Minimization tableau in canonical form with respect to `basis`.
#[derive(Clone, Debug)]
pub struct Tableau {
    rows: Vec<Vec<Rational>>,
    rhs: Vec<Rational>,
    /// Reduced costs; zero on basic columns.
    objective: Vec<Rational>,
    /// Objective at the current basic solution.
    value: Rational,
    /// `basis[r]` is the column whose unit vector sits in row `r`.
    basis: Vec<usize>,
    pivots: usize,
}

impl Tableau {
    /// Pre: every row has `objective.len()` entries, column `basis[r]` is the
    /// `r`-th unit vector, `rhs >= 0`, and `objective` is zero on basic columns.
    pub fn new(
        rows: Vec<Vec<Rational>>,
        rhs: Vec<Rational>,
        objective: Vec<Rational>,
        value: Rational,
        basis: Vec<usize>,
    ) -> Self {
        debug_assert_eq!(rows.len(), rhs.len());
        debug_assert_eq!(rows.len(), basis.len());
        debug_assert!(rows.iter().all(|r| r.len() == objective.len()));
        Self {
            rows,
            rhs,
            objective,
            value,
            basis,
            pivots: 0,
        }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.objective.len()
    }

    #[inline]
    pub fn entry(&self, row: usize, col: usize) -> &Rational {
        &self.rows[row][col]
    }

    #[inline]
    pub fn rhs(&self) -> &[Rational] {
        &self.rhs
    }

    #[inline]
    pub fn reduced_costs(&self) -> &[Rational] {
        &self.objective
    }

    #[inline]
    pub fn value(&self) -> &Rational {
        &self.value
    }

    /// Row-to-column basis map.
    #[inline]
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    /// Row holding the unit pivot of `col`, if `col` is basic.
    pub fn basic_row(&self, col: usize) -> Option<usize> {
        self.basis.iter().position(|&c| c == col)
    }

    /// Pivots performed so far, across phases.
    #[inline]
    pub fn pivots(&self) -> usize {
        self.pivots
    }

    pub fn state(&self) -> TableauState {
        // Bland: lowest-index column with a negative reduced cost.
        let Some(col) = self.objective.iter().position(Signed::is_negative) else {
            return TableauState::Solved;
        };
        match self.ratio_row(col) {
            Some(row) => TableauState::Unsolved { row, col },
            None => TableauState::Unbounded { col },
        }
    }

    /// Minimum ratio `rhs / entry` over strictly positive entries; ties go to
    /// the row whose basic variable has the smallest index.
    fn ratio_row(&self, col: usize) -> Option<usize> {
        let mut best: Option<(usize, Rational)> = None;
        for (r, row) in self.rows.iter().enumerate() {
            let a = &row[col];
            if !a.is_positive() {
                continue;
            }
            let ratio = &self.rhs[r] / a;
            let better = match &best {
                None => true,
                Some((b, b_ratio)) => match ratio.cmp(b_ratio) {
                    Ordering::Less => true,
                    Ordering::Equal => self.basis[r] < self.basis[*b],
                    Ordering::Greater => false,
                },
            };
            if better {
                best = Some((r, ratio));
            }
        }
        best.map(|(r, _)| r)
    }

    /// Make `col` basic in `row`. Pre: the entry is non-zero.
    pub fn pivot(&mut self, row: usize, col: usize) {
        let p = self.rows[row][col].clone();
        debug_assert!(!p.is_zero(), "pivot on a zero entry");
        if !p.is_one() {
            for v in self.rows[row].iter_mut().filter(|v| !v.is_zero()) {
                *v /= &p;
            }
            self.rhs[row] /= &p;
        }
        let pivot_row = self.rows[row].clone();
        let pivot_rhs = self.rhs[row].clone();
        for r in 0..self.rows.len() {
            if r == row {
                continue;
            }
            let f = self.rows[r][col].clone();
            if f.is_zero() {
                continue;
            }
            eliminate(&mut self.rows[r], &pivot_row, &f);
            self.rhs[r] -= &f * &pivot_rhs;
        }
        let f = self.objective[col].clone();
        if !f.is_zero() {
            eliminate(&mut self.objective, &pivot_row, &f);
            self.value += &f * &pivot_rhs;
        }
        self.basis[row] = col;
        self.pivots += 1;
    }

    /// Pivot until solved or unbounded; never returns `Unsolved`.
    ///
    /// `limit` caps the total pivot count of this tableau.
    pub fn run(&mut self, limit: Option<usize>) -> Result<TableauState, SimplexError> {
        loop {
            match self.state() {
                TableauState::Unsolved { row, col } => {
                    if let Some(limit) = limit {
                        if self.pivots >= limit {
                            return Err(SimplexError::PivotLimit { limit });
                        }
                    }
                    self.pivot(row, col);
                    if self.pivots % TRACE_EVERY == 0 {
                        tracing::trace!(
                            pivots = self.pivots,
                            value = %self.value,
                            "pivoting"
                        );
                    }
                }
                done => return Ok(done),
            }
        }
    }

    /// Remove a constraint row (and its basic variable).
    pub fn drop_row(&mut self, row: usize) {
        self.rows.remove(row);
        self.rhs.remove(row);
        self.basis.remove(row);
    }

    /// Keep only the first `n` columns. Pre: no basic column is `>= n`.
    pub fn truncate_columns(&mut self, n: usize) {
        debug_assert!(self.basis.iter().all(|&c| c < n));
        for row in &mut self.rows {
            row.truncate(n);
        }
        self.objective.truncate(n);
    }

    /// Replace the cost vector and price out the basic columns.
    pub fn install_objective(&mut self, costs: &[Rational]) {
        debug_assert_eq!(costs.len(), self.ncols());
        self.objective = costs.to_vec();
        self.value = Rational::zero();
        for r in 0..self.rows.len() {
            let f = self.objective[self.basis[r]].clone();
            if f.is_zero() {
                continue;
            }
            eliminate(&mut self.objective, &self.rows[r], &f);
            self.value += &f * &self.rhs[r];
        }
    }

    /// Basic solution restricted to the first `n` columns.
    pub fn solution(&self, n: usize) -> Vec<Rational> {
        let mut x = vec![Rational::zero(); n];
        for (r, &col) in self.basis.iter().enumerate() {
            if col < n {
                x[col] = self.rhs[r].clone();
            }
        }
        x
    }
}

/// `target -= factor * source`, skipping zeros of `source`.
fn eliminate(target: &mut [Rational], source: &[Rational], factor: &Rational) {
    for (t, s) in target.iter_mut().zip(source) {
        if !s.is_zero() {
            *t -= factor * s;
        }
    }
}
