//! Grow-and-solve loop that finds the first feasible lattice.
//!
//! Purpose
//! - Seed a frame for the input matrix, generate its system, ask the exact
//!   simplex for a non-trivial non-negative solution, and on failure grow one
//!   dimension (round robin) and try again.
//!
//! Why this design
//! - The frame is append-only, so every system row of a smaller frame is
//!   still a row of the grown one; infeasibility is the expected signal to
//!   grow, never an error.
//! - Round robin is a heuristic with no minimality guarantee. The growth step
//!   and an optional bound on growth steps are configurable.

use num_bigint::BigInt;
use num_traits::Zero;

use crate::extract::assign_solution;
use crate::lattice::{Frame, FrameError};
use crate::matrix::{InputMatrix, MatrixError};
use crate::rational::Rational;
use crate::simplex::{solve_kirky, SimplexCfg, SimplexError};
use crate::system::{generate_linear_system, LinearSystem};

/// How far a single growth step extends the chosen dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrowthStep {
    /// Translate the whole frame by its extent: `shape[d] *= 2`.
    #[default]
    Double,
    /// One unit: `shape[d] += 1`.
    Unit,
}

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchCfg {
    pub growth: GrowthStep,
    /// Stop with `SearchError::GrowthLimit` after this many growth steps.
    pub max_growths: Option<usize>,
    pub simplex: SimplexCfg,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            growth: GrowthStep::Double,
            // Unbounded: termination rests on the input admitting a finite graph.
            max_growths: None,
            simplex: SimplexCfg::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Simplex(#[from] SimplexError),
    #[error("no Kirchhoff graph after {growths} growth steps (shape {shape:?})")]
    GrowthLimit { growths: usize, shape: Vec<usize> },
}

/// Round-robin dimension pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DimensionCycle {
    next: usize,
    dimensions: usize,
}

impl DimensionCycle {
    pub fn new(dimensions: usize) -> Self {
        Self {
            next: 0,
            dimensions,
        }
    }

    /// Dimension the next growth step will use.
    #[inline]
    pub fn peek(&self) -> usize {
        self.next
    }

    /// Return the current dimension and move to the following one, wrapping.
    pub fn advance(&mut self) -> usize {
        let d = self.next;
        self.next = (self.next + 1) % self.dimensions.max(1);
        d
    }
}

/// Result of a successful search.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Primitive integer weights indexed by pin.
    pub weights: Vec<BigInt>,
    /// The solver's point (weights summing to one).
    pub point: Vec<Rational>,
    /// Growth steps taken before the feasible frame.
    pub growths: usize,
    /// Frame shape at each solve attempt, first to last.
    pub shapes: Vec<Vec<usize>>,
    /// System of the feasible frame.
    pub system: LinearSystem,
}

impl Solution {
    /// Edges present in the graph (non-zero weight).
    pub fn edge_count(&self) -> usize {
        self.weights.iter().filter(|w| !w.is_zero()).count()
    }

    /// Final shape.
    pub fn shape(&self) -> &[usize] {
        self.shapes.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Search driver owning the matrix and its frame.
#[derive(Clone, Debug)]
pub struct Kirchhoff {
    matrix: InputMatrix,
    frame: Frame,
    cursor: DimensionCycle,
}

impl Kirchhoff {
    /// Seed the frame to the matrix's first shape and populate every cross vector.
    pub fn new(matrix: InputMatrix) -> Result<Self, SearchError> {
        let mut frame = Frame::new(&matrix)?;
        frame.seed_frame(&matrix.first_shape())?;
        for example in frame.cross_examples() {
            frame.populate(&example)?;
        }
        let cursor = DimensionCycle::new(matrix.dimensions());
        Ok(Self {
            matrix,
            frame,
            cursor,
        })
    }

    pub fn matrix(&self) -> &InputMatrix {
        &self.matrix
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }

    /// Dimension the next growth step will extend.
    pub fn next_dimension(&self) -> usize {
        self.cursor.peek()
    }

    pub fn generate_linear_system(&self) -> LinearSystem {
        generate_linear_system(&self.frame, &self.matrix)
    }

    /// Grow along the round-robin pointer; returns the dimension grown.
    ///
    /// The pointer only moves once the frame has grown.
    pub fn grow(&mut self, step: GrowthStep) -> Result<usize, FrameError> {
        let d = self.cursor.peek();
        match step {
            GrowthStep::Double => self.frame.double(d)?,
            GrowthStep::Unit => self.frame.grow(d)?,
        }
        self.cursor.advance();
        Ok(d)
    }

    /// Run the loop until a frame admits a solution; weights land on the frame.
    pub fn find(&mut self, cfg: SearchCfg) -> Result<Solution, SearchError> {
        let mut growths = 0;
        let mut shapes = Vec::new();
        loop {
            shapes.push(self.frame.shape().to_vec());
            let system = self.generate_linear_system();
            tracing::debug!(
                attempt = shapes.len(),
                shape = ?self.frame.shape(),
                vertices = self.frame.vertex_count(),
                edges = self.frame.edge_count(),
                rows = system.nrows(),
                "solving"
            );
            if let Some(point) = solve_kirky(system.matrix(), cfg.simplex)? {
                let weights = assign_solution(&mut self.frame, &point)?;
                debug_assert!(system.is_satisfied_by_integers(&weights));
                let solution = Solution {
                    weights,
                    point,
                    growths,
                    shapes,
                    system,
                };
                tracing::info!(
                    growths,
                    shape = ?solution.shape(),
                    edges = solution.edge_count(),
                    "found Kirchhoff graph"
                );
                return Ok(solution);
            }
            if cfg.max_growths.is_some_and(|max| growths >= max) {
                return Err(SearchError::GrowthLimit {
                    growths,
                    shape: self.frame.shape().to_vec(),
                });
            }
            let d = self.grow(cfg.growth)?;
            growths += 1;
            tracing::debug!(dimension = d, shape = ?self.frame.shape(), "infeasible; grew");
        }
    }
}

/// Convenience: build, search with `cfg`, return the weighted frame and solution.
pub fn find_kirchhoff_graph(matrix: InputMatrix, cfg: SearchCfg) -> Result<(Frame, Solution), SearchError> {
    let mut search = Kirchhoff::new(matrix)?;
    let solution = search.find(cfg)?;
    Ok((search.into_frame(), solution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{incidence_matrix, is_admissible, normalize_solution, weighted_components};
    use crate::rational::ratio;

    fn search(rows: &[&[i64]]) -> Kirchhoff {
        Kirchhoff::new(InputMatrix::from_integers(rows).unwrap()).unwrap()
    }

    #[test]
    fn square_matrix_needs_no_growth() {
        let mut k = search(&[&[2, 1], &[1, 2]]);
        let s = k.find(SearchCfg::default()).unwrap();
        assert_eq!(s.growths, 0);
        assert_eq!(s.shapes, vec![vec![2, 2]]);
        assert_eq!(s.weights.len(), 16);
        assert!(is_admissible(&s.weights));
        assert!(s.system.is_satisfied_by_integers(&s.weights));
        assert!(s.system.is_satisfied_by(&s.point));
        // Weights landed on the frame.
        let on_frame: Vec<BigInt> = k.frame().edges().iter().map(|e| e.weight_or_zero()).collect();
        assert_eq!(on_frame, s.weights);
        // One connected graph; the unused lattice vertices stay outside it.
        assert_eq!(weighted_components(k.frame()), 1);
        let inc = incidence_matrix(k.frame());
        for (r, v) in k.frame().vertices().enumerate() {
            let row: Vec<BigInt> = inc.row(r).iter().cloned().collect();
            assert_eq!(row, v.cut_vector(k.frame().edges()));
        }
    }

    #[test]
    fn negative_column_grows_once() {
        for growth in [GrowthStep::Double, GrowthStep::Unit] {
            let mut k = search(&[&[-1, 1, 1], &[1, 2, 1]]);
            let cfg = SearchCfg {
                growth,
                ..SearchCfg::default()
            };
            let s = k.find(cfg).unwrap();
            assert_eq!(s.growths, 1);
            assert_eq!(s.shapes, vec![vec![1, 2], vec![2, 2]]);
            assert_eq!(k.frame().edge_count(), 22);
            assert_eq!(s.system.nrows(), 27);
            assert!(s.system.is_satisfied_by_integers(&s.weights));
            assert_eq!(k.next_dimension(), 1);
            assert_eq!(weighted_components(k.frame()), 1);
        }
    }

    #[test]
    fn growth_limit_is_reported() {
        let mut k = search(&[&[-1, 1, 1], &[1, 2, 1]]);
        let cfg = SearchCfg {
            max_growths: Some(0),
            ..SearchCfg::default()
        };
        assert_eq!(
            k.find(cfg).unwrap_err(),
            SearchError::GrowthLimit {
                growths: 0,
                shape: vec![1, 2]
            }
        );
    }

    #[test]
    fn one_dimensional_answers_are_unique() {
        let (_, s) = find_kirchhoff_graph(
            InputMatrix::from_integers(&[[2]]).unwrap(),
            SearchCfg::default(),
        )
        .unwrap();
        let expect: Vec<BigInt> = [1, 1, 2].iter().map(|&v| BigInt::from(v)).collect();
        assert_eq!(s.weights, expect);
        assert_eq!(s.point, vec![ratio(1, 4), ratio(1, 4), ratio(1, 2)]);

        let (_, s) = find_kirchhoff_graph(
            InputMatrix::from_integers(&[[1, 1]]).unwrap(),
            SearchCfg::default(),
        )
        .unwrap();
        assert_eq!(s.weights, vec![BigInt::from(1); 3]);
    }

    #[test]
    fn diagonal_column_picks_one_path() {
        let (frame, s) = find_kirchhoff_graph(
            InputMatrix::from_integers(&[[1], [1]]).unwrap(),
            SearchCfg::default(),
        )
        .unwrap();
        assert_eq!(s.growths, 0);
        // The cross edge plus one two-step coordinate path, all weight one.
        assert_eq!(s.edge_count(), 3);
        assert!(s.weights.iter().all(|w| w.is_zero() || *w == BigInt::from(1)));
        assert!(frame.cross_edges().all(|e| e.is_present()));
    }

    #[test]
    fn zero_row_leaves_its_coordinate_free() {
        let (frame, s) = find_kirchhoff_graph(
            InputMatrix::from_integers(&[[1], [0]]).unwrap(),
            SearchCfg::default(),
        )
        .unwrap();
        assert_eq!(s.growths, 0);
        assert_eq!(s.edge_count(), 1);
        let edge = frame.weighted_edges().next().unwrap();
        assert_eq!(edge.id, crate::lattice::VectorId(1));
        assert_eq!(edge.weight, Some(BigInt::from(1)));
        assert!(frame.cross_edges().all(|e| !e.is_present()));
    }

    #[test]
    fn search_is_deterministic() {
        let run = || {
            let mut k = search(&[&[-1, 1, 1], &[1, 2, 1]]);
            let s = k.find(SearchCfg::default()).unwrap();
            (s.shapes, s.weights)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn weights_match_normalized_point() {
        let mut k = search(&[&[2, 1], &[1, 2]]);
        let s = k.find(SearchCfg::default()).unwrap();
        assert_eq!(normalize_solution(&s.point), s.weights);
    }

    #[test]
    fn cycle_wraps() {
        let mut c = DimensionCycle::new(3);
        let seen: Vec<usize> = (0..5).map(|_| c.advance()).collect();
        assert_eq!(seen, vec![0, 1, 2, 0, 1]);
        assert_eq!(c.peek(), 2);
    }

    #[test]
    fn failed_growth_keeps_the_pointer() {
        let matrix = InputMatrix::from_integers(&[[1], [1]]).unwrap();
        let mut k = Kirchhoff {
            frame: Frame::new(&matrix).unwrap(),
            cursor: DimensionCycle::new(matrix.dimensions()),
            matrix,
        };
        assert_eq!(k.grow(GrowthStep::Double), Err(FrameError::Unseeded));
        assert_eq!(k.grow(GrowthStep::Unit), Err(FrameError::Unseeded));
        assert_eq!(k.next_dimension(), 0);

        let mut k = search(&[&[1], &[1]]);
        assert_eq!(k.grow(GrowthStep::Unit), Ok(0));
        assert_eq!(k.next_dimension(), 1);
    }
}
