//! Curated internal API (UNSTABLE).
//!
//! A convenience surface for the CLI, benches and property tests. Breaking
//! changes are allowed.

// Exact scalars
pub use crate::rational::{common_denominator, display as display_rational, to_primitive_integers, Rational};
// Input
pub use crate::matrix::{InputMatrix, MatrixError};
// Lattice
pub use crate::lattice::{
    CutSlot, Direction, Edge, Frame, FrameError, Pin, Position, Segment, VectorId, Vertex,
};
// System and solver
pub use crate::simplex::{
    solve_kirky, LinearProgram, LpOutcome, SimplexCfg, SimplexError, Tableau, TableauState,
};
pub use crate::system::{generate_linear_system, LinearSystem};
// Search and extraction
pub use crate::extract::{
    assign_solution, disconnected_vertices, incidence_matrix, is_admissible, normalize_solution,
    weighted_components,
};
pub use crate::search::{
    find_kirchhoff_graph, DimensionCycle, GrowthStep, Kirchhoff, SearchCfg, SearchError, Solution,
};
// Random inputs
pub use crate::samples::{draw_matrix, MatrixSampler, ReplayToken, Sample, SampleCfg};
