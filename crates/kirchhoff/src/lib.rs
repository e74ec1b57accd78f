//! Kirchhoff graph search on growable rational lattices.
//!
//! Pipeline: an input matrix `B` (the dependent half of `[I | B]`) seeds a
//! lattice frame of coordinate and cross edges; per-vertex conservation gives
//! a linear system `E w = 0`; an exact two-phase simplex looks for a
//! non-trivial `w >= 0`; on failure the frame grows one dimension and the
//! loop repeats.
//!
//! API Policy
//! - Project-internal; there is no stable public API. Prefer `api` or
//!   `prelude` re-exports over deep paths.

pub mod api;
pub mod extract;
pub mod lattice;
pub mod matrix;
pub mod rational;
pub mod samples;
pub mod search;
pub mod simplex;
pub mod system;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use matrix::InputMatrix;
pub use rational::Rational;
pub use search::{GrowthStep, Kirchhoff, SearchCfg, Solution};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::extract::{incidence_matrix, normalize_solution};
    pub use crate::lattice::{Edge, Frame, Pin, Position, VectorId, Vertex};
    pub use crate::matrix::InputMatrix;
    pub use crate::rational::Rational;
    pub use crate::search::{find_kirchhoff_graph, GrowthStep, Kirchhoff, SearchCfg, Solution};
    pub use crate::simplex::{solve_kirky, SimplexCfg};
    pub use crate::system::{generate_linear_system, LinearSystem};
}
