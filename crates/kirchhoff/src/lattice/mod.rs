//! Growable lattice ("frame") of coordinate and cross edges.
//!
//! Purpose
//! - Hold every candidate edge of a Kirchhoff graph for the current extent:
//!   unit coordinate vectors between lattice points `1/steps[d]` apart, and
//!   every occurrence of each dependent (cross) vector between existing points.
//! - Grow in place, one dimension at a time, without ever dropping state, so
//!   rows generated on a smaller frame stay valid on the grown one.
//!
//! Conventions
//! - Vector ids `0..dimensions` are coordinate vectors; the rest are cross
//!   vectors in matrix-column order.
//! - Pins are dense `0..edge_count` and double as system column indices.
//! - Duplicate inserts are routine and reported as `Ok(None)`; structural
//!   violations are `FrameError`s.
//!
//! Layout: `types.rs` (positions, edges, cuts, errors), `frame.rs` (builder).

mod frame;
mod types;

pub use frame::Frame;
pub use types::{CutSlot, Direction, Edge, FrameError, Pin, Position, Segment, VectorId, Vertex};
