//! Serializable views of a weighted frame and of a seeded one.
//!
//! Rationals and big integers are rendered as strings (`"p"` or `"p/q"`) so
//! the JSON round-trips through `input::parse_matrix` without precision loss.

use kirchhoff::api::{
    display_rational, generate_linear_system, incidence_matrix, Frame, InputMatrix, Position,
    Solution,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VertexOut {
    pub position: Vec<String>,
    pub connected: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeOut {
    pub pin: usize,
    pub id: usize,
    pub kind: &'static str,
    pub tail: Vec<String>,
    pub head: Vec<String>,
    pub weight: String,
}

/// Full graph export written by `kirchhoff find`.
#[derive(Debug, Serialize)]
pub struct GraphExport {
    pub matrix: Vec<Vec<String>>,
    pub shape: Vec<usize>,
    pub steps: Vec<usize>,
    pub growths: usize,
    pub shapes: Vec<Vec<usize>>,
    pub vertices: Vec<VertexOut>,
    /// Present edges only (non-zero weight).
    pub edges: Vec<EdgeOut>,
    pub incidence: Vec<Vec<String>>,
}

/// Frame statistics printed by `kirchhoff inspect`.
#[derive(Debug, Serialize)]
pub struct FrameSummary {
    pub dimensions: usize,
    pub columns: usize,
    pub shape: Vec<usize>,
    pub steps: Vec<usize>,
    pub vertices: usize,
    pub coordinate_edges: usize,
    pub cross_edges: usize,
    pub system_rows: usize,
    pub system_cols: usize,
}

fn coords(p: &Position) -> Vec<String> {
    p.coords().iter().map(display_rational).collect()
}

fn matrix_rows(m: &InputMatrix) -> Vec<Vec<String>> {
    m.rows()
        .iter()
        .map(|row| row.iter().map(display_rational).collect())
        .collect()
}

pub fn graph_export(matrix: &InputMatrix, frame: &Frame, solution: &Solution) -> GraphExport {
    let vertices = frame
        .vertices()
        .map(|v| VertexOut {
            position: coords(&v.position),
            connected: v.is_connected(frame.edges()),
        })
        .collect();
    let edges = frame
        .weighted_edges()
        .map(|e| EdgeOut {
            pin: e.pin.0,
            id: e.id.0,
            kind: if frame.is_coordinate(e.id) { "coordinate" } else { "cross" },
            tail: coords(&e.tail),
            head: coords(&e.head),
            weight: e.weight_or_zero().to_string(),
        })
        .collect();
    let inc = incidence_matrix(frame);
    let incidence = (0..inc.nrows())
        .map(|r| inc.row(r).iter().map(|v| v.to_string()).collect())
        .collect();
    GraphExport {
        matrix: matrix_rows(matrix),
        shape: frame.shape().to_vec(),
        steps: frame.steps().to_vec(),
        growths: solution.growths,
        shapes: solution.shapes.clone(),
        vertices,
        edges,
        incidence,
    }
}

pub fn frame_summary(matrix: &InputMatrix, frame: &Frame) -> FrameSummary {
    let system = generate_linear_system(frame, matrix);
    FrameSummary {
        dimensions: matrix.dimensions(),
        columns: matrix.columns(),
        shape: frame.shape().to_vec(),
        steps: frame.steps().to_vec(),
        vertices: frame.vertex_count(),
        coordinate_edges: frame.coordinate_edges().count(),
        cross_edges: frame.cross_edges().count(),
        system_rows: system.nrows(),
        system_cols: system.ncols(),
    }
}
