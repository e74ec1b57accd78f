//! From a rational solver point to an integer-weighted graph.
//!
//! The solver returns a point on the ray of solutions scaled so the weights
//! sum to one; the graph uses the primitive integer point on that ray.

use std::collections::BTreeMap;

use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::lattice::{Frame, FrameError, Position};
use crate::rational::{to_primitive_integers, Rational};

/// Primitive non-negative integer weights, indexed by pin.
pub fn normalize_solution(point: &[Rational]) -> Vec<BigInt> {
    to_primitive_integers(point)
}

/// Normalize `point` and write the weights onto `frame`'s edges.
pub fn assign_solution(frame: &mut Frame, point: &[Rational]) -> Result<Vec<BigInt>, FrameError> {
    let weights = normalize_solution(point);
    frame.assign_weights(&weights)?;
    Ok(weights)
}

/// Vertex-by-vector-type matrix of net weighted outflow.
///
/// Row order is vertex (position) order, column `k` is vector id `k`.
pub fn incidence_matrix(frame: &Frame) -> DMatrix<BigInt> {
    let cuts: Vec<Vec<BigInt>> = frame
        .vertices()
        .map(|v| v.cut_vector(frame.edges()))
        .collect();
    DMatrix::from_fn(cuts.len(), frame.num_vectors(), |r, c| cuts[r][c].clone())
}

/// Positions of vertices no weighted edge touches.
pub fn disconnected_vertices(frame: &Frame) -> Vec<Position> {
    frame
        .vertices()
        .filter(|v| !v.is_connected(frame.edges()))
        .map(|v| v.position.clone())
        .collect()
}

/// Connected components of the graph spanned by weighted edges.
///
/// Direction is ignored; vertices no weighted edge touches are not counted.
pub fn weighted_components(frame: &Frame) -> usize {
    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    let mut index: BTreeMap<&Position, usize> = BTreeMap::new();
    let mut parent: Vec<usize> = Vec::new();
    for e in frame.weighted_edges() {
        let mut ends = [0; 2];
        for (slot, p) in ends.iter_mut().zip([&e.tail, &e.head]) {
            *slot = *index.entry(p).or_insert_with(|| {
                parent.push(parent.len());
                parent.len() - 1
            });
        }
        let (a, b) = (root(&mut parent, ends[0]), root(&mut parent, ends[1]));
        if a != b {
            parent[a] = b;
        }
    }
    (0..parent.len()).filter(|&i| parent[i] == i).count()
}

/// True iff no weight is negative and at least one is positive.
pub fn is_admissible(weights: &[BigInt]) -> bool {
    weights.iter().all(|w| !w.is_negative()) && weights.iter().any(|w| !w.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::InputMatrix;
    use crate::rational::{int, ratio};

    fn seeded(rows: &[&[i64]]) -> Frame {
        let m = InputMatrix::from_integers(rows).unwrap();
        let mut f = Frame::new(&m).unwrap();
        f.seed_frame(&m.first_shape()).unwrap();
        for ex in f.cross_examples() {
            f.populate(&ex).unwrap();
        }
        f
    }

    fn big(v: &[i64]) -> Vec<BigInt> {
        v.iter().map(|&x| BigInt::from(x)).collect()
    }

    #[test]
    fn solver_point_becomes_primitive_weights() {
        let mut f = seeded(&[&[2]]);
        let w = assign_solution(&mut f, &[ratio(1, 4), ratio(1, 4), ratio(1, 2)]).unwrap();
        assert_eq!(w, big(&[1, 1, 2]));
        assert_eq!(f.edge(crate::lattice::Pin(2)).weight, Some(BigInt::from(2)));
        assert!(is_admissible(&w));
    }

    #[test]
    fn incidence_rows_are_cut_vectors() {
        let mut f = seeded(&[&[2]]);
        assign_solution(&mut f, &[int(1), int(1), int(2)]).unwrap();
        let inc = incidence_matrix(&f);
        assert_eq!(inc.shape(), (3, 2));
        // Origin: one unit edge out, the 2e edge out.
        assert_eq!(inc.row(0).iter().cloned().collect::<Vec<_>>(), big(&[1, 2]));
        // Middle: one in, one out.
        assert_eq!(inc.row(1).iter().cloned().collect::<Vec<_>>(), big(&[0, 0]));
        assert_eq!(inc.row(2).iter().cloned().collect::<Vec<_>>(), big(&[-1, -2]));
        assert!(disconnected_vertices(&f).is_empty());
    }

    #[test]
    fn zero_weights_disconnect_vertices() {
        // Two paths (0,0) -> (1,1); only the one through (0,1) carries weight.
        let mut f = seeded(&[&[1], &[1]]);
        assert_eq!(f.edge_count(), 5);
        let via = |e: &crate::lattice::Edge| {
            e.id.0 == 2 || (e.tail.coords()[0] == int(0) && e.head.coords()[1] == int(1))
        };
        let point: Vec<Rational> = f
            .edges()
            .iter()
            .map(|e| if via(e) { int(1) } else { int(0) })
            .collect();
        assign_solution(&mut f, &point).unwrap();
        assert_eq!(f.weighted_edges().count(), 3);
        let lonely = disconnected_vertices(&f);
        assert_eq!(lonely, vec![Position::new(vec![int(1), int(0)])]);
        assert_eq!(weighted_components(&f), 1);
    }

    #[test]
    fn components_count_separate_pieces() {
        let mut f = seeded(&[&[1], &[1]]);
        assert_eq!(weighted_components(&f), 0);
        // Both first-coordinate edges, which share no endpoint.
        let weights: Vec<BigInt> = f
            .edges()
            .iter()
            .map(|e| BigInt::from(i64::from(e.id.0 == 0)))
            .collect();
        f.assign_weights(&weights).unwrap();
        assert_eq!(f.weighted_edges().count(), 2);
        assert_eq!(weighted_components(&f), 2);
    }

    #[test]
    fn admissibility() {
        assert!(!is_admissible(&big(&[0, 0])));
        assert!(!is_admissible(&big(&[1, -1])));
        assert!(is_admissible(&big(&[0, 3])));
    }
}
