//! Frame construction and growth.
//!
//! The frame is append-only: vertices and edges are never removed, and pins
//! are handed out by an explicit counter so that the pin range stays dense.
//! Every growth step is "translate, then re-populate": translation copies the
//! existing block, and re-populating each known displacement picks up the
//! occurrences that straddle the old boundary.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::matrix::InputMatrix;
use crate::rational::Rational;

use super::types::{CutSlot, Direction, Edge, FrameError, Pin, Position, Segment, Vertex, VectorId};

/// Growable lattice of vertices and coordinate/cross edges.
#[derive(Clone, Debug)]
pub struct Frame {
    dimensions: usize,
    /// Displacement per vector id: unit vectors, then matrix columns.
    displacements: Vec<Vec<Rational>>,
    steps: Vec<usize>,
    shape: Vec<usize>,
    vertices: BTreeMap<Position, Vertex>,
    edges: Vec<Edge>, // indexed by pin
    coordinate: Vec<Pin>,
    cross: Vec<Pin>,
    /// Cross vector ids that `populate` has been asked for; re-filled on growth.
    registered: Vec<VectorId>,
    next_pin: usize,
}

impl Frame {
    /// Empty frame for `matrix`; call [`Frame::seed_frame`] before growing.
    pub fn new(matrix: &InputMatrix) -> Result<Self, FrameError> {
        let dimensions = matrix.dimensions();
        let mut displacements = Vec::with_capacity(matrix.num_vectors());
        for d in 0..dimensions {
            let mut unit = vec![Rational::zero(); dimensions];
            unit[d] = Rational::from_integer(BigInt::from(1));
            displacements.push(unit);
        }
        for c in 0..matrix.columns() {
            displacements.push(matrix.column(c));
        }
        let steps = matrix
            .steps()
            .iter()
            .enumerate()
            .map(|(dimension, s)| s.to_usize().ok_or(FrameError::ExtentOverflow { dimension }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            dimensions,
            displacements,
            steps,
            shape: vec![0; dimensions],
            vertices: BTreeMap::new(),
            edges: Vec::new(),
            coordinate: Vec::new(),
            cross: Vec::new(),
            registered: Vec::new(),
            next_pin: 0,
        })
    }

    // ----- read API -----

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[inline]
    pub fn num_vectors(&self) -> usize {
        self.displacements.len()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    #[inline]
    pub fn is_seeded(&self) -> bool {
        !self.vertices.is_empty()
    }

    /// Vertices in position order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = &Vertex> + '_ {
        self.vertices.values()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex(&self, position: &Position) -> Option<&Vertex> {
        self.vertices.get(position)
    }

    /// All edges in pin order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn edge(&self, pin: Pin) -> &Edge {
        &self.edges[pin.0]
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn coordinate_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.coordinate.iter().map(|p| &self.edges[p.0])
    }

    pub fn cross_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.cross.iter().map(|p| &self.edges[p.0])
    }

    /// Edges with a non-zero assigned weight (zero-weight edges are absent).
    pub fn weighted_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(|e| e.is_present())
    }

    pub fn displacement(&self, id: VectorId) -> Option<&[Rational]> {
        self.displacements.get(id.0).map(Vec::as_slice)
    }

    #[inline]
    pub fn is_coordinate(&self, id: VectorId) -> bool {
        id.0 < self.dimensions
    }

    /// One representative per cross vector: origin to its matrix column.
    pub fn cross_examples(&self) -> Vec<Segment> {
        let origin = Position::origin(self.dimensions);
        (self.dimensions..self.num_vectors())
            .map(|i| Segment {
                head: origin.translated(&self.displacements[i]),
                tail: origin.clone(),
                id: VectorId(i),
            })
            .collect()
    }

    // ----- construction -----

    /// Build the unit cell and extend it until every dimension spans at least `shape`.
    ///
    /// Calling it again only extends; nothing is duplicated or shrunk.
    pub fn seed_frame(&mut self, shape: &[usize]) -> Result<(), FrameError> {
        if shape.len() != self.dimensions {
            return Err(FrameError::DimensionMismatch {
                expected: self.dimensions,
                found: shape.len(),
            });
        }
        if !self.is_seeded() {
            self.build_unit_cell()?;
        }
        for (d, &target) in shape.iter().enumerate() {
            if target > self.shape[d] {
                self.extend_to(d, target)?;
            }
        }
        tracing::debug!(
            shape = ?self.shape,
            vertices = self.vertices.len(),
            edges = self.edges.len(),
            "seeded frame"
        );
        Ok(())
    }

    /// Every lattice point of `[0,1]^n` plus every unit coordinate edge inside it.
    fn build_unit_cell(&mut self) -> Result<(), FrameError> {
        let unit = vec![1; self.dimensions];
        for position in self.lattice_points(&unit) {
            self.ensure_vertex(position);
        }
        for d in 0..self.dimensions {
            self.fill(VectorId(d))?;
        }
        self.shape = unit;
        Ok(())
    }

    /// Grid `{k / steps[d] : 0 <= k <= extent[d] * steps[d]}` in lexicographic order.
    fn lattice_points(&self, extent: &[usize]) -> Vec<Position> {
        let counts: Vec<usize> = extent
            .iter()
            .zip(&self.steps)
            .map(|(e, s)| e * s + 1)
            .collect();
        let total: usize = counts.iter().product();
        let mut out = Vec::with_capacity(total);
        let mut index = vec![0usize; self.dimensions];
        for _ in 0..total {
            out.push(Position::new(
                index
                    .iter()
                    .zip(&self.steps)
                    .map(|(&k, &s)| Rational::new(BigInt::from(k), BigInt::from(s)))
                    .collect(),
            ));
            // Mixed-radix increment, last dimension fastest.
            for d in (0..self.dimensions).rev() {
                index[d] += 1;
                if index[d] < counts[d] {
                    break;
                }
                index[d] = 0;
            }
        }
        out
    }

    fn ensure_vertex(&mut self, position: Position) -> bool {
        if self.vertices.contains_key(&position) {
            return false;
        }
        let vertex = Vertex::new(position.clone(), self.num_vectors());
        self.vertices.insert(position, vertex);
        true
    }

    fn check_vector(&self, id: VectorId) -> Result<(), FrameError> {
        if id.0 >= self.num_vectors() {
            return Err(FrameError::UnknownVector {
                id: id.0,
                num_vectors: self.num_vectors(),
            });
        }
        Ok(())
    }

    fn check_segment(&self, tail: &Position, head: &Position, id: VectorId) -> Result<(), FrameError> {
        self.check_vector(id)?;
        for p in [tail, head] {
            if p.dimensions() != self.dimensions {
                return Err(FrameError::DimensionMismatch {
                    expected: self.dimensions,
                    found: p.dimensions(),
                });
            }
        }
        if tail.displacement_to(head) != self.displacements[id.0] {
            return Err(FrameError::DisplacementMismatch {
                tail: tail.clone(),
                head: head.clone(),
                id: id.0,
            });
        }
        Ok(())
    }

    fn check_dimension(&self, dimension: usize) -> Result<(), FrameError> {
        if dimension >= self.dimensions {
            return Err(FrameError::DimensionOutOfRange {
                dimension,
                dimensions: self.dimensions,
            });
        }
        Ok(())
    }

    /// Insert `tail -> head` of vector `id`, creating endpoints on demand.
    ///
    /// Returns the new pin, or `Ok(None)` when the same edge is already
    /// present (routine during growth). A different edge occupying the same
    /// slot, or a malformed segment, is an error. On any rejection the
    /// reserved pin is handed back.
    pub fn welcome_edge(
        &mut self,
        tail: Position,
        head: Position,
        id: VectorId,
    ) -> Result<Option<Pin>, FrameError> {
        self.check_segment(&tail, &head, id)?;
        let pin = Pin(self.next_pin);
        self.next_pin += 1;
        let verdict = self
            .slot_verdict(&tail, id, Direction::Outgoing, &head)
            .and_then(|fresh| {
                let other = self.slot_verdict(&head, id, Direction::Incoming, &tail)?;
                Ok(fresh && other)
            });
        match verdict {
            Ok(true) => {}
            Ok(false) => {
                self.next_pin -= 1;
                return Ok(None);
            }
            Err(e) => {
                self.next_pin -= 1;
                return Err(e);
            }
        }
        debug_assert_eq!(pin.0, self.edges.len(), "pins must stay dense");
        self.ensure_vertex(tail.clone());
        self.ensure_vertex(head.clone());
        if let Some(v) = self.vertices.get_mut(&tail) {
            v.cut[id.0].outgoing = Some(pin);
        }
        if let Some(v) = self.vertices.get_mut(&head) {
            v.cut[id.0].incoming = Some(pin);
        }
        self.edges.push(Edge {
            tail,
            head,
            id,
            pin,
            weight: None,
        });
        if self.is_coordinate(id) {
            self.coordinate.push(pin);
        } else {
            self.cross.push(pin);
        }
        Ok(Some(pin))
    }

    /// `Ok(true)` if the slot is free, `Ok(false)` if it holds this very edge.
    fn slot_verdict(
        &self,
        at: &Position,
        id: VectorId,
        dir: Direction,
        other_end: &Position,
    ) -> Result<bool, FrameError> {
        let occupant = self
            .vertices
            .get(at)
            .and_then(|v| v.cut.get(id.0).copied())
            .and_then(|slot: CutSlot| slot.get(dir));
        let Some(existing) = occupant else {
            return Ok(true);
        };
        let e = &self.edges[existing.0];
        let same = match dir {
            Direction::Outgoing => &e.head == other_end,
            Direction::Incoming => &e.tail == other_end,
        };
        if same {
            Ok(false)
        } else {
            Err(FrameError::CutConflict {
                position: at.clone(),
                id: id.0,
                direction: dir,
            })
        }
    }

    /// Add `example`'s edge type between every pair of existing vertices it fits.
    ///
    /// Returns the number of edges added; a repeated call adds none.
    pub fn populate(&mut self, example: &Segment) -> Result<usize, FrameError> {
        self.check_segment(&example.tail, &example.head, example.id)?;
        if !self.is_coordinate(example.id) && !self.registered.contains(&example.id) {
            self.registered.push(example.id);
        }
        self.fill(example.id)
    }

    fn fill(&mut self, id: VectorId) -> Result<usize, FrameError> {
        let delta = self.displacements[id.0].clone();
        let tails: Vec<Position> = self.vertices.keys().cloned().collect();
        let mut added = 0;
        for tail in tails {
            let head = tail.translated(&delta);
            if !self.vertices.contains_key(&head) {
                continue;
            }
            if self.welcome_edge(tail, head, id)?.is_some() {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Re-insert a copy of every vertex and edge moved by `amount` along `dimension`.
    fn copy_and_add(&mut self, dimension: usize, amount: usize) -> Result<(), FrameError> {
        let shift = Rational::from_integer(BigInt::from(amount));
        let positions: Vec<Position> = self.vertices.keys().cloned().collect();
        for p in positions {
            self.ensure_vertex(p.shifted(dimension, &shift));
        }
        let count = self.edges.len();
        for i in 0..count {
            let (tail, head, id) = {
                let e = &self.edges[i];
                (
                    e.tail.shifted(dimension, &shift),
                    e.head.shifted(dimension, &shift),
                    e.id,
                )
            };
            self.welcome_edge(tail, head, id)?;
        }
        Ok(())
    }

    /// Pick up occurrences that straddle the seam of a translation.
    fn repopulate(&mut self) -> Result<(), FrameError> {
        for d in 0..self.dimensions {
            self.fill(VectorId(d))?;
        }
        for id in self.registered.clone() {
            self.fill(id)?;
        }
        Ok(())
    }

    /// Double the extent along `dimension` by translating the whole frame by it.
    pub fn double(&mut self, dimension: usize) -> Result<(), FrameError> {
        self.check_dimension(dimension)?;
        if !self.is_seeded() {
            return Err(FrameError::Unseeded);
        }
        let current = self.shape[dimension];
        let next = current
            .checked_mul(2)
            .ok_or(FrameError::ExtentOverflow { dimension })?;
        self.copy_and_add(dimension, current)?;
        self.shape[dimension] = next;
        self.repopulate()?;
        tracing::trace!(dimension, shape = ?self.shape, edges = self.edges.len(), "doubled");
        Ok(())
    }

    /// Extend along `dimension` by one unit.
    pub fn grow(&mut self, dimension: usize) -> Result<(), FrameError> {
        self.check_dimension(dimension)?;
        if !self.is_seeded() {
            return Err(FrameError::Unseeded);
        }
        let next = self.shape[dimension]
            .checked_add(1)
            .ok_or(FrameError::ExtentOverflow { dimension })?;
        self.copy_and_add(dimension, 1)?;
        self.shape[dimension] = next;
        self.repopulate()?;
        tracing::trace!(dimension, shape = ?self.shape, edges = self.edges.len(), "grew");
        Ok(())
    }

    /// Grow one unit at a time until `shape[dimension] == target`.
    pub fn extend_to(&mut self, dimension: usize, target: usize) -> Result<(), FrameError> {
        self.check_dimension(dimension)?;
        let current = self.shape[dimension];
        if target <= current {
            return Err(FrameError::WouldShrink {
                dimension,
                current,
                target,
            });
        }
        while self.shape[dimension] < target {
            self.grow(dimension)?;
        }
        Ok(())
    }

    /// Write integer weights back onto edges by pin.
    pub fn assign_weights(&mut self, weights: &[BigInt]) -> Result<(), FrameError> {
        if weights.len() != self.edges.len() {
            return Err(FrameError::WeightCount {
                expected: self.edges.len(),
                found: weights.len(),
            });
        }
        for (edge, w) in self.edges.iter_mut().zip(weights) {
            edge.weight = Some(w.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(n: i64) -> Position {
        Position::new(vec![Rational::from_integer(BigInt::from(n))])
    }

    #[test]
    fn conflicting_slot_is_rejected_and_pin_retracted() {
        let m = InputMatrix::from_integers(&[[1]]).unwrap();
        let mut f = Frame::new(&m).unwrap();
        f.seed_frame(&[2]).unwrap();
        // Coordinate edges 0 -> 1 (pin 0) and 1 -> 2 (pin 1).
        assert_eq!(f.edge_count(), 2);
        // Corrupt vertex 1 so its incoming coordinate slot names the edge
        // leaving it; re-inserting 0 -> 1 must not overwrite that slot.
        if let Some(v) = f.vertices.get_mut(&at(0)) {
            v.cut[0].outgoing = None;
        }
        if let Some(v) = f.vertices.get_mut(&at(1)) {
            v.cut[0].incoming = Some(Pin(1));
        }
        let res = f.welcome_edge(at(0), at(1), VectorId(0));
        assert_eq!(
            res,
            Err(FrameError::CutConflict {
                position: at(1),
                id: 0,
                direction: Direction::Incoming
            })
        );
        assert_eq!(f.next_pin, 2);
        assert_eq!(f.edge_count(), 2);
    }
}
