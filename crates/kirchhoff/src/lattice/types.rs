//! Data types for the lattice: positions, edges, vertex cuts and errors.
//!
//! Kept small and explicit so `frame.rs` reads as the construction logic only.

use std::fmt;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::rational::{display, Rational};

/// Vector-type id: `0..dimensions` are coordinate vectors, the rest cross vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VectorId(pub usize);

/// Dense edge index; the edge's column in the linear system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pin(pub usize);

/// Immutable lattice point, one rational per dimension.
///
/// Ordering is lexicographic over coordinates, which fixes vertex iteration
/// order (and therefore row order of the linear system).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(Box<[Rational]>);

impl Position {
    pub fn new(coords: Vec<Rational>) -> Self {
        Self(coords.into_boxed_slice())
    }

    pub fn origin(dimensions: usize) -> Self {
        Self::new(vec![Rational::zero(); dimensions])
    }

    #[inline]
    pub fn coords(&self) -> &[Rational] {
        &self.0
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// `self + delta`. Pre: same dimension.
    pub fn translated(&self, delta: &[Rational]) -> Self {
        debug_assert_eq!(delta.len(), self.dimensions());
        Self::new(self.0.iter().zip(delta).map(|(a, b)| a + b).collect())
    }

    /// Copy moved by `amount` along one axis.
    pub fn shifted(&self, dimension: usize, amount: &Rational) -> Self {
        let mut coords = self.0.to_vec();
        coords[dimension] += amount;
        Self::new(coords)
    }

    /// `other - self`.
    pub fn displacement_to(&self, other: &Position) -> Vec<Rational> {
        other.0.iter().zip(self.0.iter()).map(|(b, a)| b - a).collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", display(c))?;
        }
        write!(f, ")")
    }
}

/// An unpinned directed segment `tail -> head` of one vector type.
///
/// Used as the representative passed to `Frame::populate`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub tail: Position,
    pub head: Position,
    pub id: VectorId,
}

impl Segment {
    pub fn displacement(&self) -> Vec<Rational> {
        self.tail.displacement_to(&self.head)
    }
}

/// Lattice edge. Identity is `(tail, head, id)`; `pin` and `weight` are payload.
#[derive(Clone, Debug)]
pub struct Edge {
    pub tail: Position,
    pub head: Position,
    pub id: VectorId,
    pub pin: Pin,
    /// Unset until a solution is assigned.
    pub weight: Option<BigInt>,
}

impl Edge {
    pub fn segment(&self) -> Segment {
        Segment {
            tail: self.tail.clone(),
            head: self.head.clone(),
            id: self.id,
        }
    }

    /// Weight with unset read as zero.
    pub fn weight_or_zero(&self) -> BigInt {
        self.weight.clone().unwrap_or_else(BigInt::zero)
    }

    /// True once a non-zero weight has been assigned.
    pub fn is_present(&self) -> bool {
        self.weight.as_ref().is_some_and(|w| !w.is_zero())
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.tail == other.tail && self.head == other.head
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.tail.hash(state);
        self.head.hash(state);
        self.id.hash(state);
    }
}

/// Which side of a vertex an edge attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => write!(f, "incoming"),
            Self::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// One `(incoming, outgoing)` pair of a vertex cut.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CutSlot {
    pub incoming: Option<Pin>,
    pub outgoing: Option<Pin>,
}

impl CutSlot {
    #[inline]
    pub fn get(&self, dir: Direction) -> Option<Pin> {
        match dir {
            Direction::Incoming => self.incoming,
            Direction::Outgoing => self.outgoing,
        }
    }
}

/// Lattice vertex with one cut slot per vector type.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub position: Position,
    pub cut: Vec<CutSlot>,
}

impl Vertex {
    pub fn new(position: Position, num_vectors: usize) -> Self {
        Self {
            position,
            cut: vec![CutSlot::default(); num_vectors],
        }
    }

    #[inline]
    pub fn slot(&self, id: VectorId) -> &CutSlot {
        &self.cut[id.0]
    }

    /// Pins of every attached edge, slot order, incoming before outgoing.
    pub fn pins(&self) -> impl Iterator<Item = Pin> + '_ {
        self.cut
            .iter()
            .flat_map(|s| s.incoming.into_iter().chain(s.outgoing))
    }

    /// False iff every slot is empty or carries a zero weight.
    ///
    /// `edges` is the owning frame's edge list (indexed by pin). Unweighted
    /// edges count as attached.
    pub fn is_connected(&self, edges: &[Edge]) -> bool {
        self.pins()
            .any(|p| edges[p.0].weight.as_ref().map_or(true, |w| !w.is_zero()))
    }

    /// Net weighted outflow per vector type (outgoing minus incoming).
    pub fn cut_vector(&self, edges: &[Edge]) -> Vec<BigInt> {
        let w = |p: Option<Pin>| p.map(|p| edges[p.0].weight_or_zero()).unwrap_or_default();
        self.cut
            .iter()
            .map(|s| w(s.outgoing) - w(s.incoming))
            .collect()
    }
}

/// Structural lattice violations. These indicate construction bugs, not
/// properties of the input matrix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("position has {found} coordinates, frame has {expected} dimensions")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("vector id {id} out of range (frame has {num_vectors} vector types)")]
    UnknownVector { id: usize, num_vectors: usize },
    #[error("segment {tail} -> {head} does not match the displacement of vector {id}")]
    DisplacementMismatch {
        tail: Position,
        head: Position,
        id: usize,
    },
    #[error("vertex {position} already holds a different {direction} edge of vector {id}")]
    CutConflict {
        position: Position,
        id: usize,
        direction: Direction,
    },
    #[error("dimension {dimension} out of range (frame has {dimensions})")]
    DimensionOutOfRange { dimension: usize, dimensions: usize },
    #[error("dimension {dimension} is already {current}; refusing to shrink to {target}")]
    WouldShrink {
        dimension: usize,
        current: usize,
        target: usize,
    },
    #[error("extent of dimension {dimension} overflows")]
    ExtentOverflow { dimension: usize },
    #[error("frame has not been seeded")]
    Unseeded,
    #[error("expected {expected} weights, got {found}")]
    WeightCount { expected: usize, found: usize },
}
