//! Random input matrices with replay tokens.
//!
//! Model
//! - Each entry is `p / q` with `q` uniform in `1..=max_denominator` and
//!   `|p / q| <= max_abs`. All-zero columns are redrawn: a zero cross vector
//!   would be a self-loop that the system forces to weight zero.
//! - All-zero rows are kept. No cross vector moves along such a dimension,
//!   so its coordinate edges are unconstrained and a lone coordinate edge
//!   already balances; the search then returns that edge as the graph.
//! - Determinism uses a replay token `(seed, index)` mixed into one `StdRng`,
//!   so any sample can be regenerated from its token alone.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use num_bigint::BigInt;
use num_traits::Zero;

use crate::matrix::{InputMatrix, MatrixError};
use crate::rational::Rational;

/// Sampler configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleCfg {
    pub dimensions: usize,
    pub columns: usize,
    /// Largest entry magnitude (whole units).
    pub max_abs: i64,
    /// Largest denominator; 1 gives integer matrices.
    pub max_denominator: i64,
}

impl Default for SampleCfg {
    fn default() -> Self {
        Self {
            dimensions: 2,
            columns: 2,
            max_abs: 2,
            max_denominator: 1,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// A drawn matrix and the token that regenerates it.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub matrix: InputMatrix,
    pub replay: ReplayToken,
}

/// Draw one matrix for `tok`.
pub fn draw_matrix(cfg: SampleCfg, tok: ReplayToken) -> Result<InputMatrix, MatrixError> {
    let mut rng = tok.to_std_rng();
    let max_abs = cfg.max_abs.max(1);
    let max_den = cfg.max_denominator.max(1);
    let mut rows = vec![Vec::with_capacity(cfg.columns); cfg.dimensions];
    for _ in 0..cfg.columns {
        let column = loop {
            let column: Vec<Rational> = (0..cfg.dimensions)
                .map(|_| {
                    let q = rng.gen_range(1..=max_den);
                    let p = rng.gen_range(-max_abs * q..=max_abs * q);
                    Rational::new(BigInt::from(p), BigInt::from(q))
                })
                .collect();
            if cfg.dimensions == 0 || column.iter().any(|v| !v.is_zero()) {
                break column;
            }
        };
        for (row, v) in rows.iter_mut().zip(column) {
            row.push(v);
        }
    }
    InputMatrix::from_rows(rows)
}

/// Sequential sampler: token `(seed, 0)`, `(seed, 1)`, ...
#[derive(Clone, Debug)]
pub struct MatrixSampler {
    cfg: SampleCfg,
    seed: u64,
    index: u64,
}

impl MatrixSampler {
    pub fn new(cfg: SampleCfg, seed: u64) -> Self {
        Self {
            cfg,
            seed,
            index: 0,
        }
    }

    pub fn cfg(&self) -> SampleCfg {
        self.cfg
    }

    pub fn generate_next(&mut self) -> Result<Sample, MatrixError> {
        let replay = ReplayToken {
            seed: self.seed,
            index: self.index,
        };
        self.index = self.index.wrapping_add(1);
        let matrix = draw_matrix(self.cfg, replay)?;
        Ok(Sample { matrix, replay })
    }

    pub fn regenerate(&self, replay: &ReplayToken) -> Result<Sample, MatrixError> {
        Ok(Sample {
            matrix: draw_matrix(self.cfg, *replay)?,
            replay: *replay,
        })
    }
}
