#![forbid(unsafe_code)]

//! Randomization sources.
//!
//! Controls never call a global RNG. They hold a boxed [`RandomSource`] so a
//! host can pick [`SeededRandom`] for reproducible sessions and tests can pin
//! exact outcomes with [`ScriptedRandom`].

use std::collections::VecDeque;
use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform selection and uniform integer draws.
pub trait RandomSource {
    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Uniform integer in `lo..=hi`. Bounds may be given in either order.
    fn int_in(&mut self, lo: i64, hi: i64) -> i64;
}

impl fmt::Debug for dyn RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RandomSource")
    }
}

/// Pick one element of `items` uniformly.
pub fn choose<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.pick_index(items.len()))
}

/// [`RandomSource`] backed by a small, fast, seedable PRNG.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    /// Deterministic stream for `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Stream seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.rng.random_range(lo..=hi)
    }
}

/// Replays a fixed queue of draws.
///
/// `pick_index(len)` yields `draw.rem_euclid(len)`; `int_in(lo, hi)` yields
/// the draw clamped into range. Once the queue runs dry every draw is 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: VecDeque<i64>,
    taken: usize,
}

impl ScriptedRandom {
    /// Replay `draws` in order.
    pub fn new(draws: impl IntoIterator<Item = i64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            taken: 0,
        }
    }

    /// Append one more draw.
    pub fn push(&mut self, draw: i64) {
        self.draws.push_back(draw);
    }

    /// Draws consumed so far.
    #[must_use]
    pub fn taken(&self) -> usize {
        self.taken
    }

    /// Draws still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }

    fn next_draw(&mut self) -> i64 {
        self.taken += 1;
        self.draws.pop_front().unwrap_or(0)
    }
}

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        let draw = self.next_draw();
        if len == 0 {
            return 0;
        }
        let len = i64::try_from(len).unwrap_or(i64::MAX);
        usize::try_from(draw.rem_euclid(len)).unwrap_or(0)
    }

    fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.next_draw().clamp(lo, hi)
    }
}
