//! Random value provider.
//!
//! Everything random in the seeding pipeline is drawn through [`ValueProvider`],
//! so a fixed seed reproduces a dataset exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait ValueProvider: Send {
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[low, high]`. Requires `low <= high`.
    fn between(&mut self, low: i64, high: i64) -> i64;

    /// Uniform index into a collection of `len` items. Requires `len > 0`.
    fn index(&mut self, len: usize) -> usize {
        self.between(0, len as i64 - 1) as usize
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

/// [`ValueProvider`] backed by `StdRng`.
pub struct SeededValues {
    rng: StdRng,
}

impl SeededValues {
    /// Deterministic stream: the same seed yields the same dataset.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ValueProvider for SeededValues {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn between(&mut self, low: i64, high: i64) -> i64 {
        self.rng.gen_range(low..=high)
    }
}

/// Uniform choice from a slice.
pub fn pick<'a, T>(values: &mut dyn ValueProvider, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(values.index(items.len()))
    }
}

/// Random subset of `items` of random size between 1 and `items.len()`,
/// keeping the original relative order.
pub fn non_empty_subset<T: Clone>(values: &mut dyn ValueProvider, items: &[T]) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    let size = values.between(1, items.len() as i64) as usize;

    // Partial Fisher-Yates over positions, then restore order.
    let mut positions: Vec<usize> = (0..items.len()).collect();
    for i in 0..size {
        let j = values.between(i as i64, items.len() as i64 - 1) as usize;
        positions.swap(i, j);
    }
    let mut chosen = positions[..size].to_vec();
    chosen.sort_unstable();
    chosen.into_iter().map(|i| items[i].clone()).collect()
}
