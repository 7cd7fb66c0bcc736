//! Seeded weighted selection over a fixed set of indices

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Cumulative-weight index sampler
///
/// Weights are normalised once at construction so each draw is a single
/// uniform sample and a binary search.
#[derive(Debug, Clone)]
pub struct WeightedSelector {
    cumulative: Vec<f64>,
}

impl WeightedSelector {
    /// Build a selector from non-negative weights
    ///
    /// Returns `None` if the weights are empty, contain a negative or
    /// non-finite value, or sum to zero.
    pub fn new(weights: &[f64]) -> Option<Self> {
        if weights.is_empty() || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let mut running = 0.0;
        let cumulative = weights
            .iter()
            .map(|w| {
                running += w / total;
                running
            })
            .collect();
        Some(Self { cumulative })
    }

    /// Uniform weights over `count` indices
    pub fn uniform(count: usize) -> Option<Self> {
        Self::new(&vec![1.0; count])
    }

    /// Number of selectable indices
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Whether there is nothing to select
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Draw an index
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let target = rng.random::<f64>();
        let index = self.cumulative.partition_point(|&c| c <= target);
        // Rounding can leave the final cumulative value just below 1.0
        index.min(self.cumulative.len().saturating_sub(1))
    }
}

/// Random source that replays exactly when seeded
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}
