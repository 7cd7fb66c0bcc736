//! Attractor sampling
//!
//! The chaos game draws one map per step and records the moving point after
//! a burn-in. Without a seed every run draws fresh entropy; with a seed the
//! point sequence replays exactly. Address-indexed candidates are enumerated
//! deterministically instead.

use rand::rngs::StdRng;
use tracing::debug;

use crate::cancellation::{CancellationToken, is_cancelled};
use crate::ifs::candidate::{AssignmentRule, IfsCandidate};
use crate::ifs::contraction::ContractionMap;
use crate::io::configuration::{DEFAULT_BURN_IN, DEFAULT_ITERATIONS};
use crate::io::error::{PatternError, Result, invalid_parameter};
use crate::math::probability::{WeightedSelector, seeded_rng};
use crate::triangle::Occupancy;

/// Sampling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    /// Points recorded by the chaos game
    pub iterations: usize,
    /// Steps discarded before recording
    pub burn_in: usize,
    /// Fixed seed for replayable runs
    pub seed: Option<u64>,
    /// Starting point
    pub start: [f64; 2],
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            burn_in: DEFAULT_BURN_IN,
            seed: None,
            start: [0.5, 0.5],
        }
    }
}

/// Finite point set approximating an attractor
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttractorSample {
    points: Vec<[f64; 2]>,
    seed: Option<u64>,
}

impl AttractorSample {
    /// Wrap an existing point set
    pub const fn from_points(points: Vec<[f64; 2]>) -> Self {
        Self { points, seed: None }
    }

    /// Sampled points in unit-square coordinates
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Seed that produced the sample, if it was seeded
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no points were sampled
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Occupancy of a `side x side` grid over the unit square
    pub fn rasterize(&self, side: usize) -> Occupancy {
        Occupancy::from_points(&self.points, side)
    }

    /// Combine independent runs into one sample
    pub fn merge(samples: impl IntoIterator<Item = Self>) -> Self {
        let points = samples.into_iter().flat_map(|s| s.points).collect();
        Self::from_points(points)
    }
}

/// Runs a candidate to produce attractor points
#[derive(Debug, Clone)]
pub struct AttractorSampler<'a> {
    candidate: &'a IfsCandidate,
    config: SamplerConfig,
    cancellation: Option<CancellationToken>,
}

impl<'a> AttractorSampler<'a> {
    /// Create a sampler
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `iterations` is zero for a chaos-game
    /// rule or the start point is not finite
    pub fn new(candidate: &'a IfsCandidate, config: SamplerConfig) -> Result<Self> {
        let chaos = !matches!(candidate.rule(), AssignmentRule::AddressIndexed { .. });
        if chaos && config.iterations == 0 {
            return Err(invalid_parameter(
                "iterations",
                &config.iterations,
                &"at least one iteration is required",
            ));
        }
        if !config.start.iter().all(|c| c.is_finite()) {
            return Err(invalid_parameter(
                "start",
                &format!("{:?}", config.start),
                &"start point must be finite",
            ));
        }
        Ok(Self {
            candidate,
            config,
            cancellation: None,
        })
    }

    /// Stop sampling once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Lazily produce sample points
    pub fn points(&self) -> SamplePoints<'_> {
        let maps = self.candidate.maps();
        let cancellation = self.cancellation.as_ref();
        let selector = match self.candidate.rule() {
            AssignmentRule::Uniform => WeightedSelector::uniform(maps.len()),
            AssignmentRule::Weighted(weights) => WeightedSelector::new(weights),
            AssignmentRule::AddressIndexed { depth } => {
                return SamplePoints::Addresses(AddressWalk::new(
                    maps,
                    *depth as usize,
                    self.config.start,
                    cancellation,
                ));
            }
        };
        // Candidates validate their weights, so this only fails for an empty set
        selector.map_or(SamplePoints::Exhausted, |selector| {
            SamplePoints::Chaos(ChaosGame {
                maps,
                selector,
                rng: seeded_rng(self.config.seed),
                point: self.config.start,
                burn_in_left: self.config.burn_in,
                remaining: self.config.iterations,
                cancellation,
            })
        })
    }

    /// Collect every point
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the token fired before sampling finished
    pub fn sample(&self) -> Result<AttractorSample> {
        let points: Vec<[f64; 2]> = self.points().collect();
        if is_cancelled(self.cancellation.as_ref()) {
            return Err(PatternError::Cancelled {
                operation: "attractor sampling",
            });
        }
        debug!(
            maps = self.candidate.len(),
            points = points.len(),
            seed = ?self.config.seed,
            "sampled attractor"
        );
        Ok(AttractorSample {
            points,
            seed: self.config.seed,
        })
    }
}

/// Lazy point sequence from [`AttractorSampler::points`]
#[derive(Debug)]
pub enum SamplePoints<'a> {
    /// Random map selection
    Chaos(ChaosGame<'a>),
    /// Deterministic address enumeration
    Addresses(AddressWalk<'a>),
    /// Nothing to sample
    Exhausted,
}

impl Iterator for SamplePoints<'_> {
    type Item = [f64; 2];

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Chaos(game) => game.next(),
            Self::Addresses(walk) => walk.next(),
            Self::Exhausted => None,
        }
    }
}

/// Chaos-game iterator
#[derive(Debug)]
pub struct ChaosGame<'a> {
    maps: &'a [ContractionMap],
    selector: WeightedSelector,
    rng: StdRng,
    point: [f64; 2],
    burn_in_left: usize,
    remaining: usize,
    cancellation: Option<&'a CancellationToken>,
}

impl ChaosGame<'_> {
    fn step(&mut self) {
        let index = self.selector.choose(&mut self.rng);
        if let Some(map) = self.maps.get(index) {
            self.point = map.apply(self.point);
        }
    }
}

impl Iterator for ChaosGame<'_> {
    type Item = [f64; 2];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || is_cancelled(self.cancellation) {
            return None;
        }
        while self.burn_in_left > 0 {
            self.step();
            self.burn_in_left -= 1;
        }
        self.step();
        self.remaining -= 1;
        Some(self.point)
    }
}

/// Enumerates every address of a fixed length in lexicographic order
///
/// The address `d_0 d_1 ... d_{k-1}` yields `f_{d_0}(f_{d_1}(... f_{d_{k-1}}(start)))`.
#[derive(Debug)]
pub struct AddressWalk<'a> {
    maps: &'a [ContractionMap],
    digits: Vec<usize>,
    start: [f64; 2],
    exhausted: bool,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> AddressWalk<'a> {
    fn new(
        maps: &'a [ContractionMap],
        depth: usize,
        start: [f64; 2],
        cancellation: Option<&'a CancellationToken>,
    ) -> Self {
        Self {
            maps,
            digits: vec![0; depth],
            start,
            exhausted: maps.is_empty() || depth == 0,
            cancellation,
        }
    }

    fn advance(&mut self) {
        // Increment the last digit first, carrying towards the front
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.maps.len() {
                return;
            }
            *digit = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for AddressWalk<'_> {
    type Item = [f64; 2];

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || is_cancelled(self.cancellation) {
            return None;
        }
        let point = self
            .digits
            .iter()
            .rev()
            .filter_map(|&digit| self.maps.get(digit))
            .fold(self.start, |p, map| map.apply(p));
        self.advance();
        Some(point)
    }
}
