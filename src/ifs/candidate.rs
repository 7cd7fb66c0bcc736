//! Candidate iterated function systems
//!
//! A candidate is plain data: a list of maps and the rule that decides which
//! map is applied next. New hypotheses are new candidates; the sampler and
//! comparator never change.

use std::f64::consts::TAU;
use tracing::debug;

use crate::analysis::similarity::SimilarityVerdict;
use crate::ifs::contraction::ContractionMap;
use crate::io::configuration::MAX_ADDRESS_POINTS;
use crate::io::error::{PatternError, Result, invalid_parameter};
use crate::math::probability::WeightedSelector;

/// How the next map is chosen
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentRule {
    /// Chaos game with every map equally likely
    Uniform,
    /// Chaos game with one weight per map
    Weighted(Vec<f64>),
    /// Deterministic: every base-n address of this length, in order
    ///
    /// Address digit `j` selects the map applied `j`-th from the outside, the
    /// same way a base-m expansion of a cell position selects nested blocks.
    AddressIndexed {
        /// Address length (recursion depth)
        depth: u32,
    },
}

/// Maps plus an assignment rule
#[derive(Debug, Clone, PartialEq)]
pub struct IfsCandidate {
    modulus: Option<u64>,
    maps: Vec<ContractionMap>,
    rule: AssignmentRule,
}

impl IfsCandidate {
    /// Create a candidate from explicit maps
    ///
    /// # Errors
    ///
    /// Returns `EmptyMapSet` if `maps` is empty, or `InvalidParameter` if the
    /// rule does not fit the maps
    pub fn new(maps: Vec<ContractionMap>, rule: AssignmentRule) -> Result<Self> {
        Self::for_modulus(None, maps, rule)
    }

    fn for_modulus(
        modulus: Option<u64>,
        maps: Vec<ContractionMap>,
        rule: AssignmentRule,
    ) -> Result<Self> {
        if maps.is_empty() {
            return Err(PatternError::EmptyMapSet { modulus });
        }
        validate_rule(&rule, maps.len())?;
        Ok(Self {
            modulus,
            maps,
            rule,
        })
    }

    /// One map of scale `1/m` per non-empty block of the verdict's motif
    ///
    /// Block `(a, b)` becomes the map translating by `(b/m, a/m)`, which
    /// sends the unit square onto that block's square.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the verdict was produced for another
    /// modulus and `EmptyMapSet` if the motif has no non-empty blocks
    pub fn from_verdict(modulus: u64, verdict: &SimilarityVerdict) -> Result<Self> {
        if verdict.modulus != modulus || verdict.motif.modulus() as u64 != modulus {
            return Err(invalid_parameter(
                "modulus",
                &modulus,
                &format!("verdict was produced for modulus {}", verdict.modulus),
            ));
        }

        let m = modulus as f64;
        let maps = verdict
            .motif
            .non_empty()
            .into_iter()
            .map(|block| ContractionMap::new(1.0 / m, [block.col as f64 / m, block.row as f64 / m]))
            .collect::<Result<Vec<_>>>()?;

        debug!(modulus, maps = maps.len(), "synthesised candidate from motif");
        Self::for_modulus(Some(modulus), maps, AssignmentRule::Uniform)
    }

    /// All `n(n+1)/2` block maps for an `n`-row motif
    ///
    /// # Errors
    ///
    /// Returns `InvalidModulus` if `n < 2`
    pub fn triangular_grid(n: u64) -> Result<Self> {
        if n < 2 {
            return Err(PatternError::InvalidModulus { modulus: n });
        }
        let scale = 1.0 / n as f64;
        let mut maps = Vec::new();
        for row in 0..n {
            for col in 0..=row {
                maps.push(ContractionMap::new(
                    scale,
                    [col as f64 * scale, row as f64 * scale],
                )?);
            }
        }
        Self::for_modulus(Some(n), maps, AssignmentRule::Uniform)
    }

    /// Contractions of ratio `2/vertices` towards the vertices of a regular
    /// polygon inscribed in the unit square
    ///
    /// With `include_center` an extra map contracts towards the centre.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `vertices < 3`
    pub fn polygon(vertices: usize, include_center: bool) -> Result<Self> {
        if vertices < 3 {
            return Err(invalid_parameter(
                "vertices",
                &vertices,
                &"a polygon needs at least 3 vertices",
            ));
        }
        let scale = 2.0 / vertices as f64;
        let towards = |[vx, vy]: [f64; 2]| {
            ContractionMap::new(scale, [(1.0 - scale) * vx, (1.0 - scale) * vy])
        };

        let mut maps = (0..vertices)
            .map(|k| {
                let angle = TAU * k as f64 / vertices as f64;
                towards([0.5f64.mul_add(angle.cos(), 0.5), 0.5f64.mul_add(angle.sin(), 0.5)])
            })
            .collect::<Result<Vec<_>>>()?;
        if include_center {
            maps.push(towards([0.5, 0.5])?);
        }
        Self::new(maps, AssignmentRule::Uniform)
    }

    /// Replace the assignment rule
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the rule does not fit the maps
    pub fn with_rule(mut self, rule: AssignmentRule) -> Result<Self> {
        validate_rule(&rule, self.maps.len())?;
        self.rule = rule;
        Ok(self)
    }

    /// Modulus the candidate was built for, if any
    pub const fn modulus(&self) -> Option<u64> {
        self.modulus
    }

    /// The contraction maps
    pub fn maps(&self) -> &[ContractionMap] {
        &self.maps
    }

    /// Number of maps
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Always false; construction rejects empty map sets
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Rule choosing the next map
    pub const fn rule(&self) -> &AssignmentRule {
        &self.rule
    }
}

fn validate_rule(rule: &AssignmentRule, map_count: usize) -> Result<()> {
    match rule {
        AssignmentRule::Uniform => Ok(()),
        AssignmentRule::Weighted(weights) => {
            if weights.len() != map_count {
                return Err(invalid_parameter(
                    "weights",
                    &weights.len(),
                    &format!("expected one weight per map ({map_count})"),
                ));
            }
            WeightedSelector::new(weights).map(|_| ()).ok_or_else(|| {
                invalid_parameter(
                    "weights",
                    &format!("{weights:?}"),
                    &"weights must be finite, non-negative and not all zero",
                )
            })
        }
        AssignmentRule::AddressIndexed { depth } => {
            let points = u32::try_from(map_count)
                .ok()
                .and_then(|n| n.checked_pow(*depth));
            match points {
                Some(p) if *depth > 0 && (p as usize) <= MAX_ADDRESS_POINTS => Ok(()),
                _ => Err(invalid_parameter(
                    "depth",
                    depth,
                    &format!(
                        "{map_count} maps at this depth must give between 1 and {MAX_ADDRESS_POINTS} addresses"
                    ),
                )),
            }
        }
    }
}
