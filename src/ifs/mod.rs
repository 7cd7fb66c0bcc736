//! Iterated function systems and their attractors

/// IFS candidates and assignment rules
pub mod candidate;
/// Affine contraction maps on the unit square
pub mod contraction;
/// Deterministic Hutchinson-operator rendering
pub mod hutchinson;
/// Chaos-game and address-enumeration samplers
pub mod sampler;

pub use candidate::{AssignmentRule, IfsCandidate};
pub use contraction::{ContractionMap, Rotation};
pub use hutchinson::HutchinsonRenderer;
pub use sampler::{AttractorSample, AttractorSampler, SamplerConfig};
