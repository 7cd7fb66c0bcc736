pub mod candidate;
pub mod contraction;
pub mod sampler;
