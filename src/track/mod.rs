pub mod sample;
pub mod sampler;
pub mod summary;

pub use sample::{TrajectorySample, TrajectorySeries};
pub use sampler::{sample, sample_with, SamplerConfig};
pub use summary::TrackSummary;
