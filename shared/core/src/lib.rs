mod metrics;
mod shuffle;

pub use metrics::{matthews_corrcoef, weighted_f1};
pub use shuffle::{seeded_rng, Shuffle};
