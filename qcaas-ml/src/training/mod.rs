//! Training infrastructure: splitting, scoring and the classical trainer.

pub mod classical;
pub mod metrics;
pub mod split;

pub use classical::train_classical;
pub use metrics::{MetricsReport, round_to, score};
pub use split::{SplitIndices, TrainTestSplit, stratified_split};
