//! Classical learning algorithms.

pub mod svm;

pub use svm::{FittedSvm, SvmClassifier, scale_gamma};
