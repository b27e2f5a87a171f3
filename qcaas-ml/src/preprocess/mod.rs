//! Feature preprocessing: standardization and principal-component reduction.

pub mod pca;
pub mod scaler;

pub use pca::{Pca, PcaError};
pub use scaler::StandardScaler;
