//! Error types for the qcaas-ml crate.

use crate::quantum::{QuantumError, Stage};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the comparison pipeline.
#[derive(Debug, Error)]
pub enum MlError {
    #[error("Unknown dataset: {name} (valid datasets: {})", valid.join(", "))]
    UnknownDataset { name: String, valid: Vec<String> },

    #[error("Required data file not found on server: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Split error: {0}")]
    Split(String),

    #[error("SVM training failed: {0}")]
    ClassicalTraining(#[from] linfa_svm::SvmError),

    #[error("Quantum training failed in {stage} stage: {source}")]
    QuantumTraining {
        stage: Stage,
        #[source]
        source: QuantumError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Coarse classification of an [`MlError`] for the calling transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller supplied bad input, or the data does not fit the dataset's schema.
    BadInput,
    /// A backing resource is missing from the deployment.
    NotFound,
    /// Anything else.
    Internal,
}

impl MlError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn split(msg: impl Into<String>) -> Self {
        Self::Split(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Which side of the boundary is responsible for this failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownDataset { .. }
            | Self::Schema(_)
            | Self::Split(_)
            | Self::InvalidInput(_) => ErrorClass::BadInput,
            Self::SourceNotFound { .. } => ErrorClass::NotFound,
            Self::ClassicalTraining(_)
            | Self::QuantumTraining { .. }
            | Self::Config(_)
            | Self::Io(_)
            | Self::Csv(_) => ErrorClass::Internal,
        }
    }
}
