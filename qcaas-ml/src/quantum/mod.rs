//! Variational quantum classification on a statevector simulator.
//!
//! The execution layer reports failures as [`QuantumError`]; the trainer uses
//! [`QuantumError::is_sizing`] to decide whether the single-qubit fallback applies.

pub mod circuit;
pub mod executor;
pub mod optimizer;
pub mod sampler;
pub mod statevector;
pub mod trainer;
pub mod vqc;

use crate::preprocess::PcaError;
use crate::training::MetricsReport;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use circuit::{Circuit, Gate, RealAmplitudes, ZzFeatureMap};
pub use executor::{QuantumExecutor, QuantumTask, SimulatorExecutor};
pub use optimizer::{NelderMead, OptimizationResult, Optimizer, Spsa};
pub use sampler::Sampler;
pub use statevector::Statevector;
pub use trainer::QuantumTrainer;
pub use vqc::Vqc;

/// Largest register the simulator accepts.
pub const MAX_QUBITS: usize = 16;

/// Failure reported by the quantum execution layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    #[error("Invalid register size: {qubits} qubit(s), supported range is 1..={max}")]
    RegisterSize { qubits: usize, max: usize },

    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit register")]
    QubitIndex { qubit: usize, num_qubits: usize },

    #[error("Feature dimension mismatch: circuit expects {expected}, got {got}")]
    FeatureDimension { expected: usize, got: usize },

    #[error("Parameter count mismatch: circuit expects {expected}, got {got}")]
    ParameterCount { expected: usize, got: usize },

    #[error("Dimensionality reduction failed: {0}")]
    Reduction(#[from] PcaError),

    #[error("Quantum execution error: {0}")]
    Execution(String),

    #[error("Quantum training error: {0}")]
    Training(String),

    #[error("Training set is empty")]
    EmptyTrainingSet,
}

impl QuantumError {
    /// The circuit or register does not fit the data; a smaller circuit may succeed.
    pub fn is_sizing(&self) -> bool {
        matches!(
            self,
            Self::RegisterSize { .. }
                | Self::QubitIndex { .. }
                | Self::FeatureDimension { .. }
                | Self::ParameterCount { .. }
                | Self::Reduction(_)
        )
    }
}

/// Which configuration produced a quantum result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Primary,
    Fallback,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Metrics from whichever stage succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantumOutcome {
    pub metrics: MetricsReport,
    pub stage: Stage,
    pub qubits: usize,
}
