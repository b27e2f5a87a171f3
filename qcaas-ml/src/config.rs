//! Configuration types for the comparison pipeline.
//!
//! One [`PipelineConfig`] is handed to the orchestrator at construction; nothing in the
//! crate reads process-wide settings.

use crate::error::MlError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Qubit count used by the degraded quantum path.
pub const FALLBACK_QUBITS: usize = 1;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the dataset CSV files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Fraction of samples held out for testing.
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    /// Seed shared by splitting, SVM and quantum training.
    #[serde(default = "default_random_state")]
    pub random_state: u64,
    /// Classical SVM settings.
    #[serde(default)]
    pub svm: SvmConfig,
    /// Variational quantum classifier settings.
    #[serde(default)]
    pub quantum: QuantumConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            test_size: default_test_size(),
            random_state: default_random_state(),
            svm: SvmConfig::default(),
            quantum: QuantumConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<(), MlError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(MlError::config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.svm.c <= 0.0 {
            return Err(MlError::config(format!(
                "svm.c must be positive, got {}",
                self.svm.c
            )));
        }
        if self.svm.tolerance <= 0.0 {
            return Err(MlError::config(format!(
                "svm.tolerance must be positive, got {}",
                self.svm.tolerance
            )));
        }
        if let Gamma::Value(g) = self.svm.gamma {
            if g <= 0.0 {
                return Err(MlError::config(format!(
                    "svm.gamma must be positive, got {g}"
                )));
            }
        }
        if self.quantum.num_qubits == 0 {
            return Err(MlError::config("quantum.num_qubits must be at least 1"));
        }
        if self.quantum.max_iterations == 0 || self.quantum.fallback_max_iterations == 0 {
            return Err(MlError::config(
                "quantum iteration budgets must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_test_size() -> f64 {
    0.25
}

fn default_random_state() -> u64 {
    42
}

/// RBF kernel width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gamma {
    /// `1 / (n_features * Var(X))` computed on the training partition.
    Scale,
    /// A fixed width.
    Value(f64),
}

/// Classical SVM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmConfig {
    /// Soft-margin penalty.
    #[serde(default = "default_c")]
    pub c: f64,
    #[serde(default = "default_gamma")]
    pub gamma: Gamma,
    /// Stopping tolerance of the SMO solver.
    #[serde(default = "default_svm_tolerance")]
    pub tolerance: f64,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            c: default_c(),
            gamma: default_gamma(),
            tolerance: default_svm_tolerance(),
        }
    }
}

fn default_c() -> f64 {
    1.0
}

fn default_gamma() -> Gamma {
    Gamma::Scale
}

fn default_svm_tolerance() -> f64 {
    1e-3
}

/// Derivative-free optimizer used to train the variational circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    #[default]
    NelderMead,
    Spsa,
}

/// Variational quantum classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantumConfig {
    /// Qubits on the primary path; also the PCA target dimension.
    #[serde(default = "default_num_qubits")]
    pub num_qubits: usize,
    /// Repetitions of the ZZ feature map.
    #[serde(default = "default_reps")]
    pub feature_map_reps: usize,
    /// Repetitions of the RealAmplitudes ansatz.
    #[serde(default = "default_reps")]
    pub ansatz_reps: usize,
    /// Optimizer iteration budget on the primary path.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Optimizer iteration budget on the single-qubit fallback path.
    #[serde(default = "default_fallback_max_iterations")]
    pub fallback_max_iterations: usize,
    /// Measurement shots per circuit; 0 reads exact probabilities.
    #[serde(default = "default_shots")]
    pub shots: usize,
    #[serde(default)]
    pub optimizer: OptimizerKind,
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            num_qubits: default_num_qubits(),
            feature_map_reps: default_reps(),
            ansatz_reps: default_reps(),
            max_iterations: default_max_iterations(),
            fallback_max_iterations: default_fallback_max_iterations(),
            shots: default_shots(),
            optimizer: OptimizerKind::default(),
        }
    }
}

fn default_num_qubits() -> usize {
    2
}

fn default_reps() -> usize {
    1
}

fn default_max_iterations() -> usize {
    50
}

fn default_fallback_max_iterations() -> usize {
    25
}

fn default_shots() -> usize {
    1024
}
