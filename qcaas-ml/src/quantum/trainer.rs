//! Quantum trainer with a single-qubit fallback.
//!
//! `Primary` reduces the features to `num_qubits` principal components. If that
//! configuration fails with a sizing error, the trainer moves to `Fallback`
//! (one qubit, one component, a smaller iteration budget) and tries exactly once more.

use super::executor::{QuantumExecutor, QuantumTask, SimulatorExecutor};
use super::{QuantumError, QuantumOutcome, Stage};
use crate::config::{FALLBACK_QUBITS, PipelineConfig, QuantumConfig};
use crate::data::FeatureMatrix;
use crate::error::MlError;
use crate::preprocess::{Pca, StandardScaler};
use crate::training::metrics::{MetricsReport, score};
use crate::training::split::{SplitIndices, TrainTestSplit, stratified_split};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct QuantumTrainer {
    config: QuantumConfig,
    test_size: f64,
    random_state: u64,
    executor: Arc<dyn QuantumExecutor>,
}

impl QuantumTrainer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            config: config.quantum.clone(),
            test_size: config.test_size,
            random_state: config.random_state,
            executor: Arc::new(SimulatorExecutor),
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn QuantumExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn train(&self, x: &FeatureMatrix, y: &[usize]) -> Result<QuantumOutcome, MlError> {
        // The split depends only on the labels, so both stages share one partition.
        let indices = stratified_split(y, self.test_size, self.random_state)?;
        let num_classes = y.iter().max().map_or(0, |m| m + 1);

        let primary_qubits = self.config.num_qubits;
        info!(
            qubits = primary_qubits,
            backend = self.executor.name(),
            "Phase 2: configuring quantum classifier"
        );
        let primary = self.attempt(
            Stage::Primary,
            x,
            y,
            &indices,
            num_classes,
            primary_qubits,
            self.config.max_iterations,
        );
        let err = match primary {
            Ok(metrics) => return Ok(self.finish(metrics, Stage::Primary, primary_qubits)),
            Err(err) => err,
        };

        if !err.is_sizing() {
            error!(stage = %Stage::Primary, error = %err, "Quantum training failed");
            return Err(MlError::QuantumTraining {
                stage: Stage::Primary,
                source: err,
            });
        }

        warn!(
            error = %err,
            qubits = FALLBACK_QUBITS,
            max_iterations = self.config.fallback_max_iterations,
            "Quantum circuit sizing failed, falling back to single-qubit classifier"
        );
        match self.attempt(
            Stage::Fallback,
            x,
            y,
            &indices,
            num_classes,
            FALLBACK_QUBITS,
            self.config.fallback_max_iterations,
        ) {
            Ok(metrics) => Ok(self.finish(metrics, Stage::Fallback, FALLBACK_QUBITS)),
            Err(source) => {
                error!(stage = %Stage::Fallback, error = %source, "Quantum fallback failed");
                Err(MlError::QuantumTraining {
                    stage: Stage::Fallback,
                    source,
                })
            }
        }
    }

    fn finish(&self, metrics: MetricsReport, stage: Stage, qubits: usize) -> QuantumOutcome {
        info!(accuracy = metrics.accuracy, %stage, qubits, "VQC training complete");
        QuantumOutcome {
            metrics,
            stage,
            qubits,
        }
    }

    /// Reduce, scale, partition, train and score with a `qubits`-wide circuit.
    #[allow(clippy::too_many_arguments)]
    fn attempt(
        &self,
        stage: Stage,
        x: &FeatureMatrix,
        y: &[usize],
        indices: &SplitIndices,
        num_classes: usize,
        qubits: usize,
        max_iterations: usize,
    ) -> Result<MetricsReport, QuantumError> {
        let reduced = Pca::fit_transform(x, qubits)?;
        let scaled = StandardScaler::fit_transform(&reduced)
            .map_err(|e| QuantumError::Training(e.to_string()))?;
        let split = TrainTestSplit::from_indices(&scaled, y, indices);

        let task = QuantumTask {
            stage,
            x_train: &split.x_train,
            y_train: &split.y_train,
            x_test: &split.x_test,
            num_qubits: qubits,
            num_classes,
            feature_map_reps: self.config.feature_map_reps,
            ansatz_reps: self.config.ansatz_reps,
            max_iterations,
            shots: self.config.shots,
            optimizer: self.config.optimizer,
            seed: self.random_state,
        };
        let predictions = self.executor.execute(&task)?;
        if predictions.len() != split.y_test.len() {
            return Err(QuantumError::Execution(format!(
                "backend returned {} predictions for {} test rows",
                predictions.len(),
                split.y_test.len()
            )));
        }
        Ok(score(&split.y_test, &predictions))
    }
}

/// Train and evaluate the quantum classifier on the default simulator.
pub fn train_quantum(
    x: &FeatureMatrix,
    y: &[usize],
    config: &PipelineConfig,
) -> Result<QuantumOutcome, MlError> {
    QuantumTrainer::new(config).train(x, y)
}
