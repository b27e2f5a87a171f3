//! Comparison orchestrator: prepare the dataset, train both classifiers, pick a winner.

use crate::config::PipelineConfig;
use crate::data::DataPreparer;
use crate::error::MlError;
use crate::quantum::{QuantumExecutor, QuantumTrainer, SimulatorExecutor};
use crate::registry::DatasetRegistry;
use crate::training::{MetricsReport, round_to, train_classical};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Which classifier scored the higher accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "SVM")]
    Svm,
    #[serde(rename = "VQC")]
    Vqc,
    Tie,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Svm => write!(f, "SVM"),
            Self::Vqc => write!(f, "VQC"),
            Self::Tie => write!(f, "Tie"),
        }
    }
}

/// Exact comparison of the (already rounded) accuracies.
pub fn determine_winner(svm_accuracy: f64, vqc_accuracy: f64) -> Winner {
    if svm_accuracy > vqc_accuracy {
        Winner::Svm
    } else if vqc_accuracy > svm_accuracy {
        Winner::Vqc
    } else {
        Winner::Tie
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub svm_metrics: MetricsReport,
    pub vqc_metrics: MetricsReport,
    pub winner: Winner,
    pub execution_time_seconds: f64,
    pub dataset_name: String,
}

/// Runs one classical-versus-quantum comparison per call. Holds no fitted state.
pub struct ComparisonPipeline {
    config: PipelineConfig,
    preparer: DataPreparer,
    executor: Arc<dyn QuantumExecutor>,
}

impl ComparisonPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, MlError> {
        config.validate()?;
        let preparer = DataPreparer::new(DatasetRegistry::builtin(), config.data_dir.clone());
        Ok(Self {
            config,
            preparer,
            executor: Arc::new(SimulatorExecutor),
        })
    }

    pub fn with_registry(mut self, registry: DatasetRegistry) -> Self {
        self.preparer = DataPreparer::new(registry, self.config.data_dir.clone());
        self
    }

    pub fn with_executor(mut self, executor: Arc<dyn QuantumExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &DatasetRegistry {
        self.preparer.registry()
    }

    /// Prepare `dataset_id`, then train the classical and quantum classifiers in turn.
    pub fn run(&self, dataset_id: &str) -> Result<ComparisonResult, MlError> {
        let started = Instant::now();
        info!(dataset = dataset_id, "Starting comparison pipeline");

        let data = self.preparer.prepare(dataset_id)?;
        let svm_metrics = train_classical(&data.features, &data.labels, &self.config)?;
        let quantum = QuantumTrainer::new(&self.config)
            .with_executor(Arc::clone(&self.executor))
            .train(&data.features, &data.labels)?;

        let execution_time_seconds = round_to(started.elapsed().as_secs_f64(), 2);
        let winner = determine_winner(svm_metrics.accuracy, quantum.metrics.accuracy);
        info!(
            dataset = dataset_id,
            %winner,
            svm_accuracy = svm_metrics.accuracy,
            vqc_accuracy = quantum.metrics.accuracy,
            quantum_stage = %quantum.stage,
            quantum_qubits = quantum.qubits,
            execution_time_seconds,
            "Comparison complete"
        );

        Ok(ComparisonResult {
            svm_metrics,
            vqc_metrics: quantum.metrics,
            winner,
            execution_time_seconds,
            dataset_name: dataset_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_rule() {
        assert_eq!(determine_winner(0.97, 0.94), Winner::Svm);
        assert_eq!(determine_winner(0.90, 0.90), Winner::Tie);
        assert_eq!(determine_winner(0.80, 0.85), Winner::Vqc);
    }

    #[test]
    fn test_winner_serialization() {
        assert_eq!(serde_json::to_string(&Winner::Svm).unwrap(), "\"SVM\"");
        assert_eq!(serde_json::to_string(&Winner::Vqc).unwrap(), "\"VQC\"");
        assert_eq!(serde_json::to_string(&Winner::Tie).unwrap(), "\"Tie\"");
        assert_eq!(Winner::Vqc.to_string(), "VQC");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PipelineConfig::default();
        config.test_size = 1.5;
        assert!(matches!(
            ComparisonPipeline::new(config),
            Err(MlError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_dataset_propagates() {
        let pipeline = ComparisonPipeline::new(PipelineConfig::default()).unwrap();
        assert!(matches!(
            pipeline.run("mnist"),
            Err(MlError::UnknownDataset { .. })
        ));
    }
}
