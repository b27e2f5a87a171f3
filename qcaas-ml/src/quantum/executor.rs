//! Quantum execution backends.

use super::optimizer::{NelderMead, Optimizer, Spsa};
use super::sampler::Sampler;
use super::vqc::Vqc;
use super::{QuantumError, Stage};
use crate::config::OptimizerKind;
use crate::data::{FeatureMatrix, LabelVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use tracing::debug;

/// Everything a backend needs to train a classifier and label the held-out rows.
#[derive(Debug, Clone, Copy)]
pub struct QuantumTask<'a> {
    pub stage: Stage,
    pub x_train: &'a FeatureMatrix,
    pub y_train: &'a [usize],
    pub x_test: &'a FeatureMatrix,
    pub num_qubits: usize,
    pub num_classes: usize,
    pub feature_map_reps: usize,
    pub ansatz_reps: usize,
    pub max_iterations: usize,
    pub shots: usize,
    pub optimizer: OptimizerKind,
    pub seed: u64,
}

/// Trains a variational classifier and returns test-set predictions.
pub trait QuantumExecutor: Send + Sync {
    fn name(&self) -> &str;

    fn execute(&self, task: &QuantumTask<'_>) -> Result<LabelVector, QuantumError>;
}

/// In-process statevector simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatorExecutor;

impl QuantumExecutor for SimulatorExecutor {
    fn name(&self) -> &str {
        "statevector"
    }

    fn execute(&self, task: &QuantumTask<'_>) -> Result<LabelVector, QuantumError> {
        let mut vqc = Vqc::new(
            task.num_qubits,
            task.feature_map_reps,
            task.ansatz_reps,
            task.num_classes,
        )?;

        let mut rng = StdRng::seed_from_u64(task.seed);
        let initial_point: Vec<f64> = (0..vqc.num_parameters())
            .map(|_| rng.gen_range(-PI..PI))
            .collect();
        let mut optimizer: Box<dyn Optimizer> = match task.optimizer {
            OptimizerKind::NelderMead => Box::new(NelderMead::default()),
            OptimizerKind::Spsa => Box::new(Spsa::new(task.seed)),
        };
        let mut sampler = Sampler::new(task.shots, task.seed);

        let result = vqc.fit(
            task.x_train,
            task.y_train,
            optimizer.as_mut(),
            &mut sampler,
            &initial_point,
            task.max_iterations,
        )?;
        debug!(
            stage = %task.stage,
            qubits = task.num_qubits,
            parameters = initial_point.len(),
            loss = result.fun,
            "Quantum classifier trained"
        );
        vqc.predict(task.x_test, &mut sampler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_is_deterministic() {
        let x = FeatureMatrix::from_row_slice(8, 1, &[-1.5, -1.2, -1.0, -0.7, 0.7, 1.0, 1.2, 1.5]);
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        let task = QuantumTask {
            stage: Stage::Primary,
            x_train: &x,
            y_train: &y,
            x_test: &x,
            num_qubits: 1,
            num_classes: 2,
            feature_map_reps: 1,
            ansatz_reps: 1,
            max_iterations: 20,
            shots: 256,
            optimizer: OptimizerKind::NelderMead,
            seed: 42,
        };
        let a = SimulatorExecutor.execute(&task).unwrap();
        let b = SimulatorExecutor.execute(&task).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.iter().all(|&label| label < 2));
    }

    #[test]
    fn test_simulator_rejects_oversized_register() {
        let x = FeatureMatrix::zeros(4, 1);
        let task = QuantumTask {
            stage: Stage::Primary,
            x_train: &x,
            y_train: &[0, 1, 0, 1],
            x_test: &x,
            num_qubits: 0,
            num_classes: 2,
            feature_map_reps: 1,
            ansatz_reps: 1,
            max_iterations: 5,
            shots: 0,
            optimizer: OptimizerKind::Spsa,
            seed: 1,
        };
        let err = SimulatorExecutor.execute(&task).unwrap_err();
        assert!(err.is_sizing());
    }
}
