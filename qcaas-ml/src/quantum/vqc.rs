//! Variational quantum classifier: feature map + trainable ansatz + parity readout.

use super::circuit::{RealAmplitudes, ZzFeatureMap};
use super::optimizer::{OptimizationResult, Optimizer};
use super::sampler::{Sampler, parity_probabilities};
use super::{QuantumError, Statevector};
use crate::data::{FeatureMatrix, LabelVector};
use tracing::debug;

/// Floor applied to predicted probabilities before taking logarithms.
const PROBABILITY_FLOOR: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct Vqc {
    feature_map: ZzFeatureMap,
    ansatz: RealAmplitudes,
    num_classes: usize,
    weights: Option<Vec<f64>>,
}

impl Vqc {
    pub fn new(
        num_qubits: usize,
        feature_map_reps: usize,
        ansatz_reps: usize,
        num_classes: usize,
    ) -> Result<Self, QuantumError> {
        if num_classes < 2 {
            return Err(QuantumError::Training(format!(
                "classifier needs at least 2 classes, got {num_classes}"
            )));
        }
        Ok(Self {
            feature_map: ZzFeatureMap::new(num_qubits, feature_map_reps)?,
            ansatz: RealAmplitudes::new(num_qubits, ansatz_reps)?,
            num_classes,
            weights: None,
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.feature_map.num_qubits()
    }

    pub fn num_parameters(&self) -> usize {
        self.ansatz.num_parameters()
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Feature-map states of every row; these do not depend on the trainable weights.
    pub fn encode(&self, x: &FeatureMatrix) -> Result<Vec<Statevector>, QuantumError> {
        if x.ncols() != self.num_qubits() {
            return Err(QuantumError::FeatureDimension {
                expected: self.num_qubits(),
                got: x.ncols(),
            });
        }
        x.row_iter()
            .map(|row| {
                let values: Vec<f64> = row.iter().copied().collect();
                self.feature_map.circuit(&values)?.run()
            })
            .collect()
    }

    pub fn fit(
        &mut self,
        x: &FeatureMatrix,
        y: &[usize],
        optimizer: &mut dyn Optimizer,
        sampler: &mut Sampler,
        initial_point: &[f64],
        max_iterations: usize,
    ) -> Result<OptimizationResult, QuantumError> {
        if x.nrows() == 0 {
            return Err(QuantumError::EmptyTrainingSet);
        }
        if x.nrows() != y.len() {
            return Err(QuantumError::Training(format!(
                "{} samples but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if let Some(&label) = y.iter().find(|&&label| label >= self.num_classes) {
            return Err(QuantumError::Training(format!(
                "label {label} outside 0..{}",
                self.num_classes
            )));
        }

        let encoded = self.encode(x)?;
        let ansatz = self.ansatz;
        let num_classes = self.num_classes;
        let mut objective = |theta: &[f64]| -> Result<f64, QuantumError> {
            let probabilities = class_probabilities(&ansatz, num_classes, &encoded, theta, sampler)?;
            let loss = cross_entropy(&probabilities, y);
            if loss.is_finite() {
                Ok(loss)
            } else {
                Err(QuantumError::Training(format!("loss is not finite ({loss})")))
            }
        };
        let result = optimizer.minimize(&mut objective, initial_point, max_iterations)?;
        debug!(
            optimizer = optimizer.name(),
            loss = result.fun,
            iterations = result.iterations,
            evaluations = result.evaluations,
            "Variational training finished"
        );
        self.weights = Some(result.x.clone());
        Ok(result)
    }

    /// Most probable class per row; ties go to the smallest class index.
    pub fn predict(
        &self,
        x: &FeatureMatrix,
        sampler: &mut Sampler,
    ) -> Result<LabelVector, QuantumError> {
        let weights = self
            .weights
            .as_deref()
            .ok_or_else(|| QuantumError::Training("classifier has not been fitted".into()))?;
        let encoded = self.encode(x)?;
        let probabilities =
            class_probabilities(&self.ansatz, self.num_classes, &encoded, weights, sampler)?;
        Ok(probabilities.iter().map(|p| argmax(p)).collect())
    }
}

fn class_probabilities(
    ansatz: &RealAmplitudes,
    num_classes: usize,
    encoded: &[Statevector],
    theta: &[f64],
    sampler: &mut Sampler,
) -> Result<Vec<Vec<f64>>, QuantumError> {
    let circuit = ansatz.circuit(theta)?;
    encoded
        .iter()
        .map(|state| {
            let mut state = state.clone();
            circuit.apply(&mut state)?;
            Ok(parity_probabilities(&sampler.sample(&state), num_classes))
        })
        .collect()
}

/// Mean negative log-likelihood of the true class.
pub fn cross_entropy(probabilities: &[Vec<f64>], y: &[usize]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let total: f64 = probabilities
        .iter()
        .zip(y)
        .map(|(p, &label)| -p[label].max(PROBABILITY_FLOOR).ln())
        .sum();
    total / y.len() as f64
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
