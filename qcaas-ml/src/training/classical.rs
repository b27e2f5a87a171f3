//! Classical baseline: standardize, split, fit an RBF SVM, score the held-out rows.

use crate::algorithms::SvmClassifier;
use crate::config::PipelineConfig;
use crate::data::FeatureMatrix;
use crate::error::MlError;
use crate::preprocess::StandardScaler;
use crate::training::metrics::{MetricsReport, score};
use crate::training::split::{TrainTestSplit, stratified_split};
use tracing::info;

/// Train and evaluate the classical classifier.
///
/// Scaling is fit on the whole matrix before the split.
pub fn train_classical(
    x: &FeatureMatrix,
    y: &[usize],
    config: &PipelineConfig,
) -> Result<MetricsReport, MlError> {
    let scaled = StandardScaler::fit_transform(x)?;
    let indices = stratified_split(y, config.test_size, config.random_state)?;
    let split = TrainTestSplit::from_indices(&scaled, y, &indices);

    info!(
        train = split.y_train.len(),
        test = split.y_test.len(),
        "Phase 1: training classical SVM"
    );
    let model = SvmClassifier::new(config.svm.clone()).fit(&split.x_train, &split.y_train)?;
    let predictions = model.predict(&split.x_test);
    let metrics = score(&split.y_test, &predictions);
    info!(
        accuracy = metrics.accuracy,
        support_vectors = model.n_support(),
        gamma = model.gamma(),
        "SVM training complete"
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_clusters() -> (FeatureMatrix, Vec<usize>) {
        let mut data = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let t = i as f64 * 0.05;
            data.extend_from_slice(&[10.0 + t, 200.0 - t]);
            labels.push(0);
            data.extend_from_slice(&[20.0 - t, 100.0 + t]);
            labels.push(1);
        }
        (FeatureMatrix::from_row_slice(40, 2, &data), labels)
    }

    #[test]
    fn test_train_classical_separable() {
        let (x, y) = two_clusters();
        let metrics = train_classical(&x, &y, &PipelineConfig::default()).unwrap();
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.f1_score, 1.0);
    }

    #[test]
    fn test_train_classical_deterministic() {
        let (x, mut y) = two_clusters();
        // Flip a few labels so the problem is not trivially separable.
        y[3] = 0;
        y[10] = 1;
        y[17] = 0;
        let config = PipelineConfig::default();
        let a = train_classical(&x, &y, &config).unwrap();
        let b = train_classical(&x, &y, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_train_classical_split_failure() {
        let x = FeatureMatrix::zeros(5, 2);
        let err = train_classical(&x, &[0, 0, 0, 0, 1], &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, MlError::Split(_)));
    }
}
