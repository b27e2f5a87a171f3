//! RBF-kernel support-vector classifier.
//!
//! Each pair of classes is fit as a binary C-SVC with `linfa-svm`; predictions are
//! decided by one-vs-one voting.

use crate::config::{Gamma, SvmConfig};
use crate::data::{FeatureMatrix, LabelVector};
use crate::error::MlError;
use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// `1 / (n_features * Var(X))` over every entry of `x`, or 1 when `x` has no spread.
pub fn scale_gamma(x: &FeatureMatrix) -> f64 {
    let n = x.len() as f64;
    if n == 0.0 {
        return 1.0;
    }
    let mean = x.sum() / n;
    let var = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if var > 0.0 {
        1.0 / (x.ncols() as f64 * var)
    } else {
        1.0
    }
}

/// linfa's Gaussian kernel is `exp(-||a - b||^2 / eps)`, so `eps = 1 / gamma`.
fn kernel_eps(gamma: f64) -> f64 {
    1.0 / gamma
}

fn to_array(x: &FeatureMatrix) -> Array2<f64> {
    Array2::from_shape_fn((x.nrows(), x.ncols()), |(r, c)| x[(r, c)])
}

/// Unfitted classifier with its hyperparameters.
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    config: SvmConfig,
}

impl SvmClassifier {
    pub fn new(config: SvmConfig) -> Self {
        Self { config }
    }

    pub fn fit(&self, x: &FeatureMatrix, y: &[usize]) -> Result<FittedSvm, MlError> {
        if x.nrows() != y.len() {
            return Err(MlError::invalid_input(format!(
                "feature rows ({}) and labels ({}) differ",
                x.nrows(),
                y.len()
            )));
        }
        let classes: Vec<usize> = y
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(MlError::invalid_input(
                "SVM training needs at least two classes",
            ));
        }

        let gamma = match self.config.gamma {
            Gamma::Scale => scale_gamma(x),
            Gamma::Value(g) => g,
        };
        let records = to_array(x);
        let c = self.config.c;

        let mut models = Vec::with_capacity(classes.len() * (classes.len() - 1) / 2);
        for (a, &positive) in classes.iter().enumerate() {
            for &negative in &classes[a + 1..] {
                let members: Vec<usize> = (0..y.len())
                    .filter(|&i| y[i] == positive || y[i] == negative)
                    .collect();
                let pair_records = records.select(ndarray::Axis(0), &members);
                let targets: Array1<bool> = members.iter().map(|&i| y[i] == positive).collect();
                let dataset = Dataset::new(pair_records, targets);

                let svm = Svm::<_, bool>::params()
                    .gaussian_kernel(kernel_eps(gamma))
                    .pos_neg_weights(c, c)
                    .eps(self.config.tolerance)
                    .fit(&dataset)?;
                debug!(
                    positive,
                    negative,
                    samples = members.len(),
                    support = svm.nsupport(),
                    "Fitted binary SVM"
                );

                models.push(PairModel {
                    positive,
                    negative,
                    svm,
                });
            }
        }

        Ok(FittedSvm {
            gamma,
            classes,
            models,
        })
    }
}

/// One-vs-one decision function for a single class pair.
struct PairModel {
    positive: usize,
    negative: usize,
    svm: Svm<f64, bool>,
}

/// A trained classifier.
pub struct FittedSvm {
    gamma: f64,
    classes: Vec<usize>,
    models: Vec<PairModel>,
}

impl std::fmt::Debug for FittedSvm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FittedSvm")
            .field("gamma", &self.gamma)
            .field("classes", &self.classes)
            .field("pairs", &self.models.len())
            .finish()
    }
}

impl FittedSvm {
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Support vectors summed over every pairwise model.
    pub fn n_support(&self) -> usize {
        self.models.iter().map(|m| m.svm.nsupport()).sum()
    }

    /// Predict one label per row; vote ties go to the smallest class.
    pub fn predict(&self, x: &FeatureMatrix) -> LabelVector {
        let records = to_array(x);
        let mut votes: Vec<HashMap<usize, usize>> = vec![HashMap::new(); x.nrows()];
        for model in &self.models {
            let decisions: Array1<bool> = model.svm.predict(&records);
            for (row, &is_positive) in decisions.iter().enumerate() {
                let winner = if is_positive {
                    model.positive
                } else {
                    model.negative
                };
                *votes[row].entry(winner).or_default() += 1;
            }
        }
        votes.iter().map(|row| self.tally(row)).collect()
    }

    fn tally(&self, votes: &HashMap<usize, usize>) -> usize {
        let mut best = self.classes[0];
        let mut best_votes = 0;
        for &class in &self.classes {
            let v = votes.get(&class).copied().unwrap_or(0);
            if v > best_votes {
                best = class;
                best_votes = v;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> (FeatureMatrix, LabelVector) {
        let centers = [(-2.0, -2.0), (2.0, 2.0), (-2.0, 2.0)];
        let offsets = [(0.0, 0.0), (0.3, -0.2), (-0.25, 0.1), (0.1, 0.35), (-0.15, -0.3)];
        let mut data = Vec::new();
        let mut labels = Vec::new();
        for (class, (cx, cy)) in centers.iter().enumerate() {
            for (dx, dy) in offsets {
                data.push(cx + dx);
                data.push(cy + dy);
                labels.push(class);
            }
        }
        (FeatureMatrix::from_row_slice(labels.len(), 2, &data), labels)
    }

    #[test]
    fn test_scale_gamma() {
        let x = FeatureMatrix::from_row_slice(2, 2, &[0.0, 0.0, 2.0, 2.0]);
        // Var of [0, 0, 2, 2] = 1
        assert!((scale_gamma(&x) - 0.5).abs() < 1e-12);
        assert_eq!(scale_gamma(&FeatureMatrix::from_element(3, 2, 4.0)), 1.0);
    }

    #[test]
    fn test_kernel_eps_is_inverse_gamma() {
        assert_eq!(kernel_eps(0.5), 2.0);
        assert_eq!(kernel_eps(1.0), 1.0);
    }

    #[test]
    fn test_to_array_keeps_row_major_layout() {
        let x = FeatureMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let a = to_array(&x);
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(a[[0, 2]], 3.0);
        assert_eq!(a[[1, 0]], 4.0);
    }

    #[test]
    fn test_separable_binary() {
        let x = FeatureMatrix::from_row_slice(
            6,
            1,
            &[-3.0, -2.5, -2.0, 2.0, 2.5, 3.0],
        );
        let y = vec![0, 0, 0, 1, 1, 1];
        let model = SvmClassifier::new(SvmConfig::default()).fit(&x, &y).unwrap();
        assert_eq!(model.predict(&x), y);
        let unseen = FeatureMatrix::from_row_slice(2, 1, &[-4.0, 4.0]);
        assert_eq!(model.predict(&unseen), vec![0, 1]);
    }

    #[test]
    fn test_multiclass_one_vs_one() {
        let (x, y) = blobs();
        let model = SvmClassifier::new(SvmConfig::default()).fit(&x, &y).unwrap();
        assert_eq!(model.classes(), &[0, 1, 2]);
        assert_eq!(model.predict(&x), y);
        assert!(model.n_support() > 0);
    }

    #[test]
    fn test_fixed_gamma_is_used() {
        let (x, y) = blobs();
        let config = SvmConfig {
            gamma: Gamma::Value(0.25),
            ..SvmConfig::default()
        };
        let model = SvmClassifier::new(config).fit(&x, &y).unwrap();
        assert_eq!(model.gamma(), 0.25);
        assert_eq!(model.predict(&x), y);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = blobs();
        let svm = SvmClassifier::new(SvmConfig::default());
        let a = svm.fit(&x, &y).unwrap();
        let b = svm.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&x), b.predict(&x));
        assert_eq!(a.n_support(), b.n_support());
    }

    #[test]
    fn test_vote_ties_go_to_smallest_class() {
        let (x, y) = blobs();
        let model = SvmClassifier::new(SvmConfig::default()).fit(&x, &y).unwrap();
        let three_way: HashMap<usize, usize> = [(0, 1), (1, 1), (2, 1)].into_iter().collect();
        assert_eq!(model.tally(&three_way), 0);
        let two_way: HashMap<usize, usize> = [(1, 1), (2, 1)].into_iter().collect();
        assert_eq!(model.tally(&two_way), 1);
    }

    #[test]
    fn test_single_class_rejected() {
        let x = FeatureMatrix::zeros(3, 2);
        let err = SvmClassifier::new(SvmConfig::default())
            .fit(&x, &[1, 1, 1])
            .unwrap_err();
        assert!(matches!(err, MlError::InvalidInput(_)));
    }

    #[test]
    fn test_row_label_mismatch_rejected() {
        let x = FeatureMatrix::zeros(3, 2);
        assert!(SvmClassifier::new(SvmConfig::default()).fit(&x, &[0, 1]).is_err());
    }
}
