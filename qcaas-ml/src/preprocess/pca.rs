//! Principal-component projection.

use crate::data::FeatureMatrix;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PcaError {
    #[error("n_components={requested} must be between 1 and min(n_samples, n_features)={max}")]
    TooManyComponents { requested: usize, max: usize },

    #[error("cannot fit PCA on an empty matrix")]
    Empty,
}

/// Linear projection onto the leading eigenvectors of the covariance matrix.
#[derive(Debug, Clone)]
pub struct Pca {
    mean: DVector<f64>,
    /// One principal axis per row, in descending explained-variance order.
    components: DMatrix<f64>,
    explained_variance: Vec<f64>,
}

impl Pca {
    pub fn fit(x: &FeatureMatrix, n_components: usize) -> Result<Self, PcaError> {
        let (n, p) = x.shape();
        if n == 0 || p == 0 {
            return Err(PcaError::Empty);
        }
        let max = n.min(p);
        if n_components == 0 || n_components > max {
            return Err(PcaError::TooManyComponents {
                requested: n_components,
                max,
            });
        }

        let mean = DVector::from_iterator(p, x.column_iter().map(|c| c.sum() / n as f64));
        let centered = FeatureMatrix::from_fn(n, p, |r, c| x[(r, c)] - mean[c]);
        let denom = (n.saturating_sub(1)).max(1) as f64;
        let covariance = (centered.transpose() * &centered) / denom;

        let eigen = SymmetricEigen::new(covariance);
        let mut order: Vec<usize> = (0..p).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

        let mut components = DMatrix::zeros(n_components, p);
        let mut explained_variance = Vec::with_capacity(n_components);
        for (k, &idx) in order.iter().take(n_components).enumerate() {
            let axis = eigen.eigenvectors.column(idx);
            let pivot = axis
                .iter()
                .copied()
                .max_by(|a, b| a.abs().total_cmp(&b.abs()))
                .unwrap_or(1.0);
            let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
            for j in 0..p {
                components[(k, j)] = sign * axis[j];
            }
            explained_variance.push(eigen.eigenvalues[idx].max(0.0));
        }

        Ok(Self {
            mean,
            components,
            explained_variance,
        })
    }

    pub fn transform(&self, x: &FeatureMatrix) -> FeatureMatrix {
        let centered = FeatureMatrix::from_fn(x.nrows(), x.ncols(), |r, c| x[(r, c)] - self.mean[c]);
        centered * self.components.transpose()
    }

    pub fn fit_transform(x: &FeatureMatrix, n_components: usize) -> Result<FeatureMatrix, PcaError> {
        Ok(Self::fit(x, n_components)?.transform(x))
    }

    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    pub fn components(&self) -> &DMatrix<f64> {
        &self.components
    }

    pub fn explained_variance(&self) -> &[f64] {
        &self.explained_variance
    }
}
