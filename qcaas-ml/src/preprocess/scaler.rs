//! Zero-mean, unit-variance feature standardization.

use crate::data::FeatureMatrix;
use crate::error::MlError;
use nalgebra::DVector;

/// Per-column standardizer using the population standard deviation.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: DVector<f64>,
    scale: DVector<f64>,
}

impl StandardScaler {
    /// Learn column means and scales. Zero-variance columns get a scale of 1.
    pub fn fit(x: &FeatureMatrix) -> Result<Self, MlError> {
        if x.nrows() == 0 {
            return Err(MlError::invalid_input("cannot fit a scaler on zero samples"));
        }
        let n = x.nrows() as f64;
        let mut mean = DVector::zeros(x.ncols());
        let mut scale = DVector::zeros(x.ncols());
        for (j, column) in x.column_iter().enumerate() {
            let m = column.sum() / n;
            let var = column.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();
            mean[j] = m;
            scale[j] = if std > f64::EPSILON { std } else { 1.0 };
        }
        Ok(Self { mean, scale })
    }

    pub fn transform(&self, x: &FeatureMatrix) -> Result<FeatureMatrix, MlError> {
        if x.ncols() != self.mean.len() {
            return Err(MlError::invalid_input(format!(
                "scaler fitted on {} features, got {}",
                self.mean.len(),
                x.ncols()
            )));
        }
        Ok(FeatureMatrix::from_fn(x.nrows(), x.ncols(), |r, c| {
            (x[(r, c)] - self.mean[c]) / self.scale[c]
        }))
    }

    pub fn fit_transform(x: &FeatureMatrix) -> Result<FeatureMatrix, MlError> {
        Self::fit(x)?.transform(x)
    }

    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &DVector<f64> {
        &self.scale
    }
}
