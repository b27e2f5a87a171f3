//! Turns a registered dataset into a numeric feature matrix and label vector.

use crate::data::schema::ColumnData;
use crate::data::source::{CsvSource, DataSource, RawTable};
use crate::data::transform::{LabelEncoder, encode_column, impute, impute_non_finite};
use crate::data::{FeatureMatrix, LabelVector};
use crate::error::MlError;
use crate::registry::{DatasetRegistry, DatasetSpec};
use nalgebra::DMatrix;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output of the data preparer.
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Rows are samples; every entry is finite.
    pub features: FeatureMatrix,
    /// One dense class index per row of `features`.
    pub labels: LabelVector,
    pub feature_names: Vec<String>,
    /// Original label value for each class index.
    pub class_names: Vec<String>,
}

impl PreparedData {
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn n_classes(&self) -> usize {
        self.class_names.len()
    }
}

/// Loads, cleans and encodes registered datasets from a data directory.
#[derive(Debug, Clone)]
pub struct DataPreparer {
    registry: DatasetRegistry,
    data_dir: PathBuf,
}

impl DataPreparer {
    pub fn new(registry: DatasetRegistry, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            data_dir: data_dir.into(),
        }
    }

    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Prepare the dataset registered under `dataset_id`.
    pub fn prepare(&self, dataset_id: &str) -> Result<PreparedData, MlError> {
        let spec = self.registry.get(dataset_id)?;
        let source = CsvSource::new(spec.source_path(&self.data_dir));
        let table = source.load()?;
        info!(
            dataset = %spec.id,
            rows = table.row_count,
            path = %source.location(),
            "Loaded raw data"
        );
        let prepared = prepare_table(spec, table)?;
        info!(
            dataset = %spec.id,
            samples = prepared.n_samples(),
            features = prepared.n_features(),
            classes = prepared.n_classes(),
            "Data prepared"
        );
        Ok(prepared)
    }
}

/// Apply the cleaning rules of `spec` to an already-loaded table.
pub fn prepare_table(spec: &DatasetSpec, mut table: RawTable) -> Result<PreparedData, MlError> {
    table.drop_columns(&spec.drop);

    let target = table.take_column(&spec.target).ok_or_else(|| {
        MlError::schema(format!(
            "Target '{}' not found in dataset '{}' (columns: {})",
            spec.target,
            spec.id,
            table.column_names().join(", ")
        ))
    })?;

    // Imputation sees every loaded row, including rows whose target is missing.
    let mut feature_names = Vec::with_capacity(table.columns.len());
    let mut feature_columns = Vec::with_capacity(table.columns.len());
    for column in table.columns {
        feature_names.push(column.name);
        feature_columns.push(impute(ColumnData::infer(column.cells)));
    }

    let keep: Vec<usize> = target
        .cells
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| cell.as_ref().map(|_| i))
        .collect();
    let dropped = target.cells.len() - keep.len();
    if dropped > 0 {
        debug!(dataset = %spec.id, dropped, "Dropped rows with missing target");
    }
    if keep.is_empty() {
        return Err(MlError::schema(format!(
            "Dataset '{}' has no rows with a target value",
            spec.id
        )));
    }

    let encoded: Vec<Vec<f64>> = feature_columns
        .iter()
        .map(|col| encode_column(&col.select(&keep)))
        .collect();
    let mut features = DMatrix::from_fn(keep.len(), encoded.len(), |r, c| encoded[c][r]);

    let target = ColumnData::infer(target.cells).select(&keep);
    let (labels, class_names) = encode_labels(spec, &target)?;

    let replaced = impute_non_finite(&mut features);
    if replaced > 0 {
        debug!(dataset = %spec.id, replaced, "Replaced residual non-finite values");
    }

    if class_names.len() < 2 {
        return Err(MlError::schema(format!(
            "Target '{}' in dataset '{}' has {} distinct class(es); at least 2 are required",
            spec.target,
            spec.id,
            class_names.len()
        )));
    }

    Ok(PreparedData {
        features,
        labels,
        feature_names,
        class_names,
    })
}

/// Encode the (fully present) target column to dense class indices.
fn encode_labels(
    spec: &DatasetSpec,
    target: &ColumnData,
) -> Result<(LabelVector, Vec<String>), MlError> {
    match target {
        ColumnData::Categorical(values) => {
            let raw: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
            let encoder = LabelEncoder::fit(raw.iter().copied());
            let labels = raw
                .iter()
                .map(|v| {
                    encoder
                        .transform(v)
                        .ok_or_else(|| MlError::schema(format!("unencodable label '{v}'")))
                })
                .collect::<Result<LabelVector, _>>()?;
            Ok((labels, encoder.classes().to_vec()))
        }
        ColumnData::Numeric(values) => {
            let raw: Vec<i64> = values
                .iter()
                .flatten()
                .map(|v| spec.label_rule.apply(v.trunc() as i64))
                .collect();
            let classes: Vec<i64> = raw
                .iter()
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let labels = raw
                .iter()
                .map(|v| classes.binary_search(v).unwrap_or_default())
                .collect();
            Ok((labels, classes.iter().map(i64::to_string).collect()))
        }
    }
}
