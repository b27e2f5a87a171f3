//! Data ingestion: loading, cleaning, imputation and encoding.

pub mod prepare;
pub mod schema;
pub mod source;
pub mod transform;

/// Rows are samples, columns are features.
pub type FeatureMatrix = nalgebra::DMatrix<f64>;

/// One dense class index per sample.
pub type LabelVector = Vec<usize>;

pub use prepare::{DataPreparer, PreparedData, prepare_table};
pub use schema::{ColumnData, ColumnType};
pub use source::{CsvSource, DataSource, RawColumn, RawTable, read_csv};
pub use transform::{LabelEncoder, SENTINEL_CATEGORY};

/// Copy the given rows of `matrix`, in order.
pub fn select_rows(matrix: &FeatureMatrix, rows: &[usize]) -> FeatureMatrix {
    FeatureMatrix::from_fn(rows.len(), matrix.ncols(), |r, c| matrix[(rows[r], c)])
}

/// Copy the given entries of `labels`, in order.
pub fn select_labels(labels: &[usize], rows: &[usize]) -> LabelVector {
    rows.iter().map(|&r| labels[r]).collect()
}
