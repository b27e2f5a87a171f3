//! Cleaning and encoding steps used by the data preparer.

use crate::data::FeatureMatrix;
use crate::data::schema::ColumnData;
use std::collections::BTreeSet;

/// Category substituted for values that median imputation cannot fill.
pub const SENTINEL_CATEGORY: &str = "Unknown";

/// Median of a slice of finite values, `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Fill missing numeric cells with the column median, and any cell that is still
/// missing afterwards (categorical cells, or a numeric column with no values at all)
/// with [`SENTINEL_CATEGORY`].
pub fn impute(column: ColumnData) -> ColumnData {
    match column {
        ColumnData::Numeric(values) => {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            match median(&present) {
                Some(m) => ColumnData::Numeric(
                    values.into_iter().map(|v| Some(v.unwrap_or(m))).collect(),
                ),
                None => ColumnData::Categorical(
                    values
                        .into_iter()
                        .map(|_| Some(SENTINEL_CATEGORY.to_string()))
                        .collect(),
                ),
            }
        }
        ColumnData::Categorical(values) => ColumnData::Categorical(
            values
                .into_iter()
                .map(|v| Some(v.unwrap_or_else(|| SENTINEL_CATEGORY.to_string())))
                .collect(),
        ),
    }
}

/// Maps category strings to dense codes in lexical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let classes: BTreeSet<&str> = values.into_iter().collect();
        Self {
            classes: classes.into_iter().map(String::from).collect(),
        }
    }

    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Encode a fully-imputed column as floats: numeric cells pass through, categorical
/// cells become their label-encoder code.
pub fn encode_column(column: &ColumnData) -> Vec<f64> {
    match column {
        ColumnData::Numeric(values) => values.iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
        ColumnData::Categorical(values) => {
            let encoder = LabelEncoder::fit(values.iter().flatten().map(String::as_str));
            values
                .iter()
                .map(|v| {
                    v.as_deref()
                        .and_then(|s| encoder.transform(s))
                        .map_or(f64::NAN, |code| code as f64)
                })
                .collect()
        }
    }
}

/// Replace any non-finite entry with the median of the finite entries of its column.
///
/// Returns the number of cells replaced. A column with no finite entries is zeroed.
pub fn impute_non_finite(matrix: &mut FeatureMatrix) -> usize {
    let mut replaced = 0;
    for mut column in matrix.column_iter_mut() {
        let finite: Vec<f64> = column.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.len() == column.len() {
            continue;
        }
        let fill = median(&finite).unwrap_or(0.0);
        for v in column.iter_mut() {
            if !v.is_finite() {
                *v = fill;
                replaced += 1;
            }
        }
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0]), Some(3.0));
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_impute_numeric_median() {
        let col = ColumnData::Numeric(vec![Some(1.0), None, Some(10.0), Some(4.0)]);
        assert_eq!(
            impute(col),
            ColumnData::Numeric(vec![Some(1.0), Some(4.0), Some(10.0), Some(4.0)])
        );
    }

    #[test]
    fn test_impute_categorical_sentinel() {
        let col = ColumnData::Categorical(vec![Some("a".into()), None]);
        assert_eq!(
            impute(col),
            ColumnData::Categorical(vec![Some("a".into()), Some("Unknown".into())])
        );
    }

    #[test]
    fn test_impute_all_missing_numeric_falls_back_to_sentinel() {
        let col = ColumnData::Numeric(vec![None, None]);
        assert_eq!(
            impute(col),
            ColumnData::Categorical(vec![Some("Unknown".into()), Some("Unknown".into())])
        );
    }

    #[test]
    fn test_label_encoder_lexical_order() {
        let enc = LabelEncoder::fit(["versicolor", "setosa", "virginica", "setosa"]);
        assert_eq!(enc.classes(), &["setosa", "versicolor", "virginica"]);
        assert_eq!(enc.transform("setosa"), Some(0));
        assert_eq!(enc.transform("virginica"), Some(2));
        assert_eq!(enc.transform("rose"), None);
    }

    #[test]
    fn test_encode_column() {
        let col = ColumnData::Categorical(vec![
            Some("Male".into()),
            Some("Female".into()),
            Some("Other".into()),
            Some("Female".into()),
        ]);
        assert_eq!(encode_column(&col), vec![1.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_impute_non_finite() {
        let mut m = DMatrix::from_row_slice(
            3,
            2,
            &[1.0, f64::NAN, f64::NAN, 2.0, 5.0, f64::INFINITY],
        );
        assert_eq!(impute_non_finite(&mut m), 3);
        assert_eq!(m[(1, 0)], 3.0);
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(2, 1)], 2.0);
    }
}
