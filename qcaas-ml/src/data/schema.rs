//! Column type inference and typed column storage.

use serde::{Deserialize, Serialize};

/// Inferred column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// Typed cells of a single column; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    /// Numeric when every present cell parses as a float, categorical otherwise.
    pub fn infer(cells: Vec<Option<String>>) -> Self {
        match infer_column_type(&cells) {
            ColumnType::Numeric => Self::Numeric(
                cells
                    .iter()
                    .map(|c| c.as_deref().and_then(parse_number))
                    .collect(),
            ),
            ColumnType::Categorical => Self::Categorical(cells),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Numeric(_) => ColumnType::Numeric,
            Self::Categorical(_) => ColumnType::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn missing_count(&self) -> usize {
        match self {
            Self::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            Self::Categorical(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Keep only the cells at `rows`, in that order.
    pub fn select(&self, rows: &[usize]) -> Self {
        match self {
            Self::Numeric(v) => Self::Numeric(rows.iter().map(|&r| v[r]).collect()),
            Self::Categorical(v) => Self::Categorical(rows.iter().map(|&r| v[r].clone()).collect()),
        }
    }
}

/// Numeric cells may carry surrounding whitespace; text cells keep theirs.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Infer the column type from its present cells.
pub fn infer_column_type(cells: &[Option<String>]) -> ColumnType {
    let all_numeric = cells
        .iter()
        .flatten()
        .all(|s| parse_number(s).is_some());
    if all_numeric {
        ColumnType::Numeric
    } else {
        ColumnType::Categorical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(String::from)).collect()
    }

    #[test]
    fn test_infer_numeric() {
        let col = ColumnData::infer(cells(&[Some("1"), None, Some("2.5"), Some("-3e2")]));
        assert_eq!(
            col,
            ColumnData::Numeric(vec![Some(1.0), None, Some(2.5), Some(-300.0)])
        );
        assert_eq!(col.missing_count(), 1);
    }

    #[test]
    fn test_infer_categorical() {
        let col = ColumnData::infer(cells(&[Some("1"), Some("Male"), None]));
        assert_eq!(col.column_type(), ColumnType::Categorical);
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn test_padded_numbers_stay_numeric() {
        let col = ColumnData::infer(cells(&[Some(" 7 "), Some("8")]));
        assert_eq!(col, ColumnData::Numeric(vec![Some(7.0), Some(8.0)]));
    }

    #[test]
    fn test_padded_text_stays_distinct() {
        let col = ColumnData::infer(cells(&[Some(" Male"), Some("Male")]));
        assert_eq!(col, ColumnData::Categorical(cells(&[Some(" Male"), Some("Male")])));
    }

    #[test]
    fn test_all_missing_column_is_numeric() {
        assert_eq!(infer_column_type(&[None, None]), ColumnType::Numeric);
    }

    #[test]
    fn test_select_rows() {
        let col = ColumnData::Numeric(vec![Some(1.0), Some(2.0), None]);
        assert_eq!(col.select(&[2, 0]), ColumnData::Numeric(vec![None, Some(1.0)]));
    }
}
