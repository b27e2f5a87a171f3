//! Raw tabular data loading.

use crate::error::MlError;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Cell values read as missing, matching the usual CSV conventions for NA.
pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA",
];

/// A single named column of raw cells; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub cells: Vec<Option<String>>,
}

/// Column-oriented table of raw string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<RawColumn>,
    pub row_count: usize,
}

impl RawTable {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Remove the named columns, skipping any that are not present.
    pub fn drop_columns(&mut self, names: &[String]) {
        self.columns.retain(|c| !names.contains(&c.name));
    }

    /// Detach a column from the table.
    pub fn take_column(&mut self, name: &str) -> Option<RawColumn> {
        let idx = self.position(name)?;
        Some(self.columns.remove(idx))
    }
}

/// Something that yields a [`RawTable`].
pub trait DataSource {
    fn load(&self) -> Result<RawTable, MlError>;

    /// Human-readable location, used in log lines.
    fn location(&self) -> String;
}

/// CSV file data source.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
    pub delimiter: u8,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for CsvSource {
    fn load(&self) -> Result<RawTable, MlError> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MlError::SourceNotFound {
                    path: self.path.clone(),
                }
            } else {
                MlError::Io(e)
            }
        })?;
        read_csv(file, self.delimiter)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse delimited text with a header row into a [`RawTable`].
///
/// Header names are trimmed, cell values are kept verbatim. Short rows are padded with
/// missing cells; rows wider than the header are rejected.
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, MlError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_matches('"').to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(MlError::schema("CSV has no header row"));
    }

    let mut columns: Vec<RawColumn> = headers
        .into_iter()
        .map(|name| RawColumn {
            name,
            cells: Vec::new(),
        })
        .collect();

    let mut row_count = 0;
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(MlError::schema(format!(
                "row {} has {} fields, header has {}",
                idx + 1,
                record.len(),
                columns.len()
            )));
        }
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let cell = record.get(col_idx).and_then(parse_cell);
            column.cells.push(cell);
        }
        row_count += 1;
    }

    Ok(RawTable { columns, row_count })
}

fn parse_cell(raw: &str) -> Option<String> {
    if MISSING_MARKERS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_basic() {
        let csv = "a,b,c\n1,x,3.5\n2,y,\n";
        let table = read_csv(csv.as_bytes(), b',').unwrap();
        assert_eq!(table.row_count, 2);
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert_eq!(table.columns[1].cells, vec![Some("x".into()), Some("y".into())]);
        assert_eq!(table.columns[2].cells, vec![Some("3.5".into()), None]);
    }

    #[test]
    fn test_missing_markers() {
        let csv = "a\nNA\nnan\nN/A\n 7 \n";
        let table = read_csv(csv.as_bytes(), b',').unwrap();
        assert_eq!(
            table.columns[0].cells,
            vec![None, None, None, Some(" 7 ".into())]
        );
    }

    #[test]
    fn test_cells_keep_whitespace_headers_do_not() {
        let csv = " gender ,age\n Male,40\nMale,41\n";
        let table = read_csv(csv.as_bytes(), b',').unwrap();
        assert_eq!(table.column_names(), vec!["gender", "age"]);
        assert_eq!(
            table.columns[0].cells,
            vec![Some(" Male".into()), Some("Male".into())]
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "a,b\n1\n2,3\n";
        let table = read_csv(csv.as_bytes(), b',').unwrap();
        assert_eq!(table.columns[1].cells, vec![None, Some("3".into())]);
    }

    #[test]
    fn test_wide_rows_are_rejected() {
        let csv = "a,b\n1,2,3\n";
        let err = read_csv(csv.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, MlError::Schema(_)));
    }

    #[test]
    fn test_drop_and_take_columns() {
        let csv = "Id,x,label\n1,2,a\n";
        let mut table = read_csv(csv.as_bytes(), b',').unwrap();
        table.drop_columns(&["Id".to_string(), "absent".to_string()]);
        assert_eq!(table.column_names(), vec!["x", "label"]);
        let label = table.take_column("label").unwrap();
        assert_eq!(label.cells, vec![Some("a".into())]);
        assert_eq!(table.column_names(), vec!["x"]);
        assert!(table.take_column("label").is_none());
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvSource::new(dir.path().join("nope.csv"));
        match source.load() {
            Err(MlError::SourceNotFound { path }) => assert!(path.ends_with("nope.csv")),
            other => panic!("expected SourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.csv");
        std::fs::write(&path, "x,y\n1,0\n2,1\n").unwrap();
        let table = CsvSource::new(&path).load().unwrap();
        assert_eq!(table.row_count, 2);
    }
}
