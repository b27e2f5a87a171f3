//! Static registry of the datasets the pipeline knows how to prepare.

use crate::error::MlError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dataset-specific normalization applied to an integer target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelRule {
    /// Use the labels as they are.
    #[default]
    AsIs,
    /// Ordinal severity score collapsed to presence/absence: `label > 0` → 1, else 0.
    BinarizePositive,
}

impl LabelRule {
    pub fn apply(self, label: i64) -> i64 {
        match self {
            Self::AsIs => label,
            Self::BinarizePositive => i64::from(label > 0),
        }
    }
}

/// Where a dataset lives and how to read its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Lookup key, lowercase.
    pub id: String,
    /// File name relative to the configured data directory.
    pub file: String,
    /// Name of the label column.
    pub target: String,
    /// Columns removed before feature extraction; absent ones are ignored.
    #[serde(default)]
    pub drop: Vec<String>,
    #[serde(default)]
    pub label_rule: LabelRule,
}

impl DatasetSpec {
    pub fn new(id: &str, file: &str, target: &str, drop: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            file: file.to_string(),
            target: target.to_string(),
            drop: drop.iter().map(|c| c.to_string()).collect(),
            label_rule: LabelRule::AsIs,
        }
    }

    pub fn with_label_rule(mut self, rule: LabelRule) -> Self {
        self.label_rule = rule;
        self
    }

    /// Full path of the backing CSV under `data_dir`.
    pub fn source_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.file)
    }
}

/// Immutable identifier → [`DatasetSpec`] lookup.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    specs: Vec<DatasetSpec>,
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DatasetRegistry {
    pub fn new(specs: Vec<DatasetSpec>) -> Self {
        Self { specs }
    }

    /// The five datasets shipped with the service.
    pub fn builtin() -> Self {
        Self::new(vec![
            DatasetSpec::new("iris", "iris.csv", "Species", &["Id"]),
            DatasetSpec::new("stroke", "stroke.csv", "stroke", &["id"]),
            DatasetSpec::new(
                "water_potability",
                "water_potability.csv",
                "Potability",
                &[],
            ),
            DatasetSpec::new("heart", "heart.csv", "num", &["id"])
                .with_label_rule(LabelRule::BinarizePositive),
            DatasetSpec::new("diabetes", "diabetes.csv", "Outcome", &[]),
        ])
    }

    pub fn get(&self, id: &str) -> Result<&DatasetSpec, MlError> {
        self.specs
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| MlError::UnknownDataset {
                name: id.to_string(),
                valid: self.ids(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.specs.iter().any(|s| s.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.specs.iter().map(|s| s.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatasetSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Canonical form of a caller-supplied dataset identifier.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = DatasetRegistry::builtin();
        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.ids(),
            vec!["iris", "stroke", "water_potability", "heart", "diabetes"]
        );
        let iris = registry.get("iris").unwrap();
        assert_eq!(iris.target, "Species");
        assert_eq!(iris.drop, vec!["Id"]);
        assert_eq!(iris.label_rule, LabelRule::AsIs);
    }

    #[test]
    fn test_heart_declares_binarization() {
        let registry = DatasetRegistry::builtin();
        let heart = registry.get("heart").unwrap();
        assert_eq!(heart.label_rule, LabelRule::BinarizePositive);
        for other in ["iris", "stroke", "water_potability", "diabetes"] {
            assert_eq!(registry.get(other).unwrap().label_rule, LabelRule::AsIs);
        }
    }

    #[test]
    fn test_unknown_dataset() {
        let registry = DatasetRegistry::builtin();
        let err = registry.get("mnist").unwrap_err();
        match err {
            MlError::UnknownDataset { name, valid } => {
                assert_eq!(name, "mnist");
                assert_eq!(valid.len(), 5);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!registry.contains("Iris"));
    }

    #[test]
    fn test_label_rule() {
        assert_eq!(LabelRule::AsIs.apply(3), 3);
        assert_eq!(LabelRule::BinarizePositive.apply(0), 0);
        assert_eq!(LabelRule::BinarizePositive.apply(1), 1);
        assert_eq!(LabelRule::BinarizePositive.apply(4), 1);
        assert_eq!(LabelRule::BinarizePositive.apply(-2), 0);
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("  Water_Potability \n"), "water_potability");
        assert_eq!(normalize_identifier("IRIS"), "iris");
    }

    #[test]
    fn test_source_path() {
        let spec = DatasetSpec::new("iris", "iris.csv", "Species", &["Id"]);
        assert_eq!(
            spec.source_path(Path::new("/srv/data")),
            PathBuf::from("/srv/data/iris.csv")
        );
    }
}
