//! Seeded, stratified train/test partitioning.

use crate::data::{FeatureMatrix, LabelVector, select_labels, select_rows};
use crate::error::MlError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Row indices of each partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// A materialized train/test partition.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: FeatureMatrix,
    pub x_test: FeatureMatrix,
    pub y_train: LabelVector,
    pub y_test: LabelVector,
}

impl TrainTestSplit {
    pub fn from_indices(x: &FeatureMatrix, y: &[usize], indices: &SplitIndices) -> Self {
        Self {
            x_train: select_rows(x, &indices.train),
            x_test: select_rows(x, &indices.test),
            y_train: select_labels(y, &indices.train),
            y_test: select_labels(y, &indices.test),
        }
    }
}

/// Partition `labels` so every class keeps its proportion in both halves.
///
/// Fails when a class has a single member, or when either partition would be smaller
/// than the number of classes.
pub fn stratified_split(
    labels: &[usize],
    test_size: f64,
    seed: u64,
) -> Result<SplitIndices, MlError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MlError::split(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }
    let n = labels.len();
    let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (row, &label) in labels.iter().enumerate() {
        members.entry(label).or_default().push(row);
    }
    let n_classes = members.len();

    if let Some((class, rows)) = members.iter().find(|(_, rows)| rows.len() < 2) {
        return Err(MlError::split(format!(
            "class {class} has only {} member(s); stratified splitting needs at least 2 per class",
            rows.len()
        )));
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test < n_classes || n_train < n_classes {
        return Err(MlError::split(format!(
            "{n} samples give train={n_train}, test={n_test}; both must be at least the number of classes ({n_classes})"
        )));
    }

    let counts: Vec<usize> = members.values().map(Vec::len).collect();
    let allocation = allocate(&counts, n, n_test);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (mut rows, take) in members.into_values().zip(allocation) {
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..take]);
        train.extend_from_slice(&rows[take..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(SplitIndices { train, test })
}

/// Largest-remainder apportionment of `n_test` across classes, keeping at least one
/// member of every class in the training partition.
fn allocate(counts: &[usize], n: usize, n_test: usize) -> Vec<usize> {
    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| n_test as f64 * c as f64 / n as f64)
        .collect();
    let mut take: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    let mut remaining = n_test - take.iter().sum::<usize>();
    for &class in order.iter().cycle() {
        if remaining == 0 {
            break;
        }
        if take[class] + 1 < counts[class] {
            take[class] += 1;
            remaining -= 1;
        }
    }

    take
}
