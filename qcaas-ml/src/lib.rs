//! # qcaas-ml: classical versus quantum classification
//!
//! This crate holds the comparison pipeline: dataset preparation, an RBF support-vector
//! baseline, a variational quantum classifier simulated on a statevector backend, and
//! the metrics used to pick a winner.
//!
//! ```no_run
//! use qcaas_ml::{ComparisonPipeline, PipelineConfig};
//!
//! let pipeline = ComparisonPipeline::new(PipelineConfig::default())?;
//! let result = pipeline.run("iris")?;
//! println!("{} wins", result.winner);
//! # Ok::<(), qcaas_ml::MlError>(())
//! ```

// Foundation
pub mod config;
pub mod error;
pub mod registry;

// Data preparation
pub mod data;
pub mod preprocess;

// Classical path
pub mod algorithms;
pub mod training;

// Quantum path
pub mod quantum;

// Orchestration
pub mod pipeline;

// Re-exports
pub use config::{Gamma, OptimizerKind, PipelineConfig, QuantumConfig, SvmConfig};
pub use data::{DataPreparer, FeatureMatrix, LabelVector, PreparedData};
pub use error::{ErrorClass, MlError};
pub use pipeline::{ComparisonPipeline, ComparisonResult, Winner, determine_winner};
pub use quantum::trainer::train_quantum;
pub use quantum::{QuantumError, QuantumExecutor, QuantumOutcome, QuantumTask, Stage};
pub use registry::{DatasetRegistry, DatasetSpec, LabelRule, normalize_identifier};
pub use training::{MetricsReport, score, train_classical};
