//! Error types for the QCaaS service layer.
//!
//! Pipeline failures stay as [`qcaas_ml::MlError`]; this enum only adds what the
//! service itself can get wrong: configuration and socket setup.

/// Top-level error type for the qcaas-core library.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] qcaas_ml::MlError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A type alias for results using the top-level `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;
