//! # QCaaS Core
//!
//! Service layer for QCaaS: layered configuration and the HTTP gateway that
//! exposes the classical-versus-quantum comparison pipeline.

pub mod config;
pub mod error;
pub mod gateway;

// Re-export commonly used types at the crate root.
pub use config::{AppConfig, LoggingConfig, ServerConfig, load_config, load_config_file};
pub use error::{CoreError, Result};
pub use gateway::{ApiError, SharedPipeline, gateway_router, run_gateway};
