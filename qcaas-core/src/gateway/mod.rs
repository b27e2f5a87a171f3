//! # HTTP Gateway
//!
//! REST surface for the comparison pipeline. A client posts a dataset name, the
//! pipeline runs on a blocking worker, and the result (or a classified error) comes
//! back as JSON.

mod response;
mod server;

pub use response::ApiError;
pub use server::{SharedPipeline, cors_layer, router as gateway_router, run as run_gateway};
