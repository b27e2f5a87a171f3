//! REST gateway server built on axum.

use super::response::ApiError;
use crate::config::{AppConfig, ServerConfig};
use crate::error::{CoreError, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use qcaas_ml::{ComparisonPipeline, ComparisonResult, DatasetRegistry, normalize_identifier};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

/// Pipeline shared by every request handler.
pub type SharedPipeline = Arc<ComparisonPipeline>;

/// Build the axum router with all gateway routes and the CORS layer.
///
/// The CORS layer answers every `OPTIONS` request itself, with or without the
/// handshake headers; `options_no_content` sits outside it so those answers are 204.
pub fn router(pipeline: SharedPipeline, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/run_comparison", post(run_comparison_handler))
        .layer(cors_layer(server))
        .layer(middleware::from_fn(options_no_content))
        .with_state(pipeline)
}

/// Rewrite successful `OPTIONS` answers to 204 No Content.
async fn options_no_content(req: Request, next: Next) -> Response {
    let is_options = *req.method() == Method::OPTIONS;
    let mut response = next.run(req).await;
    if is_options && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// CORS policy for the configured origins.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match server.allowed_origins() {
        None => {
            warn!("CORS is open to all origins ('*'); set server.cors_origins in production");
            layer.allow_origin(AllowOrigin::any())
        }
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "Ignoring malformed CORS origin");
                        None
                    }
                })
                .collect();
            info!(origins = ?origins, "CORS configured");
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}

/// API information.
async fn root_handler(State(pipeline): State<SharedPipeline>) -> impl IntoResponse {
    Json(json!({
        "message": "QCaaS API - Quantum-Enhanced Classification as a Service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/api/health",
            "run_comparison": "/api/run_comparison (POST)",
        },
        "valid_datasets": pipeline.registry().ids(),
    }))
}

/// Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    info!("Health check endpoint was hit");
    let now = chrono::Utc::now();
    Json(json!({
        "status": "healthy",
        "message": "QCaaS API is running",
        "timestamp": now.timestamp_millis() as f64 / 1000.0,
    }))
}

/// Run one comparison for the dataset named in the JSON body.
async fn run_comparison_handler(
    State(pipeline): State<SharedPipeline>,
    body: Bytes,
) -> std::result::Result<Json<ComparisonResult>, ApiError> {
    let dataset = match dataset_from_body(&body, pipeline.registry()) {
        Ok(dataset) => dataset,
        Err(err) => {
            warn!(status = err.status.as_u16(), error = %err.body["error"], "Comparison request rejected");
            return Err(err);
        }
    };

    info!(dataset = %dataset, "Comparison request started");

    let worker = Arc::clone(&pipeline);
    let name = dataset.clone();
    let outcome = tokio::task::spawn_blocking(move || worker.run(&name)).await;

    match outcome {
        Ok(Ok(result)) => {
            info!(
                dataset = %dataset,
                winner = %result.winner,
                svm_accuracy = result.svm_metrics.accuracy,
                vqc_accuracy = result.vqc_metrics.accuracy,
                execution_time_seconds = result.execution_time_seconds,
                "Comparison request succeeded"
            );
            Ok(Json(result))
        }
        Ok(Err(err)) => {
            let api = ApiError::from_pipeline(&err);
            if api.status == StatusCode::BAD_REQUEST {
                warn!(dataset = %dataset, error = %err, "Comparison failed validation");
            } else {
                error!(dataset = %dataset, status = api.status.as_u16(), error = %err, "Comparison failed");
            }
            Err(api)
        }
        Err(join_err) => {
            error!(dataset = %dataset, error = %join_err, "Comparison worker panicked");
            Err(ApiError::internal(join_err))
        }
    }
}

/// Validate the request body and return the normalized, registered dataset id.
fn dataset_from_body(
    body: &[u8],
    registry: &DatasetRegistry,
) -> std::result::Result<String, ApiError> {
    let fields = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) if !fields.is_empty() => fields,
        _ => return Err(ApiError::no_json()),
    };

    let raw = match fields.get("dataset_name") {
        None | Some(Value::Null) => return Err(ApiError::missing_dataset(&registry.ids())),
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
    };

    let name = normalize_identifier(&raw);
    if !registry.contains(&name) {
        return Err(ApiError::invalid_dataset(&name, &registry.ids()));
    }
    Ok(name)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run(config: &AppConfig) -> Result<()> {
    let pipeline = Arc::new(ComparisonPipeline::new(config.pipeline.clone())?);
    let datasets = pipeline.registry().ids().join(", ");
    let app = router(pipeline, &config.server);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| CoreError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(
        addr = %addr,
        data_dir = %config.pipeline.data_dir.display(),
        datasets = %datasets,
        "QCaaS gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("QCaaS gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
