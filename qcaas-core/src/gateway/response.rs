//! JSON error bodies and their status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use qcaas_ml::{ErrorClass, MlError};
use serde_json::{Value, json};

/// A failed request: status plus the JSON body sent to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    pub fn no_json() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": "No JSON data provided in request body" }),
        }
    }

    pub fn missing_dataset(valid: &[String]) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({
                "error": "Missing required field: dataset_name",
                "valid_datasets": valid,
            }),
        }
    }

    pub fn invalid_dataset(name: &str, valid: &[String]) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({
                "error": format!("Invalid dataset_name: \"{name}\""),
                "message": "Please select a valid dataset",
                "valid_datasets": valid,
            }),
        }
    }

    pub fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({
                "error": error.to_string(),
                "message": "An unexpected error occurred during comparison",
            }),
        }
    }

    /// Map a pipeline failure onto the status its class calls for.
    pub fn from_pipeline(err: &MlError) -> Self {
        match err.class() {
            ErrorClass::NotFound => Self {
                status: StatusCode::NOT_FOUND,
                body: json!({
                    "error": format!("Dataset file not found: {err}"),
                    "message": "Please ensure the CSV file exists in the /data directory on the server",
                }),
            },
            ErrorClass::BadInput => Self {
                status: StatusCode::BAD_REQUEST,
                body: json!({
                    "error": err.to_string(),
                    "message": "Data validation error occurred",
                }),
            },
            ErrorClass::Internal => Self::internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcaas_ml::{QuantumError, Stage};
    use std::path::PathBuf;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = MlError::SourceNotFound {
            path: PathBuf::from("data/heart.csv"),
        };
        let api = ApiError::from_pipeline(&err);
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        let message = api.body["error"].as_str().unwrap();
        assert!(message.starts_with("Dataset file not found: "));
        assert!(message.contains("heart.csv"));
    }

    #[test]
    fn test_validation_maps_to_400() {
        let api = ApiError::from_pipeline(&MlError::split("class 2 has a single member"));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.body["message"], "Data validation error occurred");
    }

    #[test]
    fn test_quantum_failure_maps_to_500() {
        let err = MlError::QuantumTraining {
            stage: Stage::Fallback,
            source: QuantumError::Execution("backend offline".into()),
        };
        let api = ApiError::from_pipeline(&err);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.body["error"].as_str().unwrap().contains("backend offline"));
        assert_eq!(
            api.body["message"],
            "An unexpected error occurred during comparison"
        );
    }

    #[test]
    fn test_invalid_dataset_body() {
        let valid = vec!["iris".to_string(), "heart".to_string()];
        let api = ApiError::invalid_dataset("mnist", &valid);
        assert_eq!(api.body["error"], "Invalid dataset_name: \"mnist\"");
        assert_eq!(api.body["valid_datasets"], json!(["iris", "heart"]));
    }
}
