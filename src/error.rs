use crate::assessments::transform::TransformError;
use crate::config::ConfigError;
use crate::predictor::PredictorError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    InvalidInput(serde_json::Error),
    Validation(BTreeMap<&'static str, String>),
    Transform(TransformError),
    Predictor(PredictorError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(err) => write!(f, "server error: {err}"),
            AppError::InvalidInput(err) => write!(f, "invalid raw record JSON: {err}"),
            AppError::Validation(errors) => {
                write!(f, "validation failed for {} field(s)", errors.len())
            }
            AppError::Transform(err) => write!(f, "transform error: {err}"),
            AppError::Predictor(err) => write!(f, "prediction error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::InvalidInput(err) => Some(err),
            AppError::Validation(_) => None,
            AppError::Transform(err) => Some(err),
            AppError::Predictor(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // User-recoverable: every violated field at once, so the
            // client can highlight them all.
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            // User-recoverable: the raw record stays with the client,
            // a retry needs no re-entry.
            AppError::Predictor(err) => {
                error!("prediction call failed: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "error": "The prediction service is unavailable. Please try again."
                    })),
                )
                    .into_response()
            }
            AppError::InvalidInput(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response(),
            // Everything else signals a code/config defect; log the
            // detail, answer with a generic failure.
            other => {
                error!("internal failure: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<TransformError> for AppError {
    fn from(value: TransformError) -> Self {
        Self::Transform(value)
    }
}

impl From<PredictorError> for AppError {
    fn from(value: PredictorError) -> Self {
        Self::Predictor(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_answer_unprocessable_entity() {
        let mut errors = BTreeMap::new();
        errors.insert("sex", "Sex is required.".to_string());
        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn upstream_failures_answer_bad_gateway() {
        let err = AppError::Predictor(PredictorError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn coercion_drift_answers_internal_server_error() {
        let err = AppError::Transform(TransformError::Numeric {
            field: "maxHR",
            value: "fast".to_string(),
        });
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
