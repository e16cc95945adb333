use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Empty series, or a series whose wind column holds no valid value.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("unknown turbine '{0}'")]
    UnknownTurbine(String),

    #[error("invalid power curve for '{turbine}': {reason}")]
    InvalidPowerCurve { turbine: String, reason: String },

    #[error("column '{column}' has {actual} values, expected {expected}")]
    MismatchedSeries {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameters { name: &'static str, reason: String },

    #[error("weather archive request failed: {0}")]
    WeatherFetch(#[from] reqwest::Error),

    #[error("weather archive error: {0}")]
    WeatherUpstream(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::UnknownTurbine(_) => StatusCode::NOT_FOUND,
            AnalysisError::InvalidPowerCurve { .. }
            | AnalysisError::MismatchedSeries { .. }
            | AnalysisError::InvalidParameters { .. } => StatusCode::BAD_REQUEST,
            AnalysisError::WeatherFetch(_) | AnalysisError::WeatherUpstream(_) => {
                StatusCode::BAD_GATEWAY
            }
            AnalysisError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "analysis request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AnalysisError::InsufficientData("empty".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AnalysisError::UnknownTurbine("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AnalysisError::MismatchedSeries { column: "time", expected: 2, actual: 1 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalysisError::WeatherUpstream("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = AnalysisError::MismatchedSeries {
            column: "surface_pressure",
            expected: 24,
            actual: 23,
        };
        assert_eq!(err.to_string(), "column 'surface_pressure' has 23 values, expected 24");
    }
}
