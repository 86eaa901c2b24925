use allocation::AllocationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Allocation(AllocationError::UnknownInvestor(name)) => (
                StatusCode::NOT_FOUND,
                format!("no investor named '{name}' in the pool"),
            ),
            AppError::Allocation(err) => {
                tracing::error!(error = ?err, "Snapshot rejected by the allocation engine.");
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
