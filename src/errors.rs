use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::SchedulingError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Scheduling(SchedulingError::BookingNotFound)
            | AppError::Scheduling(SchedulingError::ServiceNotFound) => StatusCode::NOT_FOUND,
            AppError::Scheduling(SchedulingError::BarberNotAvailable) => StatusCode::CONFLICT,
            AppError::Scheduling(SchedulingError::InvalidTimeSlot) => StatusCode::BAD_REQUEST,
            AppError::Scheduling(SchedulingError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_scheduling_errors_map_to_statuses() {
        assert_eq!(status_of(SchedulingError::BookingNotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status_of(SchedulingError::ServiceNotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status_of(SchedulingError::BarberNotAvailable.into()), StatusCode::CONFLICT);
        assert_eq!(status_of(SchedulingError::InvalidTimeSlot.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(SchedulingError::Storage(anyhow::anyhow!("disk full")).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_request_errors() {
        assert_eq!(status_of(AppError::BadRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::Database(anyhow::anyhow!("locked"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
