use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cinema_account::{AccountError, FieldError, PictureError, ProfileError};
use cinema_catalog::SeatError;
use cinema_core::payment::PaymentError;
use cinema_core::CoreError;
use cinema_order::{BookingError, CheckoutError};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    FieldErrors(Vec<FieldError>),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, fields) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            AppError::FieldErrors(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Please correct the highlighted fields".to_string(),
                fields,
            ),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    Vec::new(),
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "fields": fields,
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::InternalServerError(err.to_string())
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<SeatError> for AppError {
    fn from(err: SeatError) -> Self {
        match err {
            SeatError::Taken(_) => Self::ConflictError(err.to_string()),
            _ => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<PictureError> for AppError {
    fn from(err: PictureError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Payment(e) => e.into(),
            CheckoutError::MissingSeats => Self::ValidationError(err.to_string()),
            CheckoutError::Storage(e) => e.into(),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Invalid(fields) => Self::FieldErrors(fields),
            AccountError::Storage(e) => e.into(),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Picture(e) => e.into(),
            ProfileError::Storage(e) => e.into(),
            other => Self::ValidationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinema_core::StoreError;

    #[test]
    fn test_storage_failure_is_internal_error() {
        let err: AppError = CoreError::from(StoreError::Serialization("bad json".into())).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_taken_seat_is_conflict() {
        let err: AppError = SeatError::Taken("C5".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
