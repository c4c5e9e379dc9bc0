use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already in use")]
    EmailInUse,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidCurrentPassword => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::AccountDisabled
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::EmailInUse => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        // Storage and other internal failures are logged but never leak
        // their detail to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource"),
            other => AppError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_unauthorized() {
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::AccountDisabled.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Unauthorized("missing token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn conflict_and_client_errors() {
        assert_eq!(AppError::EmailInUse.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCurrentPassword.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Validation("Invalid email".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("Note").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_email_and_wrong_password_are_indistinguishable() {
        // Both cases must surface the exact same error to the caller.
        let a = AppError::InvalidCredentials;
        let b = AppError::InvalidCredentials;
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.status(), b.status());
    }

    #[test]
    fn row_not_found_translates_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
