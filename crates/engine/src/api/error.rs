//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": code, "message": text}`.
//! Internal errors are logged here and never returned verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lifesys_shared::ErrorBody;

use crate::infrastructure::ports::RepoError;
use crate::use_cases::{AuthError, BodyError, FinanceError, QuestError, StatsError};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let message = match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg,
        };
        let body = ErrorBody {
            error: code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AuthError::EmailTaken => ApiError::Conflict(e.to_string()),
            AuthError::InvalidCredentials | AuthError::Unauthenticated => {
                ApiError::Unauthorized(e.to_string())
            }
            AuthError::Security(_) | AuthError::Repo(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<QuestError> for ApiError {
    fn from(e: QuestError) -> Self {
        match e {
            QuestError::NotFound => ApiError::NotFound(e.to_string()),
            QuestError::AlreadyCompleted | QuestError::InvalidState(_) => {
                ApiError::Conflict(e.to_string())
            }
            QuestError::InvalidInput(msg) => ApiError::BadRequest(msg),
            QuestError::StatsMissing | QuestError::Domain(_) | QuestError::Repo(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<StatsError> for ApiError {
    fn from(e: StatsError) -> Self {
        match e {
            StatsError::NotFound => ApiError::NotFound(e.to_string()),
            StatsError::Conflict => ApiError::Conflict(e.to_string()),
            StatsError::Repo(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<FinanceError> for ApiError {
    fn from(e: FinanceError) -> Self {
        match e {
            FinanceError::CategoryNotFound => ApiError::NotFound(e.to_string()),
            FinanceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            FinanceError::Repo(RepoError::ConstraintViolation(msg)) => ApiError::BadRequest(msg),
            FinanceError::Repo(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<BodyError> for ApiError {
    fn from(e: BodyError) -> Self {
        match e {
            BodyError::InvalidInput(msg) => ApiError::BadRequest(msg),
            BodyError::Repo(_) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quest_conflicts_map_to_409() {
        let (status, code) = ApiError::from(QuestError::AlreadyCompleted).parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "conflict");
    }

    #[test]
    fn auth_failures_map_to_401_and_taken_email_to_409() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials).parts().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::EmailTaken).parts().0,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn internal_details_are_not_returned() {
        let response =
            ApiError::from(RepoError::database("quests.get", "disk I/O error")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
