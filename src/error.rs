use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Result type for room operations
pub type GameResult<T> = Result<T, GameError>;

/// Request-local failures. None of these are fatal to the process and
/// none of them leave a partially mutated room behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid phase: {0}")]
    InvalidPhase(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GameError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            GameError::NotFound(_) => "NOT_FOUND",
            GameError::Forbidden(_) => "FORBIDDEN",
            GameError::InvalidPhase(_) => "INVALID_PHASE",
            GameError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::Forbidden(_) => StatusCode::FORBIDDEN,
            GameError::InvalidPhase(_) => StatusCode::CONFLICT,
            GameError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn msg(&self) -> &str {
        match self {
            GameError::NotFound(m)
            | GameError::Forbidden(m)
            | GameError::InvalidPhase(m)
            | GameError::InvalidInput(m) => m,
        }
    }
}

/// Error body sent to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub msg: String,
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code().to_string(),
            msg: self.msg().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for GameError {
    fn from(rejection: JsonRejection) -> Self {
        GameError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for GameError {
    fn from(rejection: QueryRejection) -> Self {
        GameError::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GameError::NotFound("room".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GameError::Forbidden("host".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            GameError::InvalidPhase("voting".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            GameError::InvalidInput("name".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_display_includes_message() {
        let err = GameError::InvalidInput("You cannot vote for yourself".into());
        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(
            err.to_string(),
            "Invalid input: You cannot vote for yourself"
        );
    }
}
