use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E2xxx: Profile errors
/// - E3xxx: Proposal / request / match errors
/// - E4xxx: Discover feed errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    RateLimited,
    ServiceUnavailable,
    BadRequest,

    // Profile (E2xxx)
    ProfileNotFound,

    // Proposal / request / match (E3xxx)
    ProposalNotFound,
    ProposalInactive,
    CannotRequestOwnProposal,
    AlreadyRequested,
    ProposalQuotaExceeded,
    SuperLikeQuotaExceeded,
    RequestNotFound,
    RequestAlreadyResolved,
    NotProposalOwner,
    MatchNotFound,
    NotMatchMember,

    // Discover (E4xxx)
    InvalidFeedFilter,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::RateLimited => "E0006",
            Self::ServiceUnavailable => "E0007",
            Self::BadRequest => "E0008",

            // Profile
            Self::ProfileNotFound => "E2001",

            // Proposal / request / match
            Self::ProposalNotFound => "E3001",
            Self::ProposalInactive => "E3002",
            Self::CannotRequestOwnProposal => "E3003",
            Self::AlreadyRequested => "E3004",
            Self::ProposalQuotaExceeded => "E3005",
            Self::SuperLikeQuotaExceeded => "E3006",
            Self::RequestNotFound => "E3007",
            Self::RequestAlreadyResolved => "E3008",
            Self::NotProposalOwner => "E3009",
            Self::MatchNotFound => "E3010",
            Self::NotMatchMember => "E3011",

            // Discover
            Self::InvalidFeedFilter => "E4001",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::ServiceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::InvalidFeedFilter => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound | Self::ProfileNotFound | Self::ProposalNotFound
            | Self::RequestNotFound | Self::MatchNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::CannotRequestOwnProposal | Self::NotProposalOwner
            | Self::NotMatchMember => StatusCode::FORBIDDEN,
            Self::RateLimited | Self::ProposalQuotaExceeded | Self::SuperLikeQuotaExceeded => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Self::AlreadyRequested | Self::RequestAlreadyResolved => StatusCode::CONFLICT,
            Self::ProposalInactive => StatusCode::GONE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// True when the underlying database error is a unique-constraint
    /// violation. Idempotent write paths treat this as "already done".
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known {
                code,
                message,
                details,
            } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ApiErrorResponse::new("E0002", msg))
            }
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_codes_map_to_429() {
        assert_eq!(
            ErrorCode::ProposalQuotaExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::SuperLikeQuotaExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn duplicate_request_is_conflict() {
        assert_eq!(ErrorCode::AlreadyRequested.code(), "E3004");
        assert_eq!(
            ErrorCode::AlreadyRequested.status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn unique_violation_detection() {
        let err = AppError::Database(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_string()),
        ));
        assert!(err.is_unique_violation());

        let err = AppError::Database(diesel::result::Error::NotFound);
        assert!(!err.is_unique_violation());
    }
}
