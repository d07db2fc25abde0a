//! Access Error Types
//!
//! Failures of the identity pipeline and its collaborators. Store failures
//! never reach a role gate: the resolver absorbs them into a fallback user.
//! A denied gate is a decision, not an error, and has no variant here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AccessResult<T> = Result<T, AccessError>;

#[derive(Debug, Error)]
pub enum AccessError {
    /// Identity provider call failed (sign-in or sign-out)
    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Profile lookup failed
    #[error("Profile store read failed: {0}")]
    StoreReadFailure(String),

    /// Profile upsert failed
    #[error("Profile store write failed: {0}")]
    StoreWriteFailure(String),

    /// Session did not settle within the configured wait
    #[error("Session is still being resolved")]
    ResolutionPending,

    /// Session context was shut down
    #[error("Session context is closed")]
    ContextClosed,

    /// Identity callback signature missing or wrong
    #[error("Identity callback signature is missing or invalid")]
    InvalidSignature,

    /// Identity callback body could not be parsed
    #[error("Invalid identity callback: {0}")]
    InvalidCallback(String),

    /// A roster row could not be imported
    #[error("Invalid roster entry: {0}")]
    InvalidRoster(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccessError {
    /// True for failures talking to the profile store
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            AccessError::StoreReadFailure(_) | AccessError::StoreWriteFailure(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::ProviderUnavailable(_)
            | AccessError::StoreReadFailure(_)
            | AccessError::StoreWriteFailure(_)
            | AccessError::ResolutionPending
            | AccessError::ContextClosed => ErrorKind::ServiceUnavailable,
            AccessError::InvalidSignature => ErrorKind::Unauthorized,
            AccessError::InvalidCallback(_) => ErrorKind::BadRequest,
            AccessError::InvalidRoster(_) => ErrorKind::UnprocessableEntity,
            AccessError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AccessError::ProviderUnavailable(_) => err.with_action("Try signing in again"),
            AccessError::ResolutionPending => err.with_action("Retry in a moment"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            AccessError::StoreReadFailure(msg) | AccessError::StoreWriteFailure(msg) => {
                tracing::error!(error = %msg, "Profile store error");
            }
            AccessError::ProviderUnavailable(msg) => {
                tracing::warn!(error = %msg, "Identity provider error");
            }
            AccessError::InvalidSignature => {
                tracing::warn!("Rejected unsigned identity callback");
            }
            AccessError::Internal(msg) => {
                tracing::error!(message = %msg, "Access internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Access error");
            }
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
