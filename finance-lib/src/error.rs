use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use finance_repo::transaction_repo::TransactionRepoError;
use finance_repo::user_repo::UserRepoError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Unexpected server error. Please try again later.";

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<UserRepoError> for HandlerError {
    fn from(e: UserRepoError) -> Self {
        match e {
            UserRepoError::UserNotFound(_) => HandlerError::NotFound("User not found".to_string()),
            // a failed lookup by email only happens during login
            UserRepoError::EmailNotFound(_) => HandlerError::InvalidCredentials,
            UserRepoError::UserAlreadyExists(_) => {
                HandlerError::Conflict("Email already registered.".to_string())
            }
            UserRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<TransactionRepoError> for HandlerError {
    fn from(e: TransactionRepoError) -> Self {
        match e {
            TransactionRepoError::TransactionNotFound(_) => {
                HandlerError::NotFound("Transaction not found".to_string())
            }
            TransactionRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Validation(_) | HandlerError::Conflict(_) => StatusCode::BAD_REQUEST,
            HandlerError::Unauthenticated | HandlerError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let message = match self {
            HandlerError::Internal(e) => {
                error!(error = ?e, "internal error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use anyhow::anyhow;

    fn body_of(error: HandlerError) -> (StatusCode, serde_json::Value) {
        let response = error.error_response();
        let status = response.status();
        let bytes = response.into_body().try_into_bytes().unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn internal_detail_not_exposed() {
        let (status, body) = body_of(HandlerError::Internal(anyhow!(
            "relation \"users\" does not exist"
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn duplicate_email_is_bad_request() {
        let error: HandlerError = UserRepoError::UserAlreadyExists("a@b.c".to_string()).into();
        let (status, body) = body_of(error);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email already registered.");
    }

    #[test]
    fn missing_transaction_is_not_found() {
        let error: HandlerError = TransactionRepoError::TransactionNotFound(3).into();
        let (status, body) = body_of(error);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Transaction not found");
    }

    #[test]
    fn unknown_email_is_invalid_credentials() {
        let error: HandlerError = UserRepoError::EmailNotFound("a@b.c".to_string()).into();
        let (status, body) = body_of(error);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], INVALID_CREDENTIALS_MESSAGE);
    }
}
