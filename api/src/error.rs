use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::{chapter::comment::store::StoreError, identity::AuthenticationError};

// Every failure here is something the client can fix, the message is shown as is
#[derive(Debug)]
pub struct Error {
    code: &'static str,
    msg: String,
    status: StatusCode,
}

#[derive(Serialize)]
struct ErrorResponse {
    code: String,
    msg: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let error_response = ErrorResponse {
            code: self.code.into(),
            msg: self.msg,
        };

        (self.status, Json(error_response)).into_response()
    }
}

fn code_for(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
        StatusCode::FORBIDDEN => "FORBIDDEN",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::CONFLICT => "CONFLICT",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
        _ => "ERR",
    }
}

impl From<(&'static str, StatusCode)> for Error {
    fn from((msg, status): (&'static str, StatusCode)) -> Self {
        (msg.to_string(), status).into()
    }
}

impl From<(String, StatusCode)> for Error {
    fn from((msg, status): (String, StatusCode)) -> Self {
        Error {
            code: code_for(status),
            msg,
            status,
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        let status = match e {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::ParentNotFound(_)
            | StoreError::ParentInOtherChapter(_)
            | StoreError::ParentDeleted(_)
            | StoreError::TooDeep => StatusCode::BAD_REQUEST,
            StoreError::NotOwner => StatusCode::FORBIDDEN,
            StoreError::Deleted(_) => StatusCode::CONFLICT,
        };
        (e.to_string(), status).into()
    }
}

impl From<AuthenticationError> for Error {
    fn from(e: AuthenticationError) -> Self {
        let status = match e {
            AuthenticationError::NoIdentity => StatusCode::UNAUTHORIZED,
            AuthenticationError::InvalidHeader(_) => StatusCode::BAD_REQUEST,
        };
        (e.to_string(), status).into()
    }
}
