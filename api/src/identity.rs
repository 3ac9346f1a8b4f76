use axum::http::{HeaderMap, request::Parts};

use crate::error::Error;

// Set by the authenticating gateway in front of this service
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_IMAGE_HEADER: &str = "x-user-image";

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AuthenticationError {
    #[error("Authentication required, but no `{USER_ID_HEADER}` header found.")]
    NoIdentity,

    #[error("Invalid identity header `{0}`")]
    InvalidHeader(&'static str),
}

fn header<'a>(
    headers: &'a HeaderMap,
    key: &'static str,
) -> Result<Option<&'a str>, AuthenticationError> {
    match headers.get(key) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|v| Some(v.trim()).filter(|v| !v.is_empty()))
            .map_err(|_| AuthenticationError::InvalidHeader(key)),
    }
}

impl Identity {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AuthenticationError> {
        let id = header(headers, USER_ID_HEADER)?
            .ok_or(AuthenticationError::NoIdentity)?
            .parse::<i32>()
            .map_err(|_| AuthenticationError::InvalidHeader(USER_ID_HEADER))?;

        let name = header(headers, USER_NAME_HEADER)?
            .ok_or(AuthenticationError::InvalidHeader(USER_NAME_HEADER))?
            .to_string();

        let image = header(headers, USER_IMAGE_HEADER)?.map(str::to_string);

        Ok(Identity { id, name, image })
    }
}

pub struct MaybeAuthUser(pub Result<Identity, AuthenticationError>);

impl<S> axum::extract::FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(Identity::from_headers(&parts.headers)))
    }
}

pub struct AuthUser(pub Identity);

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(auth_user) = MaybeAuthUser::from_request_parts(parts, state).await?;

        match auth_user {
            Ok(identity) => Ok(AuthUser(identity)),
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting unauthenticated request");
                Err(e.into())
            }
        }
    }
}
