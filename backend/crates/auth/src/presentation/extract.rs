//! Request Extractors

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::domain::value_object::identity::Identity;
use crate::error::AuthError;

/// JSON body whose rejection is reported as a `Validation` error
///
/// Malformed JSON, a wrong content type or a missing field never reaches
/// the use case.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AuthError::Validation(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Identity placed in the request extensions by `require_bearer`
#[derive(Debug, Clone, Copy)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(Self)
            .ok_or(AuthError::MissingCredential)
    }
}
