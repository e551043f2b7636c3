//! Query string extractor with envelope-shaped rejections.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use mercato_core::MercatoError;
use serde::de::DeserializeOwned;

/// Like [`Query`], but a malformed query string becomes an error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError(MercatoError::Http {
                    status: rejection.status().as_u16(),
                    payload: serde_json::Value::String(rejection.body_text()),
                })
            })?;
        Ok(Self(value))
    }
}
