//! Validated JSON extractor for automatic request validation.
//!
//! Deserializes the body and validates it with the `validator` crate. Both
//! malformed JSON and validation failures are returned as error envelopes;
//! validation failures carry one `{field, message}` entry per violation.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use mercato_core::{validation_errors_to_mercato_error, MercatoError};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that validates the deserialized value.
///
/// # Example
///
/// ```ignore
/// use mercato_rest::extractors::ValidatedJson;
///
/// async fn update(ValidatedJson(request): ValidatedJson<UpdateListingRequest>) {
///     // request is valid here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError(MercatoError::Http {
                status: rejection.status().as_u16(),
                payload: serde_json::Value::String(rejection.body_text()),
            })
        })?;

        value
            .validate()
            .map_err(|errors| AppError(validation_errors_to_mercato_error(&errors)))?;

        Ok(ValidatedJson(value))
    }
}
