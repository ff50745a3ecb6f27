//! Raw JSON body whose parse failures are reported as validation errors.

use crate::error::{AppError, ValidationErrors};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;

/// Request body parsed as untyped JSON. Unlike `axum::Json` it does not require a
/// `Content-Type` header, and malformed JSON becomes a 400 validation error.
#[derive(Clone, Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Validation(ValidationErrors::single("", format!("malformed JSON: {}", e)))
        })?;
        Ok(JsonBody(value))
    }
}
