//! Request body extraction for the user endpoints.
//!
//! Bodies may arrive as JSON or as a url-encoded form. A body with another
//! content type, an empty body and a JSON `null` all count as "no body";
//! handlers decide whether that is an error.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use models::user::{body_fields, Fields};
use serde_json::Value;

use crate::errors::ApiError;

/// Loosely typed request body.
#[derive(Debug, Default)]
pub struct Payload(pub Option<Fields>);

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            "application/json" => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self(None));
                }
                let value: Value = serde_json::from_slice(&bytes)
                    .map_err(|e| ApiError::bad_request(format!("Malformed JSON body: {e}")))?;
                let fields = body_fields(value).map_err(|e| ApiError::bad_request(e.to_string()))?;
                Ok(Self(fields))
            }
            "application/x-www-form-urlencoded" => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                if pairs.is_empty() {
                    return Ok(Self(None));
                }
                let fields = pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
                Ok(Self(Some(fields)))
            }
            _ => Ok(Self(None)),
        }
    }
}
