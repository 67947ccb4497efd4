//! Body extractors with the bridge's "no data" semantics.
//!
//! Clients routinely post an empty object or `null` when they mean "nothing";
//! those are rejected as missing rather than deserialized into defaults.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{ApiError, CommandError};

/// JSON body that must carry at least one field.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

/// JSON body where an absent or empty body means `T::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalJsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| CommandError::InvalidPayload(e.body_text()))?;

        let value = parse_body(&bytes)?.ok_or(CommandError::MissingBody)?;

        decode(value).map(JsonBody)
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for OptionalJsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| CommandError::InvalidPayload(e.body_text()))?;

        match parse_body(&bytes)? {
            Some(value) => decode(value).map(OptionalJsonBody),
            None => Ok(OptionalJsonBody(T::default())),
        }
    }
}

/// `None` for an empty body, `null` or `{}`.
fn parse_body(bytes: &[u8]) -> Result<Option<Value>, CommandError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| CommandError::InvalidPayload(e.to_string()))?;

    match &value {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        _ => Ok(Some(value)),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| CommandError::InvalidPayload(e.to_string()).into())
}
