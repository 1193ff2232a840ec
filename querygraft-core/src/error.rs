use crate::key::QueryKey;
use crate::method::Method;
use crate::reply::CallError;
use http::{HeaderMap, StatusCode};
use serde_json::Value;
use thiserror::Error;

/// Context of the call that produced an error, attached after
/// normalization. Every error surfaced by this crate carries it; a raw
/// wire-layer failure is never exposed un-annotated.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    pub key: QueryKey,
    pub method: Method,
    pub path: Vec<String>,
    pub input: Option<Value>,
    pub response: Option<Value>,
    pub headers: HeaderMap,
}

/// Normalized call failure: response status plus the raw error body as
/// decoded from the wire.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("request failed with status {status}: {value}")]
pub struct FetchError {
    pub status: StatusCode,
    pub value: Value,
    pub context: Option<ErrorContext>,
}

impl FetchError {
    pub fn new(status: StatusCode, value: Value) -> Self {
        FetchError {
            status,
            value,
            context: None,
        }
    }

    /// Collapses an arbitrary failure body into a `FetchError`.
    ///
    /// Already-normalized errors pass through unchanged. A structured
    /// body exposing a `"value"` member contributes that member;
    /// anything else is wrapped whole. Context attachment is a separate
    /// step so the same normalization serves read and write paths.
    pub fn normalize(error: CallError, status: StatusCode) -> FetchError {
        match error {
            CallError::Fetch(err) => err,
            CallError::Raw(mut raw) => {
                let extracted = raw.as_object_mut().and_then(|body| body.remove("value"));
                FetchError::new(status, extracted.unwrap_or(raw))
            }
        }
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }
}
