use crate::config::QueryConfig;
use crate::error::{ErrorContext, FetchError};
use crate::key::QueryKey;
use crate::method::Method;
use crate::policy::CallContext;
use http::{HeaderMap, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Failure channel of a reply. Transports usually hand back the raw
/// decoded error body; an already-normalized error passes through
/// normalization untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    Raw(Value),
    Fetch(FetchError),
}

/// Body of a completed call: exactly one of data or error.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    Data(Value),
    Error(CallError),
}

/// Uniform result shape owed by the remote-call collaborator.
///
/// Consumed, never produced, by this crate. Network-level failures are
/// carried in-band through the error channel, so cancellation and
/// transport errors reach the settle step like any other failure.
#[derive(Debug, Clone)]
pub struct CallReply {
    pub body: ReplyBody,
    pub status: StatusCode,
    /// Raw response representation, at the transport's discretion.
    pub response: Option<Value>,
    pub headers: HeaderMap,
}

impl CallReply {
    pub fn ok(data: Value, status: StatusCode) -> Self {
        CallReply {
            body: ReplyBody::Data(data),
            status,
            response: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn err(error: Value, status: StatusCode) -> Self {
        CallReply {
            body: ReplyBody::Error(CallError::Raw(error)),
            status,
            response: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn data(&self) -> Option<&Value> {
        match &self.body {
            ReplyBody::Data(data) => Some(data),
            ReplyBody::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CallError> {
        match &self.body {
            ReplyBody::Data(_) => None,
            ReplyBody::Error(error) => Some(error),
        }
    }
}

/// Applies the uniform success/failure handling shared by the query and
/// mutation descriptor factories.
///
/// Data passes through unchanged. A failure is normalized and annotated
/// with the full call context unconditionally, then either returned as
/// the error or, when the throw policy suppresses it, folded into
/// `Value::Null` and discarded.
pub fn settle_reply(
    reply: CallReply,
    key: QueryKey,
    method: Method,
    path: &[String],
    input: Option<Value>,
    config: &QueryConfig,
) -> Result<Value, FetchError> {
    match reply.body {
        ReplyBody::Data(data) => Ok(data),
        ReplyBody::Error(error) => {
            let normalized =
                FetchError::normalize(error, reply.status).with_context(ErrorContext {
                    key: key.clone(),
                    method,
                    path: path.to_vec(),
                    input: input.clone(),
                    response: reply.response,
                    headers: reply.headers,
                });
            let context = CallContext {
                key,
                status: reply.status,
                method,
                path: path.to_vec(),
                input,
            };
            if config.throw_on_error.should_throw(&context) {
                Err(normalized)
            } else {
                debug!(status = %reply.status, method = %method, "call failed, folded to null by throw policy");
                Ok(Value::Null)
            }
        }
    }
}
