// querygraft core contracts
// Cache-key derivation, error normalization and throw-policy evaluation
// shared by the descriptor factories in querygraft-client.

pub mod config;
pub mod error;
pub mod key;
pub mod method;
pub mod policy;
pub mod reply;

pub use config::QueryConfig;
pub use error::{ErrorContext, FetchError};
pub use key::{build_query_key, KeyPrefix, KeySegment, QueryKey};
pub use method::Method;
pub use policy::{CallContext, ThrowPolicy};
pub use reply::{settle_reply, CallError, CallReply, ReplyBody};

use async_trait::async_trait;
use serde_json::Value;

/// Terminal callable of a remote-call client tree.
///
/// The implementation owns URL building, serialization and transport;
/// this crate only shapes descriptors around it. `input` is the request
/// payload for read calls and the variables for write calls; `options`
/// carries call-time overrides forwarded by the mutation path. Failures
/// are reported in-band through the reply's error channel.
#[async_trait]
pub trait Endpoint: Send + Sync + std::fmt::Debug {
    async fn call(&self, input: Option<Value>, options: Option<Value>) -> CallReply;
}

// In-memory endpoint for testing
#[cfg(test)]
#[derive(Debug)]
pub struct MockEndpoint {
    reply: CallReply,
}

#[cfg(test)]
impl MockEndpoint {
    pub fn new(reply: CallReply) -> Self {
        Self { reply }
    }
}

#[cfg(test)]
#[async_trait]
impl Endpoint for MockEndpoint {
    async fn call(&self, _input: Option<Value>, _options: Option<Value>) -> CallReply {
        self.reply.clone()
    }
}
