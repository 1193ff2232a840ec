use crate::key::QueryKey;
use crate::method::Method;
use http::StatusCode;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Everything the throw policy may inspect for one failed call.
/// Built fresh per invocation and discarded with it.
#[derive(Debug, Clone, PartialEq)]
pub struct CallContext {
    pub key: QueryKey,
    pub status: StatusCode,
    pub method: Method,
    pub path: Vec<String>,
    pub input: Option<Value>,
}

type StatusPredicate = dyn Fn(&QueryKey, StatusCode) -> bool + Send + Sync;
type ContextPredicate = dyn Fn(&CallContext) -> bool + Send + Sync;

/// Decides whether a failed call is surfaced as an error or folded
/// into a null result.
///
/// The two predicate forms cover both ergonomic call styles: a short
/// key-and-status check, or full access to the call context. The form
/// is chosen at configuration time.
#[derive(Clone)]
pub enum ThrowPolicy {
    Always(bool),
    ByStatus(Arc<StatusPredicate>),
    ByContext(Arc<ContextPredicate>),
}

impl ThrowPolicy {
    pub fn by_status(
        predicate: impl Fn(&QueryKey, StatusCode) -> bool + Send + Sync + 'static,
    ) -> Self {
        ThrowPolicy::ByStatus(Arc::new(predicate))
    }

    pub fn by_context(predicate: impl Fn(&CallContext) -> bool + Send + Sync + 'static) -> Self {
        ThrowPolicy::ByContext(Arc::new(predicate))
    }

    /// Evaluates the policy for one failed call.
    pub fn should_throw(&self, context: &CallContext) -> bool {
        match self {
            ThrowPolicy::Always(throw) => *throw,
            ThrowPolicy::ByStatus(predicate) => predicate(&context.key, context.status),
            ThrowPolicy::ByContext(predicate) => predicate(context),
        }
    }
}

/// Errors are thrown unless the configuration says otherwise.
impl Default for ThrowPolicy {
    fn default() -> Self {
        ThrowPolicy::Always(true)
    }
}

impl From<bool> for ThrowPolicy {
    fn from(throw: bool) -> Self {
        ThrowPolicy::Always(throw)
    }
}

impl fmt::Debug for ThrowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThrowPolicy::Always(throw) => f.debug_tuple("Always").field(throw).finish(),
            ThrowPolicy::ByStatus(_) => f.write_str("ByStatus(..)"),
            ThrowPolicy::ByContext(_) => f.write_str("ByContext(..)"),
        }
    }
}
