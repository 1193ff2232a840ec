use querygraft_core::{
    build_query_key, settle_reply, CallReply, Endpoint, FetchError, Method, QueryConfig, QueryKey,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Caller-supplied options carried into a query descriptor. The derived
/// key and fetch function are always computed here; nothing the caller
/// sets can replace them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Partial input shallow-merged over the call input before the key
    /// is derived and the call is made.
    pub input_override: Option<Value>,
    pub enabled: Option<bool>,
    pub stale_time: Option<Duration>,
    pub gc_time: Option<Duration>,
    pub retry: Option<u32>,
    pub meta: Option<Value>,
}

/// Key-match filter for cache invalidation and lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryFilter {
    pub query_key: QueryKey,
    pub exact: bool,
}

/// Deferred fetch for one query descriptor.
///
/// Construction performs no I/O; the cache layer decides when to run
/// it, and may run it any number of times.
#[derive(Debug, Clone)]
pub struct QueryFn {
    endpoint: Arc<dyn Endpoint>,
    input: Option<Value>,
    key: QueryKey,
    method: Method,
    path: Vec<String>,
    config: Arc<QueryConfig>,
}

impl QueryFn {
    /// Runs the wrapped call. Success yields the data payload. A
    /// failure is normalized, annotated with the call context, then
    /// either returned as the error or folded into `Value::Null` when
    /// the throw policy suppresses it.
    pub async fn fetch(&self) -> Result<Value, FetchError> {
        let reply = self.endpoint.call(self.input.clone(), None).await;
        settle_reply(
            reply,
            self.key.clone(),
            self.method,
            &self.path,
            self.input.clone(),
            &self.config,
        )
    }
}

/// Cache-layer descriptor for one read call: the derived key, the
/// deferred fetch, and the caller options carried through. The input
/// override from [`QueryOptions`] is consumed during construction and
/// never appears here.
#[derive(Debug, Clone)]
pub struct QueryDescriptor {
    pub query_key: QueryKey,
    pub query_fn: QueryFn,
    pub enabled: Option<bool>,
    pub stale_time: Option<Duration>,
    pub gc_time: Option<Duration>,
    pub retry: Option<u32>,
    pub meta: Option<Value>,
}

/// Read-method leaf with cache helpers attached. The original call
/// stays reachable, and behaves exactly as it did before extension.
#[derive(Debug, Clone)]
pub struct QueryEndpoint {
    endpoint: Arc<dyn Endpoint>,
    path: Vec<String>,
    method: Method,
    config: Arc<QueryConfig>,
}

impl QueryEndpoint {
    pub(crate) fn new(
        endpoint: Arc<dyn Endpoint>,
        path: Vec<String>,
        method: Method,
        config: Arc<QueryConfig>,
    ) -> Self {
        Self {
            endpoint,
            path,
            method,
            config,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Calls through to the wrapped endpoint, unchanged.
    pub async fn call(&self, input: Option<Value>) -> CallReply {
        self.endpoint.call(input, None).await
    }

    /// Derived key for a call with this input, without building a full
    /// descriptor.
    pub fn query_key(&self, input: Option<&Value>) -> QueryKey {
        build_query_key(
            &self.path,
            input,
            self.method,
            self.config.query_key_prefix.as_ref(),
        )
    }

    /// Exact-match filter over the derived key.
    pub fn query_filter(&self, input: Option<&Value>) -> QueryFilter {
        QueryFilter {
            query_key: self.query_key(input),
            exact: true,
        }
    }

    /// Builds the full descriptor for the cache layer. The override
    /// from `options` is merged over `input` before the key is derived,
    /// so the key always matches what the fetch will send.
    pub fn query_options(&self, input: Option<Value>, options: QueryOptions) -> QueryDescriptor {
        let QueryOptions {
            input_override,
            enabled,
            stale_time,
            gc_time,
            retry,
            meta,
        } = options;
        let merged = merge_input(input, input_override);
        let query_key = build_query_key(
            &self.path,
            merged.as_ref(),
            self.method,
            self.config.query_key_prefix.as_ref(),
        );
        QueryDescriptor {
            query_key: query_key.clone(),
            query_fn: QueryFn {
                endpoint: self.endpoint.clone(),
                input: merged,
                key: query_key,
                method: self.method,
                path: self.path.clone(),
                config: self.config.clone(),
            },
            enabled,
            stale_time,
            gc_time,
            retry,
            meta,
        }
    }
}

/// Shallow-merges an override over the call input.
///
/// Object over object merges member-by-member with the override
/// winning. Both absent stays absent, keeping no-argument calls on a
/// stable key. A present override over anything that is not an object
/// replaces it wholesale.
fn merge_input(input: Option<Value>, over: Option<Value>) -> Option<Value> {
    match (input, over) {
        (input, None) => input,
        (Some(Value::Object(mut base)), Some(Value::Object(over))) => {
            for (name, value) in over {
                base.insert(name, value);
            }
            Some(Value::Object(base))
        }
        (_, over) => over,
    }
}
