use querygraft_core::{
    build_query_key, settle_reply, CallReply, Endpoint, FetchError, Method, QueryConfig, QueryKey,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Caller-supplied options carried into a mutation descriptor. The
/// derived key and dispatch function are always computed here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationOptions {
    /// Call-time overrides forwarded to the endpoint on every dispatch.
    pub call_options: Option<Value>,
    pub retry: Option<u32>,
    pub gc_time: Option<Duration>,
    pub meta: Option<Value>,
}

/// Deferred dispatch for one mutation descriptor. Variables differ per
/// invocation, so they are supplied at dispatch time rather than
/// captured here.
#[derive(Debug, Clone)]
pub struct MutationFn {
    endpoint: Arc<dyn Endpoint>,
    key: QueryKey,
    method: Method,
    path: Vec<String>,
    call_options: Option<Value>,
    config: Arc<QueryConfig>,
}

impl MutationFn {
    /// Runs the wrapped call with the given variables, applying the
    /// same success/failure handling as the query path.
    pub async fn dispatch(&self, variables: Value) -> Result<Value, FetchError> {
        let reply = self
            .endpoint
            .call(Some(variables.clone()), self.call_options.clone())
            .await;
        settle_reply(
            reply,
            self.key.clone(),
            self.method,
            &self.path,
            Some(variables),
            &self.config,
        )
    }
}

/// Cache-layer descriptor for one write call. The key is derived from
/// path and method only — variables differ per invocation and never
/// enter the key. The call-time override from [`MutationOptions`] is
/// consumed during construction and never appears here.
#[derive(Debug, Clone)]
pub struct MutationDescriptor {
    pub mutation_key: QueryKey,
    pub mutation_fn: MutationFn,
    pub retry: Option<u32>,
    pub gc_time: Option<Duration>,
    pub meta: Option<Value>,
}

/// Write-method leaf with cache helpers attached. The original call
/// stays reachable, and behaves exactly as it did before extension.
#[derive(Debug, Clone)]
pub struct MutationEndpoint {
    endpoint: Arc<dyn Endpoint>,
    path: Vec<String>,
    method: Method,
    config: Arc<QueryConfig>,
}

impl MutationEndpoint {
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
    pub async fn call(&self, variables: Option<Value>, options: Option<Value>) -> CallReply {
        self.endpoint.call(variables, options).await
    }

    /// Builds the full descriptor for the cache layer.
    pub fn mutation_options(&self, options: MutationOptions) -> MutationDescriptor {
        let MutationOptions {
            call_options,
            retry,
            gc_time,
            meta,
        } = options;
        let mutation_key = build_query_key(
            &self.path,
            None,
            self.method,
            self.config.query_key_prefix.as_ref(),
        );
        MutationDescriptor {
            mutation_key: mutation_key.clone(),
            mutation_fn: MutationFn {
                endpoint: self.endpoint.clone(),
                key: mutation_key,
                method: self.method,
                path: self.path.clone(),
                call_options,
                config: self.config.clone(),
            },
            retry,
            gc_time,
            meta,
        }
    }
}
