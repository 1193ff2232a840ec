// Extending an in-memory user-directory client tree
// Demonstrates key derivation, descriptor construction and both
// throw-policy outcomes without any network transport.

use anyhow::{Context, Result};
use async_trait::async_trait;
use http::StatusCode;
use querygraft_client::{CacheClient, MutationOptions, QueryOptions, StaticRoutes};
use querygraft_core::{CallReply, Endpoint, QueryConfig, ThrowPolicy};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
struct ListUsers;

#[async_trait]
impl Endpoint for ListUsers {
    async fn call(&self, input: Option<Value>, _options: Option<Value>) -> CallReply {
        let page = input
            .as_ref()
            .and_then(|i| i.get("page"))
            .and_then(Value::as_u64)
            .unwrap_or(1);
        CallReply::ok(
            json!({"page": page, "users": ["alice", "bob"]}),
            StatusCode::OK,
        )
    }
}

#[derive(Debug)]
struct CreateUser;

#[async_trait]
impl Endpoint for CreateUser {
    async fn call(&self, input: Option<Value>, _options: Option<Value>) -> CallReply {
        match input.as_ref().and_then(|v| v.get("name")) {
            Some(name) if name != &json!("") => {
                CallReply::ok(json!({"userId": "u-1", "name": name}), StatusCode::CREATED)
            }
            _ => CallReply::err(
                json!({"status": 400, "value": "name must not be empty"}),
                StatusCode::BAD_REQUEST,
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("querygraft - user directory example");

    let routes = StaticRoutes::new().branch(
        "users",
        StaticRoutes::new()
            .endpoint("get", ListUsers)
            .endpoint("post", CreateUser),
    );
    let config = QueryConfig::new()
        .query_key_prefix("directory")
        .throw_on_error(ThrowPolicy::by_status(|_key, status| status.as_u16() >= 500));
    let client = CacheClient::new(Arc::new(routes), config);

    // Key derivation and filters for the read leaf.
    let node = client
        .at(&["users", "get"])
        .context("users.get is a known leaf")?;
    let users = node.as_query().context("get is a read method")?;

    let key = users.query_key(Some(&json!({"page": 2})));
    info!(key = %serde_json::to_string(&key)?, "derived query key");

    let filter = users.query_filter(None);
    info!(filter = %serde_json::to_string(&filter)?, "invalidation filter");

    // A full descriptor; the fetch only runs when the cache layer asks.
    let descriptor = users.query_options(
        Some(json!({"page": 1})),
        QueryOptions {
            input_override: Some(json!({"page": 2})),
            ..Default::default()
        },
    );
    let listing = descriptor.query_fn.fetch().await?;
    info!(%listing, "fetched user listing");

    // Mutations: key is path + method, variables arrive at dispatch.
    let node = client
        .at(&["users", "post"])
        .context("users.post is a known leaf")?;
    let create = node.as_mutation().context("post is a write method")?;
    let descriptor = create.mutation_options(MutationOptions::default());
    info!(
        key = %serde_json::to_string(&descriptor.mutation_key)?,
        "derived mutation key"
    );

    let created = descriptor.mutation_fn.dispatch(json!({"name": "carol"})).await?;
    info!(%created, "created user");

    // A 400 is below the configured policy threshold, so the failure
    // is folded into null instead of an error.
    let suppressed = descriptor.mutation_fn.dispatch(json!({"name": ""})).await?;
    info!(%suppressed, "validation failure suppressed by policy");

    Ok(())
}
