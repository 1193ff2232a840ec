// Tree extension behavior: pass-through invariants, policy predicate
// forms, synthesized route shapes and concurrent fetches.

use async_trait::async_trait;
use futures::future::join_all;
use http::StatusCode;
use querygraft_client::{
    ApiNode, CacheClient, ExtendedNode, QueryOptions, Routes, StaticRoutes,
};
use querygraft_core::{CallReply, Endpoint, QueryConfig, ThrowPolicy};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct EchoEndpoint;

#[async_trait]
impl Endpoint for EchoEndpoint {
    async fn call(&self, input: Option<Value>, _options: Option<Value>) -> CallReply {
        CallReply::ok(json!({"echo": input}), StatusCode::OK)
    }
}

#[derive(Debug)]
struct FailingEndpoint {
    status: StatusCode,
}

#[async_trait]
impl Endpoint for FailingEndpoint {
    async fn call(&self, _input: Option<Value>, _options: Option<Value>) -> CallReply {
        CallReply::err(
            json!({"status": self.status.as_u16(), "value": "failed"}),
            self.status,
        )
    }
}

#[tokio::test]
async fn test_pass_through_members_are_untouched() {
    let routes = StaticRoutes::new()
        .value("version", json!("1.0"))
        .value("limits", json!({"page_size": 50}))
        .endpoint("refresh", EchoEndpoint);
    let client = CacheClient::new(Arc::new(routes), QueryConfig::default());

    // Values compare equal to the unextended tree's members.
    assert_eq!(
        client.member("version").unwrap().as_value(),
        Some(&json!("1.0"))
    );
    assert_eq!(
        client.member("limits").unwrap().as_value(),
        Some(&json!({"page_size": 50}))
    );

    // A non-verb callable stays invocable with identical behavior.
    let node = client.member("refresh").unwrap();
    let ExtendedNode::Call(endpoint) = node else {
        panic!("non-verb endpoint should stay a plain callable");
    };
    let via_extended = endpoint.call(Some(json!({"tick": 1})), None).await;
    let direct = EchoEndpoint.call(Some(json!({"tick": 1})), None).await;
    assert_eq!(via_extended.data(), direct.data());
}

#[tokio::test]
async fn test_extended_leaf_call_is_identical_to_original() {
    let routes =
        StaticRoutes::new().branch("users", StaticRoutes::new().endpoint("get", EchoEndpoint));
    let client = CacheClient::new(Arc::new(routes), QueryConfig::default());
    let node = client.at(&["users", "get"]).unwrap();
    let leaf = node.as_query().unwrap();

    let via_leaf = leaf.call(Some(json!({"page": 1}))).await;
    let direct = EchoEndpoint.call(Some(json!({"page": 1})), None).await;
    assert_eq!(via_leaf.data(), direct.data());
    assert_eq!(via_leaf.status, direct.status);
}

#[tokio::test]
async fn test_status_policy_form() {
    let routes = StaticRoutes::new().branch(
        "users",
        StaticRoutes::new().endpoint(
            "get",
            FailingEndpoint {
                status: StatusCode::NOT_FOUND,
            },
        ),
    );
    let config = QueryConfig::new()
        .throw_on_error(ThrowPolicy::by_status(|_key, status| status.as_u16() >= 500));
    let client = CacheClient::new(Arc::new(routes), config);
    let node = client.at(&["users", "get"]).unwrap();
    let descriptor = node
        .as_query()
        .unwrap()
        .query_options(None, QueryOptions::default());

    // 404 is below the policy's threshold, so it is folded to null.
    assert_eq!(descriptor.query_fn.fetch().await, Ok(Value::Null));
}

#[tokio::test]
async fn test_context_policy_form() {
    let routes = StaticRoutes::new().branch(
        "users",
        StaticRoutes::new().endpoint(
            "get",
            FailingEndpoint {
                status: StatusCode::NOT_FOUND,
            },
        ),
    );
    let config = QueryConfig::new().throw_on_error(ThrowPolicy::by_context(|ctx| {
        ctx.path != vec!["users".to_string()]
    }));
    let client = CacheClient::new(Arc::new(routes), config);
    let node = client.at(&["users", "get"]).unwrap();
    let descriptor = node
        .as_query()
        .unwrap()
        .query_options(None, QueryOptions::default());

    // The context predicate sees the users path and suppresses.
    assert_eq!(descriptor.query_fn.fetch().await, Ok(Value::Null));
}

/// Routes that synthesize a subtree for any member name, the shape a
/// parameterized path segment takes in this tree model.
#[derive(Debug)]
struct UserByIdRoutes;

impl Routes for UserByIdRoutes {
    fn member(&self, id: &str) -> Option<ApiNode> {
        let id = id.to_string();
        Some(
            StaticRoutes::new()
                .value("id", json!(id))
                .endpoint("get", EchoEndpoint)
                .into_node(),
        )
    }
}

#[test]
fn test_synthesized_segments_extend_like_static_ones() {
    let routes = StaticRoutes::new().branch("users", UserByIdRoutes);
    let client = CacheClient::new(Arc::new(routes), QueryConfig::default());

    let leaf = client.at(&["users", "42", "get"]).unwrap();
    let leaf = leaf.as_query().unwrap();
    assert_eq!(leaf.path(), &["users".to_string(), "42".to_string()]);

    // Another id yields another branch; the tree is unbounded.
    assert!(client.at(&["users", "alice", "get"]).is_some());
    assert_eq!(
        client
            .at(&["users", "7", "id"])
            .unwrap()
            .as_value(),
        Some(&json!("7"))
    );
}

#[tokio::test]
async fn test_concurrent_fetches_share_no_state() {
    let routes =
        StaticRoutes::new().branch("users", StaticRoutes::new().endpoint("get", EchoEndpoint));
    let client = CacheClient::new(Arc::new(routes), QueryConfig::default());
    let node = client.at(&["users", "get"]).unwrap();
    let leaf = node.as_query().unwrap();

    let descriptors: Vec<_> = (0..8)
        .map(|page| leaf.query_options(Some(json!({"page": page})), QueryOptions::default()))
        .collect();
    let fetches = descriptors.iter().map(|d| d.query_fn.fetch());
    let results = join_all(fetches).await;

    for (page, result) in results.into_iter().enumerate() {
        assert_eq!(result, Ok(json!({"echo": {"page": page}})));
    }
}
