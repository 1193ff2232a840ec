use indexmap::IndexMap;
use querygraft_core::Endpoint;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One member of a remote-call client tree.
#[derive(Debug, Clone)]
pub enum ApiNode {
    /// Plain value, passed through untouched by the extender.
    Value(Value),
    /// Nested members, looked up on access.
    Branch(Arc<dyn Routes>),
    /// Callable endpoint. Whether it becomes a query or mutation leaf
    /// depends on the member name it is reached through.
    Endpoint(Arc<dyn Endpoint>),
}

impl ApiNode {
    pub fn endpoint(endpoint: impl Endpoint + 'static) -> Self {
        ApiNode::Endpoint(Arc::new(endpoint))
    }

    pub fn branch(routes: impl Routes + 'static) -> Self {
        ApiNode::Branch(Arc::new(routes))
    }
}

/// Lazy member lookup for a branch.
///
/// Implementations may synthesize members on demand, so a tree can
/// expose unbounded shapes — parameterized path segments, for one —
/// without materializing them. The extender only ever asks for the
/// member actually accessed.
pub trait Routes: Send + Sync + fmt::Debug {
    fn member(&self, name: &str) -> Option<ApiNode>;
}

/// Fixed route table backed by an ordered map, built in place:
///
/// ```
/// use querygraft_client::StaticRoutes;
/// use serde_json::json;
///
/// let routes = StaticRoutes::new()
///     .value("version", json!("1.0"))
///     .branch("users", StaticRoutes::new());
/// ```
#[derive(Debug, Default, Clone)]
pub struct StaticRoutes {
    members: IndexMap<String, ApiNode>,
}

impl StaticRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, name: impl Into<String>, node: ApiNode) -> Self {
        self.members.insert(name.into(), node);
        self
    }

    pub fn endpoint(self, name: impl Into<String>, endpoint: impl Endpoint + 'static) -> Self {
        self.insert(name, ApiNode::endpoint(endpoint))
    }

    pub fn branch(self, name: impl Into<String>, routes: impl Routes + 'static) -> Self {
        self.insert(name, ApiNode::branch(routes))
    }

    pub fn value(self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, ApiNode::Value(value))
    }

    pub fn into_node(self) -> ApiNode {
        ApiNode::Branch(Arc::new(self))
    }
}

impl Routes for StaticRoutes {
    fn member(&self, name: &str) -> Option<ApiNode> {
        self.members.get(name).cloned()
    }
}
