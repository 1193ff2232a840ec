use crate::mutation::MutationEndpoint;
use crate::node::{ApiNode, Routes};
use crate::query::QueryEndpoint;
use querygraft_core::{Endpoint, Method, QueryConfig};
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// A client tree extended with cache helpers.
///
/// Extension is lazy: members are classified and wrapped per access,
/// so trees with synthesized or unbounded shapes cost nothing until
/// the accessed branch is actually walked. The configuration is shared
/// by reference with every helper derived below the root.
#[derive(Debug, Clone)]
pub struct CacheClient {
    root: ExtendedBranch,
}

impl CacheClient {
    pub fn new(routes: Arc<dyn Routes>, config: QueryConfig) -> Self {
        CacheClient {
            root: ExtendedBranch {
                routes,
                path: Vec::new(),
                config: Arc::new(config),
            },
        }
    }

    pub fn root(&self) -> &ExtendedBranch {
        &self.root
    }

    pub fn member(&self, name: &str) -> Option<ExtendedNode> {
        self.root.member(name)
    }

    /// Walks a member path from the root, returning the node at its
    /// end. `at(&["users", "get"])` is the chained-access spelling
    /// `users.get`.
    pub fn at(&self, path: &[&str]) -> Option<ExtendedNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.member(first)?;
        for name in rest {
            node = match node {
                ExtendedNode::Branch(branch) => branch.member(name)?,
                _ => return None,
            };
        }
        Some(node)
    }
}

/// One extended member, classified at access time.
#[derive(Debug, Clone)]
pub enum ExtendedNode {
    /// Primitive passed through untouched.
    Value(Value),
    /// Nested members, extended on access.
    Branch(ExtendedBranch),
    /// Callable whose name is not a helper-bearing HTTP method.
    /// Invocable exactly as before; no helpers attached.
    Call(Arc<dyn Endpoint>),
    /// Read-method leaf with query helpers.
    Query(QueryEndpoint),
    /// Write-method leaf with mutation helpers.
    Mutation(MutationEndpoint),
}

impl ExtendedNode {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ExtendedNode::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_branch(&self) -> Option<&ExtendedBranch> {
        match self {
            ExtendedNode::Branch(branch) => Some(branch),
            _ => None,
        }
    }

    pub fn as_query(&self) -> Option<&QueryEndpoint> {
        match self {
            ExtendedNode::Query(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_mutation(&self) -> Option<&MutationEndpoint> {
        match self {
            ExtendedNode::Mutation(leaf) => Some(leaf),
            _ => None,
        }
    }
}

/// A branch of the extended tree, carrying the path accumulated from
/// the root and the shared configuration.
#[derive(Debug, Clone)]
pub struct ExtendedBranch {
    routes: Arc<dyn Routes>,
    path: Vec<String>,
    config: Arc<QueryConfig>,
}

impl ExtendedBranch {
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Looks up and classifies one member.
    ///
    /// Values pass through. Branches recurse with the member name
    /// appended to the path. An endpoint becomes a query or mutation
    /// leaf when its name is a read or write method — the leaf keeps
    /// the branch path, the verb itself is carried as the key's method
    /// segment — and stays a plain callable otherwise.
    pub fn member(&self, name: &str) -> Option<ExtendedNode> {
        let node = self.routes.member(name)?;
        let extended = match node {
            ApiNode::Value(value) => ExtendedNode::Value(value),
            ApiNode::Branch(routes) => {
                let mut path = self.path.clone();
                path.push(name.to_string());
                ExtendedNode::Branch(ExtendedBranch {
                    routes,
                    path,
                    config: self.config.clone(),
                })
            }
            ApiNode::Endpoint(endpoint) => match Method::from_name(name) {
                Some(method) if method.is_read() => {
                    trace!(path = ?self.path, %method, "extending read leaf");
                    ExtendedNode::Query(QueryEndpoint::new(
                        endpoint,
                        self.path.clone(),
                        method,
                        self.config.clone(),
                    ))
                }
                Some(method) if method.is_write() => {
                    trace!(path = ?self.path, %method, "extending write leaf");
                    ExtendedNode::Mutation(MutationEndpoint::new(
                        endpoint,
                        self.path.clone(),
                        method,
                        self.config.clone(),
                    ))
                }
                _ => ExtendedNode::Call(endpoint),
            },
        };
        Some(extended)
    }
}
