use crate::key::KeyPrefix;
use crate::policy::ThrowPolicy;

/// Construction-time configuration, shared by reference across every
/// helper derived from one extended tree. Never mutated after creation.
#[derive(Debug, Clone, Default)]
pub struct QueryConfig {
    pub throw_on_error: ThrowPolicy,
    pub query_key_prefix: Option<KeyPrefix>,
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn throw_on_error(mut self, policy: impl Into<ThrowPolicy>) -> Self {
        self.throw_on_error = policy.into();
        self
    }

    pub fn query_key_prefix(mut self, prefix: impl Into<KeyPrefix>) -> Self {
        self.query_key_prefix = Some(prefix.into());
        self
    }
}
