// querygraft client-side tree extension
// Wraps a remote-call client tree so every HTTP-verb leaf also exposes
// the query/mutation descriptors an external cache layer consumes.

pub mod extend;
pub mod mutation;
pub mod node;
pub mod query;

pub use extend::{CacheClient, ExtendedBranch, ExtendedNode};
pub use mutation::{MutationDescriptor, MutationEndpoint, MutationFn, MutationOptions};
pub use node::{ApiNode, Routes, StaticRoutes};
pub use query::{QueryDescriptor, QueryEndpoint, QueryFilter, QueryFn, QueryOptions};
