pub mod resolver;
pub mod schema;
pub mod tree;

pub use resolver::{resolve, resolve_content, values, ResolveError, Resolver};
pub use schema::{NodeSpec, ResolutionOutcome, Schema, UnknownReference};
pub use tree::{NodeId, ResolvedKind, ResolvedNode, ResolvedTree};
