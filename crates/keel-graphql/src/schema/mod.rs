//! Schema synthesis.
//!
//! The generators in this module turn the declared type registry into a
//! complete executable GraphQL schema. [`TypeInformer`] synthesizes the
//! named types, the per-root generators build the `Query`, `Mutation` and
//! `Subscription` objects, and [`SchemaAssembler`] composes everything
//! and applies the execution limits.

mod assembler;
pub(crate) mod informer;
mod mutation;
mod query;
mod subscription;

pub use assembler::SchemaAssembler;
pub use informer::TypeInformer;
pub use mutation::MutationGenerator;
pub use query::QueryGenerator;
pub use subscription::SubscriptionGenerator;
