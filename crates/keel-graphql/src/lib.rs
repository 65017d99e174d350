//! # keel-graphql
//!
//! GraphQL schema and resolver synthesis for the Keel backend framework.
//!
//! This crate derives a complete GraphQL schema (queries, paginated list
//! queries, mutations, subscriptions) from the command and read-model
//! descriptors registered in an application's [`keel_core::AppConfig`], and
//! wires every generated field to a resolver that bridges GraphQL's
//! request/response model to the framework's envelope-based dispatch and
//! pub/sub subscription model.
//!
//! ## Overview
//!
//! The schema is generated at startup with async-graphql's dynamic schema
//! API. For each registered read model `T` the schema exposes a single-item
//! query `T(id)`, a paginated list query `ListTs(filter, limit,
//! afterCursor)`, and matching subscription fields; for each registered
//! command `C` it exposes a mutation `C(input)`. A top-level `events` query
//! searches the event store.
//!
//! Unsupported descriptor shapes fail schema generation; no request is
//! served against a partially-usable schema.
//!
//! ## Modules
//!
//! - [`config`] - Schema limits and introspection options
//! - [`naming`] - Deterministic field and type naming
//! - [`schema`] - Type informer, generators, and the schema assembler
//! - [`resolvers`] - Field resolvers bridging to the downstream ports
//! - [`context`] - Per-request resolver context
//! - [`error`] - Error types for schema generation and resolution

pub mod config;
pub mod context;
pub mod error;
pub mod naming;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use config::GraphQLConfig;
pub use context::{ContextBuilderError, RequestContext, RequestContextBuilder};
pub use error::GraphQLError;
pub use schema::{MutationGenerator, QueryGenerator, SchemaAssembler, SubscriptionGenerator, TypeInformer};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
