//! # keel-core
//!
//! Core contract types for the Keel backend framework.
//!
//! This crate defines the types shared between the GraphQL synthesis layer
//! and an application's command/read-model subsystems. It does not contain
//! any business logic - that lives behind the port traits.
//!
//! ## Overview
//!
//! - [`descriptor`] - Structural type descriptors for declared commands and
//!   read models, consumed by the schema generators
//! - [`envelope`] - Immutable request envelopes passed across subsystem
//!   boundaries
//! - [`ports`] - Traits for the downstream subsystems (command dispatch,
//!   read-model reads and subscriptions, event search, pub/sub)
//! - [`pubsub`] - In-process broadcast implementation of the read-model
//!   pub/sub port
//! - [`config`] - Application configuration and the declared-type registry
//!
//! ## Example
//!
//! ```ignore
//! use keel_core::prelude::*;
//!
//! let mut config = AppConfig::new("shop");
//! config.register_read_model(
//!     ObjectSchema::new("Cart")
//!         .field("id", TypeSchema::id())
//!         .field("items", TypeSchema::list(TypeSchema::string())),
//! );
//! ```

pub mod config;
pub mod descriptor;
pub mod envelope;
mod error;
pub mod ports;
pub mod pubsub;

pub use config::AppConfig;
pub use descriptor::{EnumSchema, FieldSchema, ObjectSchema, ScalarKind, TypeSchema};
pub use envelope::{
    CommandEnvelope, EventFilter, EventSearchRequest, OperationDescriptor, PropertyFilter,
    ReadModelRequestEnvelope,
};
pub use error::PortError;
pub use ports::{
    CommandDispatcher, DynCommandDispatcher, DynEventReader, DynReadModelPubSub,
    DynReadModelReader, EventReader, ReadModelPubSub, ReadModelReader,
};
pub use pubsub::{ReadModelBroadcaster, ReadModelChange};

/// Type alias for a port operation result.
pub type PortResult<T> = Result<T, PortError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use keel_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::descriptor::{EnumSchema, FieldSchema, ObjectSchema, ScalarKind, TypeSchema};
    pub use crate::envelope::{
        CommandEnvelope, EventFilter, EventSearchRequest, OperationDescriptor, PropertyFilter,
        ReadModelRequestEnvelope,
    };
    pub use crate::error::PortError;
    pub use crate::ports::{
        CommandDispatcher, DynCommandDispatcher, DynEventReader, DynReadModelPubSub,
        DynReadModelReader, EventReader, ReadModelPubSub, ReadModelReader,
    };
    pub use crate::pubsub::{ReadModelBroadcaster, ReadModelChange};
    pub use crate::PortResult;
}
