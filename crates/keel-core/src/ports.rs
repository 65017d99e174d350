//! Port traits for the downstream subsystems.
//!
//! The GraphQL layer depends only on these contracts. Implementations are
//! provided by the application runtime (or by test doubles); this crate
//! ships a single in-process implementation of [`ReadModelPubSub`] in
//! [`crate::pubsub`].
//!
//! ```ignore
//! use async_trait::async_trait;
//! use keel_core::{CommandDispatcher, CommandEnvelope, PortError};
//!
//! struct MyDispatcher;
//!
//! #[async_trait]
//! impl CommandDispatcher for MyDispatcher {
//!     async fn dispatch_command(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
//!         // validate, authorize, execute
//!         Ok(())
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::Value;

use crate::envelope::{
    CommandEnvelope, EventSearchRequest, OperationDescriptor, ReadModelRequestEnvelope,
};
use crate::error::PortError;

/// Accepts a command envelope, validates and executes it.
///
/// A successful dispatch carries no payload; rejection and handler failures
/// surface as [`PortError`].
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Dispatches a single command envelope.
    async fn dispatch_command(&self, envelope: CommandEnvelope) -> Result<(), PortError>;
}

/// Serves read-model fetches and live subscription registrations.
#[async_trait]
pub trait ReadModelReader: Send + Sync {
    /// Returns the records matching the envelope's filters.
    ///
    /// The result array is returned to the caller unmodified; pagination
    /// behavior is driven by the envelope's `paginated`, `limit`, and
    /// `after_cursor` fields.
    async fn fetch(&self, envelope: ReadModelRequestEnvelope) -> Result<Vec<Value>, PortError>;

    /// Registers a live subscription for the envelope's criteria.
    ///
    /// `connection_id` identifies the transport-level connection that
    /// receives updates; `operation` is re-executed by the store when
    /// matching data changes.
    async fn subscribe(
        &self,
        connection_id: &str,
        envelope: ReadModelRequestEnvelope,
        operation: OperationDescriptor,
    ) -> Result<(), PortError>;
}

/// Serves filtered searches over stored events.
#[async_trait]
pub trait EventReader: Send + Sync {
    /// Returns the event records matching the request's filters.
    async fn fetch(&self, request: EventSearchRequest) -> Result<Vec<Value>, PortError>;
}

/// Produces live read-model result streams for subscriptions.
pub trait ReadModelPubSub: Send + Sync {
    /// Opens a stream of read-model states matching the envelope.
    ///
    /// The stream yields indefinitely until the subscriber disconnects or
    /// the publishing side shuts down.
    fn stream(&self, envelope: ReadModelRequestEnvelope) -> BoxStream<'static, Value>;
}

/// Type alias for a shared command dispatcher trait object.
pub type DynCommandDispatcher = Arc<dyn CommandDispatcher>;

/// Type alias for a shared read-model reader trait object.
pub type DynReadModelReader = Arc<dyn ReadModelReader>;

/// Type alias for a shared event reader trait object.
pub type DynEventReader = Arc<dyn EventReader>;

/// Type alias for a shared pub/sub trait object.
pub type DynReadModelPubSub = Arc<dyn ReadModelPubSub>;
