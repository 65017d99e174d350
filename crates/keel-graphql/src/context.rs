//! Per-request resolver context.
//!
//! [`RequestContext`] holds everything a resolver needs beyond its
//! arguments: request identity, the opaque current user, subscription
//! transport details, and the pub/sub handle that backs live result
//! streams. It is constructed per request through a validating builder and
//! attached to the GraphQL request with `Request::data`.
//!
//! # Example
//!
//! ```ignore
//! use keel_graphql::RequestContext;
//!
//! let context = RequestContext::builder()
//!     .with_request_id(request_id)
//!     .with_current_user(Some(user_claims))
//!     .with_pubsub(broadcaster.clone())
//!     .build()?;
//!
//! let response = schema.execute(Request::new(query).data(context)).await;
//! ```

use serde_json::Value;
use uuid::Uuid;

use keel_core::{DynReadModelPubSub, OperationDescriptor};

/// Contextual bundle carried by every resolver invocation.
///
/// The request id and current user are propagated unchanged into every
/// downstream envelope. `connection_id` and `operation` are only set for
/// subscription transports.
#[derive(Clone)]
pub struct RequestContext {
    /// Request correlation id.
    pub request_id: Uuid,
    /// Opaque current-user value (None for anonymous requests).
    pub current_user: Option<Value>,
    /// Transport-level connection id; required for subscriptions.
    pub connection_id: Option<String>,
    /// Whether subscription registrations are persisted to the store.
    pub store_subscriptions: bool,
    /// Descriptor of the current GraphQL operation.
    pub operation: Option<OperationDescriptor>,
    /// Pub/sub handle backing live subscription streams.
    pub pubsub: DynReadModelPubSub,
}

impl RequestContext {
    /// Creates a new builder for RequestContext.
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    /// Returns whether the request carries a user identity.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("authenticated", &self.is_authenticated())
            .field("connection_id", &self.connection_id)
            .field("store_subscriptions", &self.store_subscriptions)
            .finish()
    }
}

/// Builder for constructing RequestContext.
///
/// Validates that all required fields are provided before creating the
/// context.
#[derive(Default)]
pub struct RequestContextBuilder {
    request_id: Option<Uuid>,
    current_user: Option<Value>,
    connection_id: Option<String>,
    store_subscriptions: Option<bool>,
    operation: Option<OperationDescriptor>,
    pubsub: Option<DynReadModelPubSub>,
}

impl RequestContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request correlation id.
    #[must_use]
    pub fn with_request_id(mut self, id: Uuid) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Sets the opaque current-user value.
    #[must_use]
    pub fn with_current_user(mut self, user: Option<Value>) -> Self {
        self.current_user = user;
        self
    }

    /// Sets the transport-level connection id.
    #[must_use]
    pub fn with_connection_id(mut self, id: impl Into<String>) -> Self {
        self.connection_id = Some(id.into());
        self
    }

    /// Controls whether subscription registrations are persisted.
    /// Default: true
    #[must_use]
    pub fn with_store_subscriptions(mut self, store: bool) -> Self {
        self.store_subscriptions = Some(store);
        self
    }

    /// Sets the current operation descriptor.
    #[must_use]
    pub fn with_operation(mut self, operation: OperationDescriptor) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Sets the pub/sub handle.
    #[must_use]
    pub fn with_pubsub(mut self, pubsub: DynReadModelPubSub) -> Self {
        self.pubsub = Some(pubsub);
        self
    }

    /// Builds the RequestContext.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<RequestContext, ContextBuilderError> {
        let request_id = self
            .request_id
            .ok_or(ContextBuilderError::MissingField("request_id"))?;

        let pubsub = self
            .pubsub
            .ok_or(ContextBuilderError::MissingField("pubsub"))?;

        Ok(RequestContext {
            request_id,
            current_user: self.current_user,
            connection_id: self.connection_id,
            store_subscriptions: self.store_subscriptions.unwrap_or(true),
            operation: self.operation,
            pubsub,
        })
    }
}

/// Errors that can occur when building a RequestContext.
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use keel_core::ReadModelBroadcaster;

    use super::*;

    #[test]
    fn test_builder_missing_request_id() {
        let result = RequestContextBuilder::new()
            .with_pubsub(ReadModelBroadcaster::new_shared())
            .build();

        assert!(matches!(
            result,
            Err(ContextBuilderError::MissingField("request_id"))
        ));
    }

    #[test]
    fn test_builder_missing_pubsub() {
        let result = RequestContextBuilder::new()
            .with_request_id(Uuid::new_v4())
            .build();

        assert!(matches!(
            result,
            Err(ContextBuilderError::MissingField("pubsub"))
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let context = RequestContextBuilder::new()
            .with_request_id(Uuid::new_v4())
            .with_pubsub(ReadModelBroadcaster::new_shared())
            .build()
            .unwrap();

        assert!(context.store_subscriptions);
        assert!(context.connection_id.is_none());
        assert!(!context.is_authenticated());
    }
}
