//! Shared test fixtures: recording port mocks and a schema harness.

use std::sync::{Arc, Mutex};

use async_graphql::dynamic::Schema;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use keel_core::prelude::*;
use keel_graphql::{GraphQLConfig, RequestContext, SchemaAssembler};

/// Command dispatcher that records every envelope it receives.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub envelopes: Mutex<Vec<CommandEnvelope>>,
    /// When set, every dispatch is rejected with this message.
    pub reject_with: Option<String>,
}

#[async_trait]
impl CommandDispatcher for RecordingDispatcher {
    async fn dispatch_command(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
        self.envelopes.lock().unwrap().push(envelope);
        match &self.reject_with {
            Some(message) => Err(PortError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

/// Read-model reader that returns canned records and records every
/// fetch and subscription registration.
#[derive(Default)]
pub struct RecordingReader {
    pub records: Vec<Value>,
    pub fail_with: Option<String>,
    pub fetches: Mutex<Vec<ReadModelRequestEnvelope>>,
    pub subscriptions: Mutex<Vec<(String, ReadModelRequestEnvelope, OperationDescriptor)>>,
}

#[async_trait]
impl ReadModelReader for RecordingReader {
    async fn fetch(&self, envelope: ReadModelRequestEnvelope) -> Result<Vec<Value>, PortError> {
        self.fetches.lock().unwrap().push(envelope);
        match &self.fail_with {
            Some(message) => Err(PortError::Unavailable(message.clone())),
            None => Ok(self.records.clone()),
        }
    }

    async fn subscribe(
        &self,
        connection_id: &str,
        envelope: ReadModelRequestEnvelope,
        operation: OperationDescriptor,
    ) -> Result<(), PortError> {
        self.subscriptions
            .lock()
            .unwrap()
            .push((connection_id.to_string(), envelope, operation));
        Ok(())
    }
}

/// Event reader that returns canned event records.
#[derive(Default)]
pub struct RecordingEvents {
    pub events: Vec<Value>,
    pub requests: Mutex<Vec<EventSearchRequest>>,
}

#[async_trait]
impl EventReader for RecordingEvents {
    async fn fetch(&self, request: EventSearchRequest) -> Result<Vec<Value>, PortError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.events.clone())
    }
}

/// A Cart read model and a ChangeCart command.
pub fn shop_config() -> AppConfig {
    let mut config = AppConfig::new("shop");
    config.register_read_model(
        ObjectSchema::new("Cart")
            .field("id", TypeSchema::id())
            .field("items", TypeSchema::list(TypeSchema::string()))
            .field("total", TypeSchema::optional(TypeSchema::float())),
    );
    config.register_command(
        ObjectSchema::new("ChangeCart")
            .field("cartId", TypeSchema::id())
            .field("sku", TypeSchema::string())
            .field("quantity", TypeSchema::int()),
    );
    config
}

/// Generated schema plus handles to the mocks behind it.
pub struct Harness {
    pub schema: Schema,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub reader: Arc<RecordingReader>,
    pub events: Arc<RecordingEvents>,
    pub broadcaster: Arc<ReadModelBroadcaster>,
}

impl Harness {
    pub fn new(config: AppConfig) -> Self {
        Self::with_mocks(
            config,
            RecordingDispatcher::default(),
            RecordingReader::default(),
            RecordingEvents::default(),
        )
    }

    pub fn with_mocks(
        config: AppConfig,
        dispatcher: RecordingDispatcher,
        reader: RecordingReader,
        events: RecordingEvents,
    ) -> Self {
        let dispatcher = Arc::new(dispatcher);
        let reader = Arc::new(reader);
        let events = Arc::new(events);

        let assembler = SchemaAssembler::new(
            Arc::new(config),
            GraphQLConfig::default(),
            dispatcher.clone(),
            reader.clone(),
            events.clone(),
        );
        let schema = assembler.generate_schema().expect("schema should build");

        Self {
            schema,
            dispatcher,
            reader,
            events,
            broadcaster: ReadModelBroadcaster::new_shared(),
        }
    }

    /// A request context with no user and no connection id.
    pub fn context(&self) -> RequestContext {
        RequestContext::builder()
            .with_request_id(Uuid::new_v4())
            .with_pubsub(self.broadcaster.clone() as DynReadModelPubSub)
            .build()
            .expect("context should build")
    }

    /// A request context bound to a subscription transport connection.
    pub fn subscription_context(&self, connection_id: &str) -> RequestContext {
        RequestContext::builder()
            .with_request_id(Uuid::new_v4())
            .with_connection_id(connection_id)
            .with_pubsub(self.broadcaster.clone() as DynReadModelPubSub)
            .build()
            .expect("context should build")
    }
}
