//! Schema assembly.

use std::sync::{Arc, OnceLock};

use async_graphql::dynamic::Schema;
use tracing::{debug, info};

use keel_core::{AppConfig, DynCommandDispatcher, DynEventReader, DynReadModelReader};

use super::{MutationGenerator, QueryGenerator, SubscriptionGenerator, TypeInformer};
use crate::config::GraphQLConfig;
use crate::error::GraphQLError;

static SHARED: OnceLock<Arc<SchemaAssembler>> = OnceLock::new();

/// Composes the generated roots and types into an executable schema.
///
/// Owns the declared type registry, the execution-limit configuration and
/// the downstream port handles. One assembler serves a process for its
/// lifetime; [`SchemaAssembler::shared`] installs the process-wide
/// instance on first call and returns it on every later call, ignoring
/// later arguments.
pub struct SchemaAssembler {
    app: Arc<AppConfig>,
    graphql: GraphQLConfig,
    dispatcher: DynCommandDispatcher,
    reader: DynReadModelReader,
    events: DynEventReader,
}

impl SchemaAssembler {
    pub fn new(
        app: Arc<AppConfig>,
        graphql: GraphQLConfig,
        dispatcher: DynCommandDispatcher,
        reader: DynReadModelReader,
        events: DynEventReader,
    ) -> Self {
        Self {
            app,
            graphql,
            dispatcher,
            reader,
            events,
        }
    }

    /// Returns the process-wide assembler, installing it on first call.
    pub fn shared(
        app: Arc<AppConfig>,
        graphql: GraphQLConfig,
        dispatcher: DynCommandDispatcher,
        reader: DynReadModelReader,
        events: DynEventReader,
    ) -> Arc<Self> {
        SHARED
            .get_or_init(|| Arc::new(Self::new(app, graphql, dispatcher, reader, events)))
            .clone()
    }

    /// Generates the executable schema from the declared type registry.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid, a declared type carries
    /// an unsupported field shape, or the composed schema does not
    /// validate.
    pub fn generate_schema(&self) -> Result<Schema, GraphQLError> {
        self.graphql
            .validate()
            .map_err(GraphQLError::SchemaBuildFailed)?;

        let read_models: Vec<_> = self.app.read_models.values().cloned().collect();
        let commands: Vec<_> = self.app.commands.values().cloned().collect();
        let version = self.app.schema_version;

        debug!(
            read_models = read_models.len(),
            commands = commands.len(),
            version,
            "Generating GraphQL schema"
        );

        let mut informer = TypeInformer::new();

        let query = QueryGenerator::new(
            read_models.clone(),
            self.reader.clone(),
            self.events.clone(),
            version,
        )
        .generate(&mut informer)?;
        let mutation = MutationGenerator::new(commands, self.dispatcher.clone(), version)
            .generate(&mut informer)?;
        let subscription = SubscriptionGenerator::new(read_models, self.reader.clone(), version)
            .generate(&mut informer)?;

        let mut builder = Schema::build(
            "Query",
            mutation.as_ref().map(|_| "Mutation"),
            subscription.as_ref().map(|_| "Subscription"),
        );
        builder = builder.register(query);
        if let Some(mutation) = mutation {
            builder = builder.register(mutation);
        }
        if let Some(subscription) = subscription {
            builder = builder.register(subscription);
        }
        builder = informer.register_into(builder);

        builder = builder
            .limit_depth(self.graphql.max_depth)
            .limit_complexity(self.graphql.max_complexity);
        if !self.graphql.introspection {
            builder = builder.disable_introspection();
        }

        let schema = builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

        info!(app = %self.app.app_name, "GraphQL schema generated");
        Ok(schema)
    }
}
