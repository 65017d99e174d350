//! Query root generation.

use async_graphql::dynamic::{Field, InputValue, Object, TypeRef};
use tracing::debug;

use keel_core::{DynEventReader, DynReadModelReader, ObjectSchema};

use super::TypeInformer;
use crate::error::GraphQLError;
use crate::naming::{self, FieldKind};
use crate::resolvers::{
    EVENT_RECORD_TYPE, EventsResolver, ListResolver, ReadResolver, event_record_object,
    json_scalar,
};

/// Generates the `Query` root object.
///
/// Every declared read model contributes a by-id field and a filtered
/// list field; the `events` field searches stored events across all
/// entities.
pub struct QueryGenerator {
    read_models: Vec<ObjectSchema>,
    reader: DynReadModelReader,
    events: DynEventReader,
    version: u32,
}

impl QueryGenerator {
    pub fn new(
        read_models: Vec<ObjectSchema>,
        reader: DynReadModelReader,
        events: DynEventReader,
        version: u32,
    ) -> Self {
        Self {
            read_models,
            reader,
            events,
            version,
        }
    }

    /// Generates the query root, registering referenced types in the
    /// informer.
    pub fn generate(&self, informer: &mut TypeInformer) -> Result<Object, GraphQLError> {
        let mut query = Object::new("Query");

        for schema in &self.read_models {
            debug!(type_name = %schema.name, "Generating read model query fields");
            informer.ensure_object(schema)?;
            let filter_ref = informer.ensure_filter_input(schema)?;

            let read_field = Field::new(
                naming::field_name(&schema.name, FieldKind::Read),
                TypeRef::named(schema.name.clone()),
                ReadResolver::resolve(schema.name.clone(), self.reader.clone(), self.version),
            )
            .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)));
            query = query.field(read_field);

            let list_field = Field::new(
                naming::field_name(&schema.name, FieldKind::List),
                TypeRef::named_nn_list_nn(schema.name.clone()),
                ListResolver::resolve(schema.name.clone(), self.reader.clone(), self.version),
            )
            .argument(InputValue::new("filter", filter_ref))
            .argument(InputValue::new("limit", TypeRef::named(TypeRef::INT)))
            .argument(InputValue::new(
                "afterCursor",
                TypeRef::named(TypeRef::STRING),
            ));
            query = query.field(list_field);
        }

        query = query.field(self.events_field());
        informer.register_scalar(json_scalar());
        informer.register_object(event_record_object());

        Ok(query)
    }

    fn events_field(&self) -> Field {
        Field::new(
            "events",
            TypeRef::named_nn_list_nn(EVENT_RECORD_TYPE),
            EventsResolver::resolve(self.events.clone()),
        )
        .argument(InputValue::new("type", TypeRef::named(TypeRef::STRING)))
        .argument(InputValue::new("entity", TypeRef::named(TypeRef::STRING)))
        .argument(InputValue::new("entityID", TypeRef::named(TypeRef::ID)))
        .argument(InputValue::new("from", TypeRef::named(TypeRef::STRING)))
        .argument(InputValue::new("to", TypeRef::named(TypeRef::STRING)))
    }
}
