//! Subscription root generation.

use async_graphql::dynamic::{InputValue, Subscription, SubscriptionField, TypeRef};
use tracing::debug;

use keel_core::{DynReadModelReader, ObjectSchema};

use super::TypeInformer;
use crate::error::GraphQLError;
use crate::naming::{self, FieldKind};
use crate::resolvers::SubscribeResolver;

/// Generates the `Subscription` root object.
///
/// Every declared read model contributes a by-id subscription field and
/// a filtered list subscription field, mirroring the query surface.
pub struct SubscriptionGenerator {
    read_models: Vec<ObjectSchema>,
    reader: DynReadModelReader,
    version: u32,
}

impl SubscriptionGenerator {
    pub fn new(read_models: Vec<ObjectSchema>, reader: DynReadModelReader, version: u32) -> Self {
        Self {
            read_models,
            reader,
            version,
        }
    }

    /// Generates the subscription root, or None when no read models are
    /// declared.
    pub fn generate(
        &self,
        informer: &mut TypeInformer,
    ) -> Result<Option<Subscription>, GraphQLError> {
        if self.read_models.is_empty() {
            return Ok(None);
        }

        let mut subscription = Subscription::new("Subscription");
        for schema in &self.read_models {
            debug!(type_name = %schema.name, "Generating read model subscription fields");
            informer.ensure_object(schema)?;
            let filter_ref = informer.ensure_filter_input(schema)?;

            // Each emission is one matching read-model state, for the
            // list field too; the list naming mirrors the query surface.
            let by_id = SubscriptionField::new(
                naming::field_name(&schema.name, FieldKind::Subscribe),
                TypeRef::named_nn(schema.name.clone()),
                SubscribeResolver::resolve_by_id(
                    schema.name.clone(),
                    self.reader.clone(),
                    self.version,
                ),
            )
            .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)));
            subscription = subscription.field(by_id);

            let list = SubscriptionField::new(
                naming::field_name(&schema.name, FieldKind::SubscribeList),
                TypeRef::named_nn(schema.name.clone()),
                SubscribeResolver::resolve_list(
                    schema.name.clone(),
                    self.reader.clone(),
                    self.version,
                ),
            )
            .argument(InputValue::new("filter", filter_ref))
            .argument(InputValue::new("limit", TypeRef::named(TypeRef::INT)))
            .argument(InputValue::new(
                "afterCursor",
                TypeRef::named(TypeRef::STRING),
            ));
            subscription = subscription.field(list);
        }

        Ok(Some(subscription))
    }
}
