//! Mutation root generation.

use async_graphql::dynamic::{Field, InputValue, Object, TypeRef};
use tracing::debug;

use keel_core::{DynCommandDispatcher, ObjectSchema};

use super::TypeInformer;
use crate::error::GraphQLError;
use crate::naming::{self, FieldKind};
use crate::resolvers::CommandResolver;

/// Generates the `Mutation` root object.
///
/// Every declared command contributes one field taking a generated
/// `{Command}Input` and resolving to `Boolean!`.
pub struct MutationGenerator {
    commands: Vec<ObjectSchema>,
    dispatcher: DynCommandDispatcher,
    version: u32,
}

impl MutationGenerator {
    pub fn new(commands: Vec<ObjectSchema>, dispatcher: DynCommandDispatcher, version: u32) -> Self {
        Self {
            commands,
            dispatcher,
            version,
        }
    }

    /// Generates the mutation root, or None when no commands are
    /// declared. GraphQL forbids empty object types, so an application
    /// without commands gets a query-only schema.
    pub fn generate(&self, informer: &mut TypeInformer) -> Result<Option<Object>, GraphQLError> {
        if self.commands.is_empty() {
            return Ok(None);
        }

        let mut mutation = Object::new("Mutation");
        for schema in &self.commands {
            debug!(type_name = %schema.name, "Generating command mutation field");
            let input_ref = informer.ensure_input(schema)?;

            let field = Field::new(
                naming::field_name(&schema.name, FieldKind::Command),
                TypeRef::named_nn(TypeRef::BOOLEAN),
                CommandResolver::resolve(schema.name.clone(), self.dispatcher.clone(), self.version),
            )
            .argument(InputValue::new(
                "input",
                TypeRef::NonNull(Box::new(input_ref)),
            ));
            mutation = mutation.field(field);
        }

        Ok(Some(mutation))
    }
}
