//! Type informer: descriptor-to-GraphQL type synthesis.
//!
//! Walks the declared [`TypeSchema`] descriptors and produces the dynamic
//! GraphQL types the generators reference: object types for read-model
//! results, input-object variants for command arguments, filter inputs for
//! list queries, and enums. Every generated type is memoized by descriptor
//! identity - repeated calls for the same declared type return the
//! identical cached type and never register a duplicate.
//!
//! Unsupported field shapes fail here, at schema-build time, so a
//! partially-usable schema is never served.

use std::collections::BTreeMap;

use async_graphql::Value;
use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, InputObject, InputValue, Object, Scalar, SchemaBuilder,
    TypeRef,
};
use keel_core::{EnumSchema, ObjectSchema, ScalarKind, TypeSchema};
use tracing::trace;

use crate::error::GraphQLError;
use crate::naming;

/// Generates and caches dynamic GraphQL types from declared descriptors.
///
/// One informer instance is created per schema assembly; the assembler
/// drains it with [`TypeInformer::register_into`] once all generators have
/// run.
#[derive(Default)]
pub struct TypeInformer {
    objects: BTreeMap<String, Object>,
    inputs: BTreeMap<String, InputObject>,
    enums: BTreeMap<String, Enum>,
    scalars: BTreeMap<String, Scalar>,
}

impl TypeInformer {
    /// Creates an empty informer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of generated types.
    pub fn generated_count(&self) -> usize {
        self.objects.len() + self.inputs.len() + self.enums.len() + self.scalars.len()
    }

    /// Returns a reference to the generated object type for a declared
    /// type, generating it (and every type it references) on first call.
    ///
    /// Calling this twice for the same descriptor returns the identical
    /// cached type; GraphQL schemas require type instance identity for
    /// shared references, not just structural equality.
    pub fn ensure_object(&mut self, schema: &ObjectSchema) -> Result<TypeRef, GraphQLError> {
        if self.objects.contains_key(&schema.name) {
            return Ok(TypeRef::named(schema.name.clone()));
        }
        validate_type_name(&schema.name)?;
        if schema.fields.is_empty() {
            return Err(GraphQLError::SchemaBuildFailed(format!(
                "type {} declares no fields",
                schema.name
            )));
        }

        trace!(type_name = %schema.name, "Generating object type");
        let mut obj = Object::new(&schema.name);
        for field in &schema.fields {
            validate_field_name(&schema.name, &field.name)?;
            let type_ref =
                self.type_ref_for(&schema.name, &field.name, &field.schema, true, false)?;
            obj = obj.field(create_field_resolver(&field.name, type_ref));
        }

        self.objects.insert(schema.name.clone(), obj);
        Ok(TypeRef::named(schema.name.clone()))
    }

    /// Returns a reference to the generated input-object variant for a
    /// declared type (`{T}Input`), generating it on first call.
    ///
    /// Same structural shape as the object type, using input-object
    /// conventions; nested object fields reference nested input variants.
    pub fn ensure_input(&mut self, schema: &ObjectSchema) -> Result<TypeRef, GraphQLError> {
        let input_name = naming::input_type_name(&schema.name);
        if self.inputs.contains_key(&input_name) {
            return Ok(TypeRef::named(input_name));
        }
        validate_type_name(&schema.name)?;
        if schema.fields.is_empty() {
            return Err(GraphQLError::SchemaBuildFailed(format!(
                "type {} declares no fields",
                schema.name
            )));
        }

        trace!(type_name = %input_name, "Generating input type");
        let mut input = InputObject::new(&input_name);
        for field in &schema.fields {
            validate_field_name(&schema.name, &field.name)?;
            let type_ref =
                self.type_ref_for(&schema.name, &field.name, &field.schema, true, true)?;
            input = input.field(InputValue::new(&field.name, type_ref));
        }

        self.inputs.insert(input_name.clone(), input);
        Ok(TypeRef::named(input_name))
    }

    /// Returns a reference to the generated filter input for a read-model
    /// type (`{T}Filter`), generating it on first call.
    ///
    /// Each scalar or enum field becomes an operator input
    /// (`StringPropertyFilter`, `{Enum}PropertyFilter`, ...); object and
    /// list fields are not filterable and are skipped.
    pub fn ensure_filter_input(&mut self, schema: &ObjectSchema) -> Result<TypeRef, GraphQLError> {
        let filter_name = naming::filter_type_name(&schema.name);
        if self.inputs.contains_key(&filter_name) {
            return Ok(TypeRef::named(filter_name));
        }
        validate_type_name(&schema.name)?;

        trace!(type_name = %filter_name, "Generating filter input type");
        let mut input = InputObject::new(&filter_name);
        let mut has_fields = false;
        for field in &schema.fields {
            // Optional wrappers do not affect filterability.
            let shape = match &field.schema {
                TypeSchema::Optional(inner) => inner.as_ref(),
                other => other,
            };
            let operator_type = match shape {
                TypeSchema::Scalar(kind) => self.ensure_scalar_property_filter(*kind),
                TypeSchema::Enum(enum_schema) => self.ensure_enum_property_filter(enum_schema)?,
                _ => {
                    trace!(
                        type_name = %schema.name,
                        field = %field.name,
                        "Skipping non-scalar field in filter input"
                    );
                    continue;
                }
            };
            validate_field_name(&schema.name, &field.name)?;
            input = input.field(InputValue::new(&field.name, TypeRef::named(operator_type)));
            has_fields = true;
        }

        if !has_fields {
            return Err(GraphQLError::SchemaBuildFailed(format!(
                "read model {} has no filterable fields",
                schema.name
            )));
        }

        self.inputs.insert(filter_name.clone(), input);
        Ok(TypeRef::named(filter_name))
    }

    /// Registers a hand-built object type (e.g. the event record type).
    pub fn register_object(&mut self, object: Object) {
        self.objects.insert(object.type_name().to_string(), object);
    }

    /// Registers a custom scalar.
    pub fn register_scalar(&mut self, scalar: Scalar) {
        self.scalars.insert(scalar.type_name().to_string(), scalar);
    }

    /// Registers every generated type into the schema builder.
    pub fn register_into(self, mut builder: SchemaBuilder) -> SchemaBuilder {
        for (_, scalar) in self.scalars {
            builder = builder.register(scalar);
        }
        for (_, enum_type) in self.enums {
            builder = builder.register(enum_type);
        }
        for (_, object) in self.objects {
            builder = builder.register(object);
        }
        for (_, input) in self.inputs {
            builder = builder.register(input);
        }
        builder
    }

    /// Resolves a field shape to a GraphQL type reference, generating any
    /// referenced named types on the way.
    fn type_ref_for(
        &mut self,
        owner: &str,
        field: &str,
        schema: &TypeSchema,
        required: bool,
        input: bool,
    ) -> Result<TypeRef, GraphQLError> {
        match schema {
            TypeSchema::Scalar(kind) => {
                Ok(wrap_required(TypeRef::named(kind.graphql_name()), required))
            }
            TypeSchema::Enum(enum_schema) => {
                self.ensure_enum(enum_schema)?;
                Ok(wrap_required(
                    TypeRef::named(enum_schema.name.clone()),
                    required,
                ))
            }
            TypeSchema::Object(object_schema) => {
                let type_ref = if input {
                    self.ensure_input(object_schema)?
                } else {
                    self.ensure_object(object_schema)?
                };
                Ok(wrap_required(type_ref, required))
            }
            TypeSchema::List(inner) => {
                let item = self.type_ref_for(owner, field, inner, true, input)?;
                Ok(wrap_required(TypeRef::List(Box::new(item)), required))
            }
            TypeSchema::Optional(inner) => {
                if inner.is_optional() {
                    return Err(GraphQLError::UnsupportedFieldShape {
                        type_name: owner.to_string(),
                        field: field.to_string(),
                        detail: "nested optional".to_string(),
                    });
                }
                self.type_ref_for(owner, field, inner, false, input)
            }
        }
    }

    /// Generates an enum type once.
    fn ensure_enum(&mut self, schema: &EnumSchema) -> Result<(), GraphQLError> {
        if self.enums.contains_key(&schema.name) {
            return Ok(());
        }
        validate_type_name(&schema.name)?;
        if schema.variants.is_empty() {
            return Err(GraphQLError::SchemaBuildFailed(format!(
                "enum {} declares no variants",
                schema.name
            )));
        }

        let mut enum_type = Enum::new(&schema.name);
        for variant in &schema.variants {
            enum_type = enum_type.item(EnumItem::new(variant));
        }
        self.enums.insert(schema.name.clone(), enum_type);
        Ok(())
    }

    /// Generates the operator input for a scalar kind once; returns its
    /// type name.
    fn ensure_scalar_property_filter(&mut self, kind: ScalarKind) -> String {
        let scalar_name = kind.graphql_name();
        let filter_name = naming::property_filter_type_name(scalar_name);
        if self.inputs.contains_key(&filter_name) {
            return filter_name;
        }

        let operators: &[&str] = match kind {
            ScalarKind::Id => &["eq", "ne"],
            ScalarKind::String => &["eq", "ne", "lt", "lte", "gt", "gte", "contains", "beginsWith"],
            ScalarKind::Int | ScalarKind::Float => &["eq", "ne", "lt", "lte", "gt", "gte"],
            ScalarKind::Boolean => &["eq", "ne"],
        };

        let mut input = InputObject::new(&filter_name);
        for op in operators {
            input = input.field(InputValue::new(*op, TypeRef::named(scalar_name)));
        }
        // Every kind except Boolean supports set membership.
        if kind != ScalarKind::Boolean {
            input = input.field(InputValue::new(
                "in",
                TypeRef::List(Box::new(TypeRef::named(scalar_name))),
            ));
        }

        self.inputs.insert(filter_name.clone(), input);
        filter_name
    }

    /// Generates the operator input for an enum type once; returns its
    /// type name.
    fn ensure_enum_property_filter(&mut self, schema: &EnumSchema) -> Result<String, GraphQLError> {
        self.ensure_enum(schema)?;
        let filter_name = naming::property_filter_type_name(&schema.name);
        if self.inputs.contains_key(&filter_name) {
            return Ok(filter_name);
        }

        let input = InputObject::new(&filter_name)
            .field(InputValue::new("eq", TypeRef::named(schema.name.clone())))
            .field(InputValue::new("ne", TypeRef::named(schema.name.clone())))
            .field(InputValue::new(
                "in",
                TypeRef::List(Box::new(TypeRef::named(schema.name.clone()))),
            ));

        self.inputs.insert(filter_name.clone(), input);
        Ok(filter_name)
    }
}

/// Creates a field resolver that extracts a value from the parent JSON
/// object.
pub(crate) fn create_field_resolver(field_name: &str, type_ref: TypeRef) -> Field {
    let json_field_name = field_name.to_string();
    Field::new(field_name, type_ref, move |ctx| {
        let field_name = json_field_name.clone();
        FieldFuture::new(async move {
            if let Some(Value::Object(obj)) = ctx.parent_value.as_value()
                && let Some(value) = obj.get(&async_graphql::Name::new(&field_name))
            {
                return Ok(Some(value.clone()));
            }
            Ok(None::<Value>)
        })
    })
}

/// Wraps a type reference in NonNull when the field is required.
fn wrap_required(type_ref: TypeRef, required: bool) -> TypeRef {
    if required {
        TypeRef::NonNull(Box::new(type_ref))
    } else {
        type_ref
    }
}

/// Checks that a declared type name is a valid GraphQL name.
fn validate_type_name(name: &str) -> Result<(), GraphQLError> {
    if is_valid_graphql_name(name) {
        Ok(())
    } else {
        Err(GraphQLError::SchemaBuildFailed(format!(
            "invalid GraphQL type name: {name:?}"
        )))
    }
}

/// Checks that a declared field name is a valid GraphQL name.
fn validate_field_name(type_name: &str, field: &str) -> Result<(), GraphQLError> {
    if is_valid_graphql_name(field) {
        Ok(())
    } else {
        Err(GraphQLError::UnsupportedFieldShape {
            type_name: type_name.to_string(),
            field: field.to_string(),
            detail: "invalid GraphQL field name".to_string(),
        })
    }
}

/// GraphQL names must match `[_a-zA-Z][_a-zA-Z0-9]*`.
fn is_valid_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_schema() -> ObjectSchema {
        ObjectSchema::new("Cart")
            .field("id", TypeSchema::id())
            .field("items", TypeSchema::list(TypeSchema::string()))
            .field("total", TypeSchema::optional(TypeSchema::float()))
    }

    #[test]
    fn test_object_generation_is_memoized() {
        let mut informer = TypeInformer::new();
        let schema = cart_schema();

        let first = informer.ensure_object(&schema).unwrap();
        let count = informer.generated_count();
        let second = informer.ensure_object(&schema).unwrap();

        // Identical cached type: same reference name, no new registration.
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(informer.generated_count(), count);
    }

    #[test]
    fn test_nested_objects_are_generated() {
        let mut informer = TypeInformer::new();
        let schema = ObjectSchema::new("Order").field(
            "shipping",
            TypeSchema::Object(
                ObjectSchema::new("Address").field("street", TypeSchema::string()),
            ),
        );

        informer.ensure_object(&schema).unwrap();
        // Order and Address.
        assert_eq!(informer.generated_count(), 2);
    }

    #[test]
    fn test_input_variant_uses_input_suffix() {
        let mut informer = TypeInformer::new();
        let schema = ObjectSchema::new("ChangeCart")
            .field("cartId", TypeSchema::id())
            .field("sku", TypeSchema::string());

        let type_ref = informer.ensure_input(&schema).unwrap();
        assert_eq!(type_ref.to_string(), "ChangeCartInput");
    }

    #[test]
    fn test_filter_input_skips_non_scalar_fields() {
        let mut informer = TypeInformer::new();
        let type_ref = informer.ensure_filter_input(&cart_schema()).unwrap();
        assert_eq!(type_ref.to_string(), "CartFilter");
        // CartFilter plus the ID and Float operator inputs; the list field
        // contributes nothing.
        assert!(informer.generated_count() >= 3);
    }

    #[test]
    fn test_nested_optional_fails_fast() {
        let mut informer = TypeInformer::new();
        let schema = ObjectSchema::new("Broken").field(
            "x",
            TypeSchema::optional(TypeSchema::optional(TypeSchema::int())),
        );

        let err = informer.ensure_object(&schema).unwrap_err();
        assert!(matches!(err, GraphQLError::UnsupportedFieldShape { .. }));
    }

    #[test]
    fn test_empty_object_fails_fast() {
        let mut informer = TypeInformer::new();
        let err = informer.ensure_object(&ObjectSchema::new("Empty")).unwrap_err();
        assert!(matches!(err, GraphQLError::SchemaBuildFailed(_)));
    }

    #[test]
    fn test_invalid_type_name_fails_fast() {
        let mut informer = TypeInformer::new();
        let schema = ObjectSchema::new("not-valid").field("id", TypeSchema::id());
        assert!(informer.ensure_object(&schema).is_err());
    }

    #[test]
    fn test_is_valid_graphql_name() {
        assert!(is_valid_graphql_name("Cart"));
        assert!(is_valid_graphql_name("_internal"));
        assert!(is_valid_graphql_name("Type123"));
        assert!(!is_valid_graphql_name(""));
        assert!(!is_valid_graphql_name("123Type"));
        assert!(!is_valid_graphql_name("has-hyphen"));
        assert!(!is_valid_graphql_name("has space"));
    }
}
