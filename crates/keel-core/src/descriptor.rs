//! Structural type descriptors for declared commands and read models.
//!
//! Applications describe the shape of their command and read-model types
//! with an explicit descriptor tree instead of runtime reflection. The
//! descriptors are built once during configuration and are read-only
//! afterwards; the GraphQL layer walks them to synthesize object, input,
//! and filter types.

/// Scalar kinds supported in declared types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Unique identifier, maps to GraphQL `ID`.
    Id,
    /// UTF-8 string, maps to GraphQL `String`.
    String,
    /// Signed integer, maps to GraphQL `Int`.
    Int,
    /// Double-precision float, maps to GraphQL `Float`.
    Float,
    /// Boolean, maps to GraphQL `Boolean`.
    Boolean,
}

impl ScalarKind {
    /// Returns the GraphQL scalar name for this kind.
    pub fn graphql_name(&self) -> &'static str {
        match self {
            ScalarKind::Id => "ID",
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::Boolean => "Boolean",
        }
    }
}

/// A structural description of a declared type.
///
/// Tagged variant over scalar, object, enum, list, and optional shapes.
/// Fields are non-null by default; wrap in [`TypeSchema::Optional`] to make
/// them nullable.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSchema {
    /// A primitive scalar value.
    Scalar(ScalarKind),
    /// A nested object with named fields.
    Object(ObjectSchema),
    /// A closed set of named variants.
    Enum(EnumSchema),
    /// An array of the inner shape.
    List(Box<TypeSchema>),
    /// A nullable wrapper around the inner shape.
    Optional(Box<TypeSchema>),
}

impl TypeSchema {
    /// Shorthand for `TypeSchema::Scalar(ScalarKind::Id)`.
    pub fn id() -> Self {
        TypeSchema::Scalar(ScalarKind::Id)
    }

    /// Shorthand for `TypeSchema::Scalar(ScalarKind::String)`.
    pub fn string() -> Self {
        TypeSchema::Scalar(ScalarKind::String)
    }

    /// Shorthand for `TypeSchema::Scalar(ScalarKind::Int)`.
    pub fn int() -> Self {
        TypeSchema::Scalar(ScalarKind::Int)
    }

    /// Shorthand for `TypeSchema::Scalar(ScalarKind::Float)`.
    pub fn float() -> Self {
        TypeSchema::Scalar(ScalarKind::Float)
    }

    /// Shorthand for `TypeSchema::Scalar(ScalarKind::Boolean)`.
    pub fn boolean() -> Self {
        TypeSchema::Scalar(ScalarKind::Boolean)
    }

    /// Wraps the inner shape in a list.
    pub fn list(inner: TypeSchema) -> Self {
        TypeSchema::List(Box::new(inner))
    }

    /// Wraps the inner shape in a nullable marker.
    pub fn optional(inner: TypeSchema) -> Self {
        TypeSchema::Optional(Box::new(inner))
    }

    /// Returns true if this shape is nullable at the top level.
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeSchema::Optional(_))
    }
}

/// A named object type with its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// Type name. Must be a valid GraphQL name.
    pub name: String,
    /// Declared fields in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl ObjectSchema {
    /// Creates an empty object schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field, builder style.
    pub fn field(mut self, name: impl Into<String>, schema: TypeSchema) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            schema,
        });
        self
    }

    /// Looks up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A single field of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Field name as it appears in records and GraphQL selections.
    pub name: String,
    /// Structural shape of the field value.
    pub schema: TypeSchema,
}

/// A named enum type with its variants.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// Type name. Must be a valid GraphQL name.
    pub name: String,
    /// Variant names.
    pub variants: Vec<String>,
}

impl EnumSchema {
    /// Creates an enum schema from variant names.
    pub fn new(name: impl Into<String>, variants: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_field_order() {
        let schema = ObjectSchema::new("Cart")
            .field("id", TypeSchema::id())
            .field("items", TypeSchema::list(TypeSchema::string()))
            .field("total", TypeSchema::optional(TypeSchema::float()));

        assert_eq!(schema.name, "Cart");
        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "items", "total"]);
    }

    #[test]
    fn test_get_field() {
        let schema = ObjectSchema::new("Cart").field("id", TypeSchema::id());
        assert!(schema.get_field("id").is_some());
        assert!(schema.get_field("missing").is_none());
    }

    #[test]
    fn test_optional_detection() {
        assert!(TypeSchema::optional(TypeSchema::int()).is_optional());
        assert!(!TypeSchema::int().is_optional());
    }

    #[test]
    fn test_scalar_graphql_names() {
        assert_eq!(ScalarKind::Id.graphql_name(), "ID");
        assert_eq!(ScalarKind::String.graphql_name(), "String");
        assert_eq!(ScalarKind::Int.graphql_name(), "Int");
        assert_eq!(ScalarKind::Float.graphql_name(), "Float");
        assert_eq!(ScalarKind::Boolean.graphql_name(), "Boolean");
    }
}
