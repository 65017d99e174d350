//! Application configuration and the declared-type registry.
//!
//! [`AppConfig`] is built once during application bootstrap and is
//! read-only afterwards. It carries the registry of declared command and
//! read-model descriptors that the GraphQL layer walks when synthesizing
//! the schema.

use std::collections::BTreeMap;

use crate::descriptor::ObjectSchema;

/// Application configuration.
///
/// Registries are ordered maps so generated schemas are deterministic
/// across processes.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application name, used for logging and diagnostics.
    pub app_name: String,
    /// Schema version stamped into every envelope.
    pub schema_version: u32,
    /// Declared read-model types by name.
    pub read_models: BTreeMap<String, ObjectSchema>,
    /// Declared command types by name.
    pub commands: BTreeMap<String, ObjectSchema>,
}

impl AppConfig {
    /// Creates an empty configuration for an application.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            schema_version: 1,
            read_models: BTreeMap::new(),
            commands: BTreeMap::new(),
        }
    }

    /// Registers a read-model descriptor, keyed by its type name.
    ///
    /// Registering the same name twice replaces the earlier descriptor.
    pub fn register_read_model(&mut self, schema: ObjectSchema) -> &mut Self {
        self.read_models.insert(schema.name.clone(), schema);
        self
    }

    /// Registers a command descriptor, keyed by its type name.
    pub fn register_command(&mut self, schema: ObjectSchema) -> &mut Self {
        self.commands.insert(schema.name.clone(), schema);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeSchema;

    #[test]
    fn test_defaults() {
        let config = AppConfig::new("shop");
        assert_eq!(config.app_name, "shop");
        assert_eq!(config.schema_version, 1);
        assert!(config.read_models.is_empty());
        assert!(config.commands.is_empty());
    }

    #[test]
    fn test_registration_is_keyed_by_type_name() {
        let mut config = AppConfig::new("shop");
        config.register_read_model(ObjectSchema::new("Cart").field("id", TypeSchema::id()));
        config.register_command(ObjectSchema::new("ChangeCart").field("cartId", TypeSchema::id()));

        assert!(config.read_models.contains_key("Cart"));
        assert!(config.commands.contains_key("ChangeCart"));

        // Re-registering replaces the descriptor.
        config.register_read_model(
            ObjectSchema::new("Cart")
                .field("id", TypeSchema::id())
                .field("total", TypeSchema::float()),
        );
        assert_eq!(config.read_models["Cart"].fields.len(), 2);
    }
}
