//! Error types for GraphQL operations.
//!
//! Schema-build errors are fatal and surface before any request is served.
//! Protocol-contract errors and downstream failures surface as field-level
//! errors through [`GraphQLError::into_field_error`]; GraphQL's
//! partial-response semantics apply.

use std::fmt;

use async_graphql::ErrorExtensions;
use keel_core::PortError;

/// Errors that can occur during schema generation or field resolution.
#[derive(Debug)]
pub enum GraphQLError {
    /// Schema construction failed.
    SchemaBuildFailed(String),

    /// A declared type carries a field shape the generator cannot express.
    UnsupportedFieldShape {
        /// Declared type that carries the field.
        type_name: String,
        /// Offending field.
        field: String,
        /// Why the shape is unsupported.
        detail: String,
    },

    /// A subscription was opened without a connection id.
    MissingConnectionId,

    /// The resolver context was not attached to the request.
    ContextUnavailable,

    /// An argument did not match the generated schema.
    InvalidArgument(String),

    /// A downstream subsystem failed.
    Downstream(PortError),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::UnsupportedFieldShape {
                type_name,
                field,
                detail,
            } => {
                write!(f, "Unsupported shape for field {type_name}.{field}: {detail}")
            }
            Self::MissingConnectionId => {
                write!(f, "Missing \"connectionID\". It is required for subscriptions")
            }
            Self::ContextUnavailable => {
                write!(f, "Request context not available")
            }
            Self::InvalidArgument(msg) => {
                write!(f, "Invalid argument: {msg}")
            }
            Self::Downstream(err) => {
                write!(f, "{err}")
            }
        }
    }
}

impl std::error::Error for GraphQLError {}

impl From<PortError> for GraphQLError {
    fn from(err: PortError) -> Self {
        Self::Downstream(err)
    }
}

impl GraphQLError {
    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::UnsupportedFieldShape { .. } => "UNSUPPORTED_FIELD_SHAPE",
            Self::MissingConnectionId => "MISSING_CONNECTION_ID",
            Self::ContextUnavailable => "CONTEXT_UNAVAILABLE",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Downstream(err) => err.error_code(),
        }
    }

    /// Converts the error to a field-level GraphQL error with a `code`
    /// extension.
    #[must_use]
    pub fn into_field_error(self) -> async_graphql::Error {
        let code = self.error_code();
        let mut err = async_graphql::Error::new(self.to_string());
        err = err.extend_with(|_, e| e.set("code", code));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GraphQLError::SchemaBuildFailed("x".into()).error_code(),
            "SCHEMA_BUILD_FAILED"
        );
        assert_eq!(
            GraphQLError::MissingConnectionId.error_code(),
            "MISSING_CONNECTION_ID"
        );
        assert_eq!(
            GraphQLError::Downstream(PortError::Rejected("x".into())).error_code(),
            "COMMAND_REJECTED"
        );
    }

    #[test]
    fn test_missing_connection_id_message() {
        let msg = GraphQLError::MissingConnectionId.to_string();
        assert!(msg.contains("connectionID"));
    }

    #[test]
    fn test_unsupported_shape_message() {
        let err = GraphQLError::UnsupportedFieldShape {
            type_name: "Cart".into(),
            field: "total".into(),
            detail: "nested optional".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported shape for field Cart.total: nested optional"
        );
    }

    #[test]
    fn test_into_field_error_keeps_message() {
        let err = GraphQLError::MissingConnectionId.into_field_error();
        assert!(err.message.contains("connectionID"));
    }
}
