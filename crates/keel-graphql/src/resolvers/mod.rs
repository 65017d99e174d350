//! Field resolvers for the generated schema.
//!
//! One resolver struct per generated field family. Each resolver is a
//! factory: `resolve` captures the declared type name and the port handle
//! and returns the closure the dynamic schema stores with the field. The
//! closures convert GraphQL arguments into envelopes, call exactly one
//! port, and convert the result back into GraphQL values.

use std::collections::BTreeMap;

use async_graphql::dynamic::{ResolverContext, ValueAccessor};
use serde_json::Value as JsonValue;

use keel_core::PropertyFilter;

use crate::context::RequestContext;
use crate::error::GraphQLError;

mod command;
mod events;
mod list;
mod read;
mod subscribe;

pub use command::CommandResolver;
pub use events::{EVENT_RECORD_TYPE, EventsResolver, JSON_SCALAR, event_record_object, json_scalar};
pub use list::ListResolver;
pub use read::ReadResolver;
pub use subscribe::SubscribeResolver;

/// Fetches the per-request context attached to the GraphQL request.
pub(crate) fn request_context<'a>(
    ctx: &ResolverContext<'a>,
) -> Result<&'a RequestContext, async_graphql::Error> {
    ctx.data::<RequestContext>()
        .map_err(|_| GraphQLError::ContextUnavailable.into_field_error())
}

/// Converts a JSON record into a GraphQL result value.
pub(crate) fn json_to_graphql(
    value: JsonValue,
) -> Result<async_graphql::Value, async_graphql::Error> {
    async_graphql::Value::from_json(value)
        .map_err(|e| GraphQLError::InvalidArgument(e.to_string()).into_field_error())
}

/// Converts a GraphQL argument value to serde_json::Value.
pub(crate) fn value_accessor_to_json(
    value: &ValueAccessor<'_>,
) -> Result<JsonValue, async_graphql::Error> {
    if value.is_null() {
        return Ok(JsonValue::Null);
    }

    if let Ok(b) = value.boolean() {
        return Ok(JsonValue::Bool(b));
    }

    if let Ok(i) = value.i64() {
        return Ok(JsonValue::Number(i.into()));
    }

    if let Ok(f) = value.f64() {
        return Ok(serde_json::json!(f));
    }

    if let Ok(s) = value.string() {
        return Ok(JsonValue::String(s.to_string()));
    }

    // Enum values come through as their variant name.
    if let Ok(name) = value.enum_name() {
        return Ok(JsonValue::String(name.to_string()));
    }

    if let Ok(list) = value.list() {
        let items: Result<Vec<JsonValue>, async_graphql::Error> =
            list.iter().map(|v| value_accessor_to_json(&v)).collect();
        return Ok(JsonValue::Array(items?));
    }

    if let Ok(obj) = value.object() {
        let mut map = serde_json::Map::new();
        for (k, v) in obj.iter() {
            map.insert(k.to_string(), value_accessor_to_json(&v)?);
        }
        return Ok(JsonValue::Object(map));
    }

    Err(GraphQLError::InvalidArgument("unsupported argument value".into()).into_field_error())
}

/// Parsed arguments shared by the list query and list subscription fields.
#[derive(Debug, Default)]
pub(crate) struct ReadModelRequestArgs {
    pub filters: BTreeMap<String, PropertyFilter>,
    pub limit: Option<u32>,
    pub after_cursor: Option<String>,
}

/// Parses the optional `filter`, `limit` and `afterCursor` arguments.
pub(crate) fn parse_read_model_args(
    ctx: &ResolverContext<'_>,
) -> Result<ReadModelRequestArgs, async_graphql::Error> {
    let mut args = ReadModelRequestArgs::default();

    if let Some(filter) = ctx.args.get("filter") {
        let json = value_accessor_to_json(&filter)?;
        args.filters = serde_json::from_value(json)
            .map_err(|e| GraphQLError::InvalidArgument(format!("filter: {e}")).into_field_error())?;
    }
    if let Some(limit) = ctx.args.get("limit") {
        let value = limit.i64()?;
        let limit = u32::try_from(value).map_err(|_| {
            GraphQLError::InvalidArgument(format!("limit must be non-negative, got {value}"))
                .into_field_error()
        })?;
        args.limit = Some(limit);
    }
    if let Some(cursor) = ctx.args.get("afterCursor") {
        args.after_cursor = Some(cursor.string()?.to_string());
    }

    Ok(args)
}

/// Maps a port failure into a field-level GraphQL error.
pub(crate) fn port_error(err: keel_core::PortError) -> async_graphql::Error {
    GraphQLError::from(err).into_field_error()
}
