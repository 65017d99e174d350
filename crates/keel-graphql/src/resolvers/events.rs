//! Stored-event search queries.

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, Object, ResolverContext, Scalar, TypeRef};
use tracing::debug;

use keel_core::{DynEventReader, EventFilter, EventSearchRequest};

use super::{json_to_graphql, port_error, request_context};
use crate::error::GraphQLError;
use crate::schema::informer::create_field_resolver;

/// Name of the generated event record object type.
pub const EVENT_RECORD_TYPE: &str = "EventRecord";

/// Name of the free-form JSON scalar used for event payloads.
pub const JSON_SCALAR: &str = "JSON";

/// Resolver for the `events(...)` query field.
///
/// At least one of `type` or `entity` must be supplied; time-range-only
/// searches are rejected before any downstream call.
pub struct EventsResolver;

impl EventsResolver {
    pub fn resolve(
        events: DynEventReader,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let events = events.clone();

            FieldFuture::new(async move {
                let request = request_context(&ctx)?;

                let string_arg = |name: &str| -> Result<Option<String>, async_graphql::Error> {
                    match ctx.args.get(name) {
                        Some(value) => Ok(Some(value.string()?.to_string())),
                        None => Ok(None),
                    }
                };

                let filters = EventFilter {
                    type_name: string_arg("type")?,
                    entity: string_arg("entity")?,
                    entity_id: string_arg("entityID")?,
                    from: string_arg("from")?,
                    to: string_arg("to")?,
                };

                if !filters.is_searchable() {
                    return Err(GraphQLError::InvalidArgument(
                        "events query requires an \"entity\" or \"type\" argument".into(),
                    )
                    .into_field_error());
                }

                debug!(
                    event_type = filters.type_name.as_deref(),
                    entity = filters.entity.as_deref(),
                    "Searching stored events"
                );

                let search = EventSearchRequest {
                    request_id: request.request_id,
                    current_user: request.current_user.clone(),
                    filters,
                };

                let records = events.fetch(search).await.map_err(port_error)?;
                let items = records
                    .into_iter()
                    .map(json_to_graphql)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(Value::List(items)))
            })
        }
    }
}

/// Builds the event record object type returned by the `events` field.
pub fn event_record_object() -> Object {
    let required = |name: &str| TypeRef::NonNull(Box::new(TypeRef::named(name)));

    Object::new(EVENT_RECORD_TYPE)
        .field(create_field_resolver("type", required(TypeRef::STRING)))
        .field(create_field_resolver("entity", required(TypeRef::STRING)))
        .field(create_field_resolver("entityID", required(TypeRef::ID)))
        .field(create_field_resolver("requestID", required(TypeRef::ID)))
        .field(create_field_resolver("createdAt", required(TypeRef::STRING)))
        .field(create_field_resolver("value", required(JSON_SCALAR)))
}

/// Builds the free-form JSON scalar for event payloads.
pub fn json_scalar() -> Scalar {
    Scalar::new(JSON_SCALAR)
}
