//! Live read-model subscriptions.

use std::collections::BTreeMap;

use async_graphql::dynamic::{ResolverContext, SubscriptionFieldFuture};
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use serde_json::json;
use tracing::debug;

use keel_core::{DynReadModelReader, PropertyFilter, ReadModelRequestEnvelope};

use super::{json_to_graphql, parse_read_model_args, port_error, request_context};
use crate::context::RequestContext;
use crate::error::GraphQLError;

/// Resolver for the `{ReadModel}(id: ID!)` and
/// `List{ReadModels}(filter)` subscription fields.
///
/// Opening a stream requires a transport connection id; without one the
/// subscription is rejected before anything is registered. The
/// registration is persisted through the reader port (unless the context
/// disables storage) and the returned stream is fed by the pub/sub port.
pub struct SubscribeResolver;

impl SubscribeResolver {
    /// Resolver for the single-item subscription field.
    pub fn resolve_by_id(
        type_name: String,
        reader: DynReadModelReader,
        version: u32,
    ) -> impl for<'a> Fn(ResolverContext<'a>) -> SubscriptionFieldFuture<'a> + Send + Sync + 'static
    {
        move |ctx| {
            let type_name = type_name.clone();
            let reader = reader.clone();

            SubscriptionFieldFuture::new(async move {
                let request = request_context(&ctx)?;
                let id = ctx.args.try_get("id")?.string()?.to_string();

                let mut filters = BTreeMap::new();
                filters.insert("id".to_string(), PropertyFilter::equals(json!(id)));

                let envelope = ReadModelRequestEnvelope {
                    request_id: request.request_id,
                    current_user: request.current_user.clone(),
                    type_name,
                    filters,
                    limit: None,
                    after_cursor: None,
                    paginated: false,
                    version,
                };

                open_stream(request, &reader, envelope).await
            })
        }
    }

    /// Resolver for the list subscription field.
    pub fn resolve_list(
        type_name: String,
        reader: DynReadModelReader,
        version: u32,
    ) -> impl for<'a> Fn(ResolverContext<'a>) -> SubscriptionFieldFuture<'a> + Send + Sync + 'static
    {
        move |ctx| {
            let type_name = type_name.clone();
            let reader = reader.clone();

            SubscriptionFieldFuture::new(async move {
                let request = request_context(&ctx)?;
                let args = parse_read_model_args(&ctx)?;

                // Subscription envelopes are never paginated; changes are
                // delivered one state at a time regardless of field name.
                let envelope = ReadModelRequestEnvelope {
                    request_id: request.request_id,
                    current_user: request.current_user.clone(),
                    type_name,
                    filters: args.filters,
                    limit: args.limit,
                    after_cursor: args.after_cursor,
                    paginated: false,
                    version,
                };

                open_stream(request, &reader, envelope).await
            })
        }
    }
}

/// Registers the subscription and opens the live result stream.
async fn open_stream(
    request: &RequestContext,
    reader: &DynReadModelReader,
    envelope: ReadModelRequestEnvelope,
) -> Result<
    BoxStream<'static, Result<async_graphql::Value, async_graphql::Error>>,
    async_graphql::Error,
> {
    let connection_id = match request.connection_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(GraphQLError::MissingConnectionId.into_field_error()),
    };

    debug!(
        type_name = %envelope.type_name,
        connection_id = %connection_id,
        store = request.store_subscriptions,
        "Opening read model subscription"
    );

    if request.store_subscriptions {
        let operation = request.operation.clone().unwrap_or_default();
        reader
            .subscribe(&connection_id, envelope.clone(), operation)
            .await
            .map_err(port_error)?;
    } else {
        debug!(type_name = %envelope.type_name, "Skipping subscription registration");
    }

    Ok(request.pubsub.stream(envelope).map(json_to_graphql).boxed())
}
