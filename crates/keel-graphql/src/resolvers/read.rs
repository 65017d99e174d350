//! Single read-model lookup by id.

use std::collections::BTreeMap;

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use serde_json::json;
use tracing::debug;

use keel_core::{DynReadModelReader, PropertyFilter, ReadModelRequestEnvelope};

use super::{json_to_graphql, port_error, request_context};

/// Resolver for the `{ReadModel}(id: ID!)` query field.
///
/// The id argument becomes an implicit equality filter on the `id` field;
/// the first matching record is returned, or null when none match.
pub struct ReadResolver;

impl ReadResolver {
    pub fn resolve(
        type_name: String,
        reader: DynReadModelReader,
        version: u32,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let type_name = type_name.clone();
            let reader = reader.clone();

            FieldFuture::new(async move {
                let request = request_context(&ctx)?;
                let id = ctx.args.try_get("id")?.string()?.to_string();

                debug!(type_name = %type_name, id = %id, "Resolving read model by id");

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

                let records = reader.fetch(envelope).await.map_err(port_error)?;
                match records.into_iter().next() {
                    Some(record) => Ok(Some(json_to_graphql(record)?)),
                    None => Ok(None),
                }
            })
        }
    }
}
