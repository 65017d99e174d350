//! Filtered read-model list queries.

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::debug;

use keel_core::{DynReadModelReader, ReadModelRequestEnvelope};

use super::{json_to_graphql, parse_read_model_args, port_error, request_context};
use crate::naming::{self, FieldKind};

/// Resolver for the `List{ReadModels}(filter, limit, afterCursor)` query
/// field.
///
/// Whether the request is paginated is detected from the invoked field's
/// name, so the same resolver can back both naming conventions.
pub struct ListResolver;

impl ListResolver {
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
                let args = parse_read_model_args(&ctx)?;
                let paginated =
                    ctx.field().name() == naming::field_name(&type_name, FieldKind::List);

                debug!(
                    type_name = %type_name,
                    filters = args.filters.len(),
                    paginated,
                    "Resolving read model list"
                );

                let envelope = ReadModelRequestEnvelope {
                    request_id: request.request_id,
                    current_user: request.current_user.clone(),
                    type_name,
                    filters: args.filters,
                    limit: args.limit,
                    after_cursor: args.after_cursor,
                    paginated,
                    version,
                };

                let records = reader.fetch(envelope).await.map_err(port_error)?;
                let items = records
                    .into_iter()
                    .map(json_to_graphql)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(Value::List(items)))
            })
        }
    }
}
