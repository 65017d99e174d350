//! Command submission mutations.

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::debug;

use keel_core::{CommandEnvelope, DynCommandDispatcher};

use super::{port_error, request_context, value_accessor_to_json};

/// Resolver for the `{Command}(input: {Command}Input!)` mutation field.
///
/// A successful dispatch resolves to `true`; the dispatcher carries no
/// result payload, so acceptance is the only thing the field can report.
pub struct CommandResolver;

impl CommandResolver {
    pub fn resolve(
        type_name: String,
        dispatcher: DynCommandDispatcher,
        version: u32,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let type_name = type_name.clone();
            let dispatcher = dispatcher.clone();

            FieldFuture::new(async move {
                let request = request_context(&ctx)?;
                let input = ctx.args.try_get("input")?;
                let value = value_accessor_to_json(&input)?;

                debug!(type_name = %type_name, request_id = %request.request_id, "Dispatching command");

                let envelope = CommandEnvelope {
                    request_id: request.request_id,
                    current_user: request.current_user.clone(),
                    type_name,
                    value,
                    version,
                };

                dispatcher.dispatch_command(envelope).await.map_err(port_error)?;
                Ok(Some(Value::Boolean(true)))
            })
        }
    }
}
