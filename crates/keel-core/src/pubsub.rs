//! In-process pub/sub for read-model changes.
//!
//! [`ReadModelBroadcaster`] is a `tokio::sync::broadcast`-backed
//! implementation of the [`ReadModelPubSub`] port. The application runtime
//! publishes the new state of a read model whenever a projection is
//! updated; subscription streams receive the subset matching their request
//! envelope's type name and filters.

use std::sync::Arc;

use async_stream::stream;
use futures_util::stream::BoxStream;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::envelope::ReadModelRequestEnvelope;
use crate::ports::ReadModelPubSub;

/// Maximum number of changes to buffer in the broadcast channel.
const CHANGE_BUFFER_SIZE: usize = 1024;

/// A change notification for a single read-model record.
#[derive(Debug, Clone)]
pub struct ReadModelChange {
    /// Declared read-model type name.
    pub type_name: String,
    /// The new state of the record.
    /// Wrapped in Arc to avoid deep clones through the subscription pipeline.
    pub record: Arc<Value>,
    /// Timestamp of the change.
    pub timestamp: time::OffsetDateTime,
}

impl ReadModelChange {
    /// Creates a change notification for a record.
    pub fn new(type_name: impl Into<String>, record: Value) -> Self {
        Self {
            type_name: type_name.into(),
            record: Arc::new(record),
            timestamp: time::OffsetDateTime::now_utc(),
        }
    }

    /// Returns true if this change matches the envelope's type name and
    /// every field filter.
    ///
    /// A filter on a field the record does not carry only matches when the
    /// filter sets no operators.
    pub fn matches(&self, envelope: &ReadModelRequestEnvelope) -> bool {
        if self.type_name != envelope.type_name {
            return false;
        }
        envelope.filters.iter().all(|(field, filter)| {
            match self.record.get(field) {
                Some(candidate) => filter.matches(candidate),
                None => filter.is_empty(),
            }
        })
    }
}

/// Broadcaster for read-model changes.
///
/// Thread-safe and cheap to clone; one instance is shared between the
/// application runtime (publisher) and all subscription resolvers.
#[derive(Clone)]
pub struct ReadModelBroadcaster {
    sender: broadcast::Sender<ReadModelChange>,
}

impl ReadModelBroadcaster {
    /// Creates a new broadcaster.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANGE_BUFFER_SIZE);
        Self { sender }
    }

    /// Creates a new broadcaster wrapped in an Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Publishes a change to all subscribers.
    ///
    /// Returns the number of subscribers that received it, 0 when there are
    /// no active receivers.
    pub fn publish(&self, change: ReadModelChange) -> usize {
        self.sender.send(change).unwrap_or(0)
    }

    /// Publishes the new state of a read-model record.
    pub fn publish_record(&self, type_name: impl Into<String>, record: Value) -> usize {
        self.publish(ReadModelChange::new(type_name, record))
    }

    /// Subscribes to the raw, unfiltered change feed.
    pub fn subscribe(&self) -> broadcast::Receiver<ReadModelChange> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReadModelBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReadModelBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadModelBroadcaster")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl ReadModelPubSub for ReadModelBroadcaster {
    fn stream(&self, envelope: ReadModelRequestEnvelope) -> BoxStream<'static, Value> {
        let mut receiver = self.subscribe();
        debug!(
            type_name = %envelope.type_name,
            filters = envelope.filters.len(),
            "Opening read-model change stream"
        );

        Box::pin(stream! {
            loop {
                match receiver.recv().await {
                    Ok(change) => {
                        if !change.matches(&envelope) {
                            trace!(
                                change_type = %change.type_name,
                                wanted = %envelope.type_name,
                                "Change filtered out"
                            );
                            continue;
                        }
                        yield (*change.record).clone();
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        warn!(count, "Subscription lagged, some changes were dropped");
                        // Continue receiving.
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Change channel closed");
                        break;
                    }
                }
            }
        })
    }
}
