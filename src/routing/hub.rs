//! Pub/sub hub
//!
//! Command processor for connection subscribe/unsubscribe requests and
//! router for inbound events. Both paths share the [`TopicRegistry`];
//! connection callbacks and sends always run outside its locks.

use std::sync::Arc;

use crate::connection::Connection;
use crate::message::{Ack, Event};
use crate::registry::TopicRegistry;
use crate::topic::{classify_stream, Scope, StreamClass};

/// A connection's subscribe or unsubscribe request
///
/// Streams are the raw identifiers as requested; classification into
/// public/private happens per stream while processing.
pub struct SubscribeRequest {
    /// The requesting connection
    pub connection: Arc<dyn Connection>,
    /// Requested stream identifiers, in the connection's order
    pub streams: Vec<String>,
}

/// Topic-based pub/sub routing hub
///
/// Cheap to share: clone the `Arc<Hub>` into every connection task and
/// the event-ingestion task.
pub struct Hub {
    registry: Arc<TopicRegistry>,
}

impl Hub {
    /// Create a hub with a fresh registry
    pub fn new() -> Self {
        Self::with_registry(Arc::new(TopicRegistry::new()))
    }

    /// Create a hub over an existing registry
    pub fn with_registry(registry: Arc<TopicRegistry>) -> Self {
        Self { registry }
    }

    /// The underlying registry, for diagnostics
    pub fn registry(&self) -> &Arc<TopicRegistry> {
        &self.registry
    }

    /// Process a subscribe request and acknowledge it
    ///
    /// Each stream is classified independently; a private stream requested
    /// by an anonymous connection is silently dropped, with no registry
    /// entry and no connection callback. The connection-level
    /// `subscribe_*` callback fires only when registry membership actually
    /// changed, making duplicate requests idempotent end to end.
    pub async fn handle_subscribe(&self, req: &SubscribeRequest) {
        let identity = req.connection.auth_identity();

        for stream in &req.streams {
            match classify_stream(stream) {
                StreamClass::Public => {
                    if self
                        .registry
                        .add_public(stream, Arc::clone(&req.connection))
                        .await
                    {
                        req.connection.subscribe_public(stream);
                    }
                }
                StreamClass::Private => {
                    let Some(uid) = identity.uid() else {
                        tracing::debug!(
                            stream = %stream,
                            conn_id = req.connection.id(),
                            "Dropping private subscribe from anonymous connection"
                        );
                        continue;
                    };

                    if self
                        .registry
                        .add_private(uid, stream, Arc::clone(&req.connection))
                        .await
                    {
                        req.connection.subscribe_private(stream);
                    }
                }
            }
        }

        self.acknowledge(&req.connection, true).await;
    }

    /// Process an unsubscribe request and acknowledge it
    ///
    /// Mirrors [`handle_subscribe`](Self::handle_subscribe): private
    /// streams while anonymous are a no-op, removal of a non-member is a
    /// no-op, and callbacks fire only on an actual membership change.
    pub async fn handle_unsubscribe(&self, req: &SubscribeRequest) {
        let identity = req.connection.auth_identity();
        let conn_id = req.connection.id();

        for stream in &req.streams {
            match classify_stream(stream) {
                StreamClass::Public => {
                    if self.registry.remove_public(stream, conn_id).await {
                        req.connection.unsubscribe_public(stream);
                    }
                }
                StreamClass::Private => {
                    let Some(uid) = identity.uid() else {
                        continue;
                    };

                    if self.registry.remove_private(uid, stream, conn_id).await {
                        req.connection.unsubscribe_private(stream);
                    }
                }
            }
        }

        self.acknowledge(&req.connection, false).await;
    }

    /// Fan an inbound event out to its topic's current subscribers
    ///
    /// The envelope is serialized once; each recipient gets a
    /// reference-counted clone. No recipients is not an error. A failure
    /// in one recipient's transport cannot affect the others: `send` is
    /// fire-and-forget and runs outside any registry lock.
    pub async fn route_message(&self, event: &Event) {
        let recipients = match event.scope {
            Scope::Public => self.registry.public_subscribers(&event.topic).await,
            Scope::Private => {
                let Some(uid) = event.uid.as_deref() else {
                    tracing::debug!(
                        topic = %event.topic,
                        "Dropping private event without owning uid"
                    );
                    return;
                };
                self.registry.private_subscribers(uid, &event.topic).await
            }
        };

        if recipients.is_empty() {
            tracing::trace!(topic = %event.topic, "No subscribers, event dropped");
            return;
        }

        let payload = match event.envelope() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(topic = %event.topic, error = %e, "Failed to encode event envelope");
                return;
            }
        };

        tracing::trace!(
            topic = %event.topic,
            recipients = recipients.len(),
            "Routing event"
        );

        for conn in recipients {
            conn.send(payload.clone());
        }
    }

    /// Purge a disconnected connection from every registry entry
    pub async fn purge(&self, conn_id: u64) {
        self.registry.purge_connection(conn_id).await;
    }

    /// Send the post-mutation acknowledgement, built from the
    /// connection's own authoritative subscription list
    async fn acknowledge(&self, conn: &Arc<dyn Connection>, subscribed: bool) {
        let streams = conn.current_subscriptions();
        let ack = if subscribed {
            Ack::subscribed(&streams)
        } else {
            Ack::unsubscribed(&streams)
        };

        match ack.to_bytes() {
            Ok(payload) => conn.send(payload),
            Err(e) => {
                tracing::warn!(conn_id = conn.id(), error = %e, "Failed to encode acknowledgement")
            }
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
