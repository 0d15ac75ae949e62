//! # stream-hub
//!
//! Topic-based publish/subscribe routing hub for market data connections.
//!
//! The hub sits between a set of persistent client connections and a
//! stream of inbound events (market data, account-scoped events). It owns
//! the live mapping between connections and the topics they subscribe to,
//! distinguishes public (instrument-scoped) from private (identity-scoped)
//! topics, and fans inbound events out to the connections currently
//! subscribed to the matching topic.
//!
//! Transport, framing, authentication and event-payload encoding are the
//! embedding application's concern: the hub only sees connections through
//! the [`Connection`] capability trait and event bodies as opaque,
//! already-encoded blobs.
//!
//! ```no_run
//! use std::sync::Arc;
//! use stream_hub::{Event, Hub, SubscribeRequest};
//!
//! # async fn example(connection: Arc<dyn stream_hub::Connection>) -> stream_hub::Result<()> {
//! let hub = Arc::new(Hub::new());
//!
//! // From a connection's read loop:
//! hub.handle_subscribe(&SubscribeRequest {
//!     connection,
//!     streams: vec!["eurusd.trades".into(), "orders".into()],
//! })
//! .await;
//!
//! // From the event-ingestion loop:
//! let event = Event::from_json(
//!     r#"{"scope":"public","stream":"eurusd","type":"trades",
//!         "topic":"eurusd.trades","body":{"px":"1.0832"}}"#,
//! )?;
//! hub.route_message(&event).await;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod message;
pub mod registry;
pub mod routing;
pub mod topic;

pub use connection::{Connection, Identity};
pub use error::{HubError, Result};
pub use message::{Ack, Event};
pub use registry::{RegistryStats, TopicRegistry};
pub use routing::{Hub, SubscribeRequest};
pub use topic::{classify_stream, derive_topic, Scope, StreamClass};
