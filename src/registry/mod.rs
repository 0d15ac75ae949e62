//! Subscription registry
//!
//! The shared state at the center of the hub: which connections are
//! subscribed to which topics. Public topics are keyed by topic alone;
//! private topics are keyed by (uid, topic) so a private event only ever
//! reaches its owning identity's connections.
//!
//! # Architecture
//!
//! ```text
//!                       Arc<TopicRegistry>
//!              ┌───────────────────────────────────┐
//!              │ public:  topic → {conn_id → conn} │
//!              │ private: uid → topic              │
//!              │            → {conn_id → conn}     │
//!              └───────────────┬───────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          │                   │                   │
//!          ▼                   ▼                   ▼
//!    [Connection A]      [Connection B]      [Event ingestion]
//!    handle_subscribe    handle_unsubscribe  route_message
//! ```
//!
//! Entries are created lazily on first subscribe and pruned the instant
//! they empty, so the maps never hold topic keys without subscribers or
//! uids without topics.

pub mod store;

pub use store::{RegistryStats, TopicRegistry};
