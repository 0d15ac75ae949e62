//! Subscription registry implementation
//!
//! The central registry mapping topics to subscriber sets. Mutated by the
//! command processor, read by the event router, concurrently from many
//! connections' request paths.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::connection::Connection;

/// Subscriber set for one topic, keyed by connection id
///
/// Keying by id makes insert and remove idempotent: a connection can
/// appear at most once per topic.
type Subscribers = HashMap<u64, Arc<dyn Connection>>;

/// Central registry of public and private topic subscriptions
///
/// Thread-safe via `RwLock`. The event router's lookups take read locks
/// and clone the recipient handles out, so fan-out I/O never runs under
/// a lock held by this registry.
pub struct TopicRegistry {
    /// Public topic → subscriber set
    public: RwLock<HashMap<String, Subscribers>>,

    /// UID → private topic → subscriber set
    private: RwLock<HashMap<String, HashMap<String, Subscribers>>>,
}

impl TopicRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            public: RwLock::new(HashMap::new()),
            private: RwLock::new(HashMap::new()),
        }
    }

    /// Add a connection to a public topic, creating the entry if absent
    ///
    /// Returns whether the connection was newly added.
    pub async fn add_public(&self, topic: &str, conn: Arc<dyn Connection>) -> bool {
        let conn_id = conn.id();
        let mut public = self.public.write().await;

        let subscribers = public.entry(topic.to_string()).or_default();
        let added = subscribers.insert(conn_id, conn).is_none();

        if added {
            tracing::debug!(
                topic = %topic,
                conn_id = conn_id,
                subscribers = subscribers.len(),
                "Public subscriber added"
            );
        }

        added
    }

    /// Remove a connection from a public topic
    ///
    /// The topic entry is deleted the instant its subscriber set empties.
    /// Returns whether the connection was actually removed.
    pub async fn remove_public(&self, topic: &str, conn_id: u64) -> bool {
        let mut public = self.public.write().await;

        let Some(subscribers) = public.get_mut(topic) else {
            return false;
        };

        let removed = subscribers.remove(&conn_id).is_some();
        if subscribers.is_empty() {
            public.remove(topic);
            tracing::debug!(topic = %topic, "Public topic pruned");
        }

        if removed {
            tracing::debug!(topic = %topic, conn_id = conn_id, "Public subscriber removed");
        }

        removed
    }

    /// Add a connection to a private (uid, topic) entry
    ///
    /// Returns whether the connection was newly added.
    pub async fn add_private(&self, uid: &str, topic: &str, conn: Arc<dyn Connection>) -> bool {
        let conn_id = conn.id();
        let mut private = self.private.write().await;

        let subscribers = private
            .entry(uid.to_string())
            .or_default()
            .entry(topic.to_string())
            .or_default();
        let added = subscribers.insert(conn_id, conn).is_none();

        if added {
            tracing::debug!(
                uid = %uid,
                topic = %topic,
                conn_id = conn_id,
                subscribers = subscribers.len(),
                "Private subscriber added"
            );
        }

        added
    }

    /// Remove a connection from a private (uid, topic) entry
    ///
    /// Prunes the inner topic entry and then the outer uid entry when they
    /// empty. Returns whether the connection was actually removed.
    pub async fn remove_private(&self, uid: &str, topic: &str, conn_id: u64) -> bool {
        let mut private = self.private.write().await;

        let Some(topics) = private.get_mut(uid) else {
            return false;
        };
        let Some(subscribers) = topics.get_mut(topic) else {
            return false;
        };

        let removed = subscribers.remove(&conn_id).is_some();
        if subscribers.is_empty() {
            topics.remove(topic);
        }
        if topics.is_empty() {
            private.remove(uid);
            tracing::debug!(uid = %uid, "Private uid entry pruned");
        }

        if removed {
            tracing::debug!(uid = %uid, topic = %topic, conn_id = conn_id, "Private subscriber removed");
        }

        removed
    }

    /// Current subscribers of a public topic
    ///
    /// Returns an empty vec (never an error) for an unknown topic. The
    /// handles are cloned out so callers can send without holding the
    /// registry lock.
    pub async fn public_subscribers(&self, topic: &str) -> Vec<Arc<dyn Connection>> {
        let public = self.public.read().await;

        public
            .get(topic)
            .map(|subscribers| subscribers.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Current subscribers of a private (uid, topic) entry
    pub async fn private_subscribers(&self, uid: &str, topic: &str) -> Vec<Arc<dyn Connection>> {
        let private = self.private.read().await;

        private
            .get(uid)
            .and_then(|topics| topics.get(topic))
            .map(|subscribers| subscribers.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove a connection from every entry it appears in
    ///
    /// Disconnect cleanup hook for the transport collaborator. Prunes
    /// every entry emptied by the removal.
    pub async fn purge_connection(&self, conn_id: u64) {
        {
            let mut public = self.public.write().await;
            public.retain(|_, subscribers| {
                subscribers.remove(&conn_id);
                !subscribers.is_empty()
            });
        }

        {
            let mut private = self.private.write().await;
            private.retain(|_, topics| {
                topics.retain(|_, subscribers| {
                    subscribers.remove(&conn_id);
                    !subscribers.is_empty()
                });
                !topics.is_empty()
            });
        }

        tracing::debug!(conn_id = conn_id, "Connection purged from registry");
    }

    /// Number of distinct private topics held by a uid
    pub async fn private_topic_count(&self, uid: &str) -> usize {
        let private = self.private.read().await;
        private.get(uid).map(|topics| topics.len()).unwrap_or(0)
    }

    /// Snapshot of registry-level counts for diagnostics
    pub async fn stats(&self) -> RegistryStats {
        RegistryStats {
            public_topics: self.public.read().await.len(),
            private_uids: self.private.read().await.len(),
        }
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry-level counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of public topics with at least one subscriber
    pub public_topics: usize,
    /// Number of uids with at least one private topic
    pub private_uids: usize,
}
