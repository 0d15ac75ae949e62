//! Connection capability set
//!
//! The hub never owns a transport. It holds non-owning references to
//! connections through the [`Connection`] trait, which the transport layer
//! (WebSocket session, test double) implements. All methods are
//! fire-and-forget from the hub's perspective: delivery failures and
//! connection lifecycle belong to the transport.

use bytes::Bytes;

/// Authenticated identity associated with a connection
///
/// An absent or empty UID means the connection is anonymous and may not
/// hold private subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// User identifier, if authenticated
    pub uid: Option<String>,
}

impl Identity {
    /// Anonymous identity
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Authenticated identity for the given UID
    pub fn user(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
        }
    }

    /// The UID, or `None` when anonymous (absent or empty)
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref().filter(|uid| !uid.is_empty())
    }

    /// Whether this identity is anonymous
    pub fn is_anonymous(&self) -> bool {
        self.uid().is_none()
    }
}

/// Capability set the hub requires from a connection
///
/// Implemented by the production transport session and by test doubles.
/// The hub calls these methods outside of any registry lock, so an
/// implementation is free to be slow without stalling unrelated topics.
pub trait Connection: Send + Sync {
    /// Transport-assigned connection id, stable for the connection's lifetime
    fn id(&self) -> u64;

    /// Deliver a serialized message; fire-and-forget
    fn send(&self, message: Bytes);

    /// Close the connection (invoked by the transport collaborator, not the hub)
    fn close(&self);

    /// Resolve the connection's authenticated identity
    fn auth_identity(&self) -> Identity;

    /// The connection's own ordered view of its accepted subscriptions
    fn current_subscriptions(&self) -> Vec<String>;

    /// Notify the connection layer that a public topic was added
    fn subscribe_public(&self, topic: &str);

    /// Notify the connection layer that a private topic was added
    fn subscribe_private(&self, topic: &str);

    /// Notify the connection layer that a public topic was removed
    fn unsubscribe_public(&self, topic: &str);

    /// Notify the connection layer that a private topic was removed
    fn unsubscribe_private(&self, topic: &str);
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording test double for [`Connection`]

    use std::sync::Mutex;

    use super::*;

    /// Records every call the hub makes, and maintains the subscription
    /// list the way a real transport session would.
    pub struct MockConnection {
        id: u64,
        identity: Identity,
        subscriptions: Mutex<Vec<String>>,
        sent: Mutex<Vec<Bytes>>,
        public_subscribes: Mutex<Vec<String>>,
        private_subscribes: Mutex<Vec<String>>,
        public_unsubscribes: Mutex<Vec<String>>,
        private_unsubscribes: Mutex<Vec<String>>,
    }

    impl MockConnection {
        pub fn anonymous(id: u64) -> Self {
            Self::new(id, Identity::anonymous())
        }

        pub fn authenticated(id: u64, uid: &str) -> Self {
            Self::new(id, Identity::user(uid))
        }

        fn new(id: u64, identity: Identity) -> Self {
            Self {
                id,
                identity,
                subscriptions: Mutex::new(Vec::new()),
                sent: Mutex::new(Vec::new()),
                public_subscribes: Mutex::new(Vec::new()),
                private_subscribes: Mutex::new(Vec::new()),
                public_unsubscribes: Mutex::new(Vec::new()),
                private_unsubscribes: Mutex::new(Vec::new()),
            }
        }

        pub fn sent_messages(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|m| String::from_utf8(m.to_vec()).unwrap())
                .collect()
        }

        pub fn public_subscribe_calls(&self) -> Vec<String> {
            self.public_subscribes.lock().unwrap().clone()
        }

        pub fn private_subscribe_calls(&self) -> Vec<String> {
            self.private_subscribes.lock().unwrap().clone()
        }

        pub fn public_unsubscribe_calls(&self) -> Vec<String> {
            self.public_unsubscribes.lock().unwrap().clone()
        }

        pub fn private_unsubscribe_calls(&self) -> Vec<String> {
            self.private_unsubscribes.lock().unwrap().clone()
        }
    }

    impl Connection for MockConnection {
        fn id(&self) -> u64 {
            self.id
        }

        fn send(&self, message: Bytes) {
            self.sent.lock().unwrap().push(message);
        }

        fn close(&self) {}

        fn auth_identity(&self) -> Identity {
            self.identity.clone()
        }

        fn current_subscriptions(&self) -> Vec<String> {
            self.subscriptions.lock().unwrap().clone()
        }

        fn subscribe_public(&self, topic: &str) {
            self.public_subscribes.lock().unwrap().push(topic.into());
            self.subscriptions.lock().unwrap().push(topic.into());
        }

        fn subscribe_private(&self, topic: &str) {
            self.private_subscribes.lock().unwrap().push(topic.into());
            self.subscriptions.lock().unwrap().push(topic.into());
        }

        fn unsubscribe_public(&self, topic: &str) {
            self.public_unsubscribes.lock().unwrap().push(topic.into());
            self.subscriptions.lock().unwrap().retain(|t| t != topic);
        }

        fn unsubscribe_private(&self, topic: &str) {
            self.private_unsubscribes.lock().unwrap().push(topic.into());
            self.subscriptions.lock().unwrap().retain(|t| t != topic);
        }
    }

}
