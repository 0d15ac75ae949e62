//! Simple in-process hub demo
//!
//! Run with: cargo run --example simple_hub
//!
//! Wires two toy connections (one anonymous, one authenticated) into a
//! hub, subscribes them to a mix of public and private streams, and routes
//! a few events through. Delivered messages are printed to stdout; set
//! `RUST_LOG=stream_hub=debug` to watch the registry mutations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tracing_subscriber::EnvFilter;

use stream_hub::{Connection, Event, Hub, Identity, Scope, SubscribeRequest};

/// Toy connection that prints everything the hub delivers
struct PrintConnection {
    id: u64,
    name: &'static str,
    identity: Identity,
    subscriptions: Mutex<Vec<String>>,
}

impl PrintConnection {
    fn new(id: u64, name: &'static str, identity: Identity) -> Arc<Self> {
        Arc::new(Self {
            id,
            name,
            identity,
            subscriptions: Mutex::new(Vec::new()),
        })
    }
}

impl Connection for PrintConnection {
    fn id(&self) -> u64 {
        self.id
    }

    fn send(&self, message: Bytes) {
        println!("[{}] <- {}", self.name, String::from_utf8_lossy(&message));
    }

    fn close(&self) {}

    fn auth_identity(&self) -> Identity {
        self.identity.clone()
    }

    fn current_subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().unwrap().clone()
    }

    fn subscribe_public(&self, topic: &str) {
        self.subscriptions.lock().unwrap().push(topic.into());
    }

    fn subscribe_private(&self, topic: &str) {
        self.subscriptions.lock().unwrap().push(topic.into());
    }

    fn unsubscribe_public(&self, topic: &str) {
        self.subscriptions.lock().unwrap().retain(|t| t != topic);
    }

    fn unsubscribe_private(&self, topic: &str) {
        self.subscriptions.lock().unwrap().retain(|t| t != topic);
    }
}

fn public_event(stream: &str, event_type: &str, body: &str) -> Event {
    let topic = stream_hub::derive_topic(Scope::Public, stream, event_type);
    Event::from_json(&format!(
        r#"{{"scope":"public","stream":"{stream}","type":"{event_type}","topic":"{topic}","body":{body}}}"#
    ))
    .unwrap()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let next_id = AtomicU64::new(1);
    let hub = Arc::new(Hub::new());

    let alice = PrintConnection::new(
        next_id.fetch_add(1, Ordering::Relaxed),
        "alice",
        Identity::user("UIDABC00001"),
    );
    let guest = PrintConnection::new(
        next_id.fetch_add(1, Ordering::Relaxed),
        "guest",
        Identity::anonymous(),
    );

    // Alice holds a private topic and a public one; the guest's private
    // request is silently dropped.
    hub.handle_subscribe(&SubscribeRequest {
        connection: Arc::clone(&alice) as Arc<dyn Connection>,
        streams: vec![
            "orders".into(),
            "eurusd.trades".into(),
            "eurusd.book-inc".into(),
        ],
    })
    .await;
    hub.handle_subscribe(&SubscribeRequest {
        connection: Arc::clone(&guest) as Arc<dyn Connection>,
        streams: vec!["orders".into(), "eurusd.trades".into(), "eurusd.book-inc".into()],
    })
    .await;

    // Public fan-out reaches both; the snapshot event lands on the
    // incremental topic.
    hub.route_message(&public_event("eurusd", "trades", r#"[{"px":"1.0832","qty":"2.0"}]"#))
        .await;
    hub.route_message(&public_event("eurusd", "book-snap", r#"{"bids":[],"asks":[]}"#))
        .await;

    // Private event only reaches Alice.
    let order = Event::from_json(
        r#"{"scope":"private","type":"orders","topic":"orders","body":{"id":7,"state":"done"},"uid":"UIDABC00001"}"#,
    )
    .unwrap();
    hub.route_message(&order).await;

    let stats = hub.registry().stats().await;
    println!(
        "registry: {} public topics, {} private uids",
        stats.public_topics, stats.private_uids
    );
}
