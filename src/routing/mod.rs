//! Command processing and event routing
//!
//! The [`Hub`] ties the pieces together: subscribe/unsubscribe requests
//! from connections mutate the registry and are acknowledged; inbound
//! events are fanned out to the matching subscriber set.

pub mod hub;

pub use hub::{Hub, SubscribeRequest};
