//! Wire message types
//!
//! Inbound events carry a pre-derived topic and an opaque, already-encoded
//! body; the hub embeds the body verbatim without re-encoding it. Outbound
//! acknowledgements use a fixed `{"success":{...}}` envelope.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{HubError, Result};
use crate::topic::Scope;

/// Inbound event consumed by the router
///
/// The topic is computed once by the event source (see
/// [`derive_topic`](crate::topic::derive_topic)) and carried verbatim so
/// fan-out never recomputes it.
#[derive(Debug, Deserialize)]
pub struct Event {
    /// Visibility scope
    pub scope: Scope,

    /// Stream/instrument identifier
    #[serde(default)]
    pub stream: String,

    /// Event type
    #[serde(rename = "type", default)]
    pub event_type: String,

    /// Pre-derived canonical topic
    pub topic: String,

    /// Opaque, already-encoded payload
    pub body: Box<RawValue>,

    /// Owning identity, required for private scope
    #[serde(default)]
    pub uid: Option<String>,
}

impl Event {
    /// Decode an event from its JSON wire form
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(HubError::MalformedEvent)
    }

    /// Build the delivery envelope `{topic: body}`, serialized once
    ///
    /// The returned `Bytes` is reference-count-cloned per recipient, so a
    /// large payload is not copied per connection.
    pub fn envelope(&self) -> Result<Bytes> {
        let mut entry = BTreeMap::new();
        entry.insert(self.topic.as_str(), &*self.body);
        let buf = serde_json::to_vec(&entry).map_err(HubError::Encode)?;
        Ok(Bytes::from(buf))
    }
}

/// Acknowledgement envelope sent after subscribe/unsubscribe
#[derive(Debug, Serialize)]
pub struct Ack<'a> {
    success: AckBody<'a>,
}

#[derive(Debug, Serialize)]
struct AckBody<'a> {
    message: &'static str,
    streams: &'a [String],
}

impl<'a> Ack<'a> {
    /// Acknowledge a subscribe request
    pub fn subscribed(streams: &'a [String]) -> Self {
        Self {
            success: AckBody {
                message: "subscribed",
                streams,
            },
        }
    }

    /// Acknowledge an unsubscribe request
    pub fn unsubscribed(streams: &'a [String]) -> Self {
        Self {
            success: AckBody {
                message: "unsubscribed",
                streams,
            },
        }
    }

    /// Serialize to the wire form
    pub fn to_bytes(&self) -> Result<Bytes> {
        let buf = serde_json::to_vec(self).map_err(HubError::Encode)?;
        Ok(Bytes::from(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_json() {
        let event = Event::from_json(
            r#"{"scope":"public","stream":"abc","type":"ticker","topic":"abc.ticker","body":{"some":"data"}}"#,
        )
        .unwrap();

        assert_eq!(event.scope, Scope::Public);
        assert_eq!(event.stream, "abc");
        assert_eq!(event.event_type, "ticker");
        assert_eq!(event.topic, "abc.ticker");
        assert!(event.uid.is_none());
    }

    #[test]
    fn test_event_from_json_malformed() {
        let err = Event::from_json("{not json").unwrap_err();
        assert!(matches!(err, HubError::MalformedEvent(_)));
    }

    #[test]
    fn test_envelope_embeds_body_verbatim() {
        let event = Event::from_json(
            r#"{"scope":"public","stream":"abc","type":"ticker","topic":"abc.ticker","body":{"some":"data"}}"#,
        )
        .unwrap();

        let envelope = event.envelope().unwrap();
        assert_eq!(&envelope[..], br#"{"abc.ticker":{"some":"data"}}"#);
    }

    #[test]
    fn test_ack_wire_shape() {
        let streams = vec!["trades".to_string(), "eurusd.updates".to_string()];
        let ack = Ack::subscribed(&streams).to_bytes().unwrap();
        assert_eq!(
            &ack[..],
            br#"{"success":{"message":"subscribed","streams":["trades","eurusd.updates"]}}"#
        );

        let ack = Ack::unsubscribed(&[]).to_bytes().unwrap();
        assert_eq!(
            &ack[..],
            br#"{"success":{"message":"unsubscribed","streams":[]}}"#
        );
    }
}
