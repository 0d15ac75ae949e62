//! Topic derivation and stream classification
//!
//! Pure functions mapping heterogeneous stream/type identifiers onto the
//! canonical topic keys the registry is indexed by. No dependency on the
//! registry itself.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Separator qualifying a stream identifier with an instrument
/// (e.g. `eurusd.trades`).
pub const INSTRUMENT_SEPARATOR: char = '.';

/// Suffix of event types carrying a periodic full-state snapshot.
const SNAPSHOT_SUFFIX: &str = "-snap";

/// Suffix of the matching incremental-update event types.
const INCREMENTAL_SUFFIX: &str = "-inc";

/// Visibility scope of a topic or event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Instrument-scoped, open to any connection
    Public,
    /// Identity-scoped, requires an authenticated UID
    Private,
}

/// Classification of a requested stream identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamClass {
    /// Compound `instrument.eventType` form
    Public,
    /// Bare event type, scoped to the requesting identity
    Private,
}

/// Classify a stream identifier by shape
///
/// A stream is public iff it carries the instrument-qualifying separator.
/// Everything else, including malformed identifiers, falls to the private
/// path where it is subject to authentication.
pub fn classify_stream(stream: &str) -> StreamClass {
    if stream.contains(INSTRUMENT_SEPARATOR) {
        StreamClass::Public
    } else {
        StreamClass::Private
    }
}

/// Derive the canonical topic for an event
///
/// Private channels aggregate across instruments, so the stream identifier
/// only participates in public topics.
pub fn derive_topic(scope: Scope, stream: &str, event_type: &str) -> String {
    match scope {
        Scope::Private => canonicalize(event_type).into_owned(),
        Scope::Public => format!(
            "{}{}{}",
            stream,
            INSTRUMENT_SEPARATOR,
            canonicalize(event_type)
        ),
    }
}

/// Merge snapshot event types onto their incremental channel
///
/// A subscriber of the incremental topic receives both the initial
/// snapshot and subsequent updates under one subscription.
fn canonicalize(event_type: &str) -> Cow<'_, str> {
    match event_type.strip_suffix(SNAPSHOT_SUFFIX) {
        Some(base) => Cow::Owned(format!("{}{}", base, INCREMENTAL_SUFFIX)),
        None => Cow::Borrowed(event_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_topic() {
        assert_eq!(derive_topic(Scope::Public, "abc", "count"), "abc.count");
        assert_eq!(derive_topic(Scope::Private, "abc", "count"), "count");
        assert_eq!(
            derive_topic(Scope::Public, "abc", "count-inc"),
            "abc.count-inc"
        );
        assert_eq!(
            derive_topic(Scope::Public, "abc", "count-snap"),
            "abc.count-inc"
        );
    }

    #[test]
    fn test_derive_topic_private_snapshot_merge() {
        assert_eq!(derive_topic(Scope::Private, "abc", "order-snap"), "order-inc");
        assert_eq!(derive_topic(Scope::Private, "abc", "order-inc"), "order-inc");
    }

    #[test]
    fn test_classify_stream() {
        assert_eq!(classify_stream("eurusd.trades"), StreamClass::Public);
        assert_eq!(classify_stream("trades"), StreamClass::Private);
        assert_eq!(classify_stream(""), StreamClass::Private);
        assert_eq!(classify_stream("a.b.c"), StreamClass::Public);
    }

    #[test]
    fn test_scope_wire_form() {
        assert_eq!(serde_json::to_string(&Scope::Public).unwrap(), "\"public\"");
        assert_eq!(
            serde_json::from_str::<Scope>("\"private\"").unwrap(),
            Scope::Private
        );
    }
}
