use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::topics;

/// Quality of service for all monitor traffic (exactly-once delivery).
pub const QOS_EXACTLY_ONCE: u8 = 2;

/// Wire envelope exchanged with the message bus.
///
/// Payloads are JSON.  `qos` and `retained` are delivery hints for the
/// transport; inbound messages may omit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Routing topic, e.g. [`topics::ALERTS`].
    pub topic: String,

    #[serde(default)]
    pub payload: Value,

    #[serde(default)]
    pub qos: u8,

    /// Ask the broker to keep this as the topic's last known value.
    #[serde(default)]
    pub retained: bool,
}

/// Liveness payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liveness {
    pub id:        String,
    pub connected: bool,
}

impl Message {
    /// Create a message, serializing the payload to JSON.
    pub fn new<T: Serialize>(topic: impl Into<String>, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            topic:    topic.into(),
            payload:  serde_json::to_value(payload)?,
            qos:      QOS_EXACTLY_ONCE,
            retained: false,
        })
    }

    /// Deserialize the payload into the expected type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }

    /// Payload as a bare string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        self.payload.as_str()
    }

    /// Retained `"ON"` / `"OFF"` shift status.
    pub fn shift_status(on: bool) -> Self {
        Self {
            topic:    topics::SHIFT_STATUS.into(),
            payload:  Value::from(if on { "ON" } else { "OFF" }),
            qos:      QOS_EXACTLY_ONCE,
            retained: true,
        }
    }

    /// Circuit-complete notice.  The payload is empty.
    pub fn circuit_complete() -> Self {
        Self {
            topic:    topics::CIRCUIT_COMPLETE.into(),
            payload:  Value::Null,
            qos:      QOS_EXACTLY_ONCE,
            retained: false,
        }
    }

    /// `{id, connected: true}`, published once the client is connected.
    pub fn connected(client_id: &str) -> Result<Self, serde_json::Error> {
        Self::liveness(client_id, true)
    }

    /// `{id, connected: false}`, registered with the transport as the last
    /// will and published on abnormal disconnect.
    pub fn last_will(client_id: &str) -> Result<Self, serde_json::Error> {
        Self::liveness(client_id, false)
    }

    fn liveness(client_id: &str, connected: bool) -> Result<Self, serde_json::Error> {
        Self::new(topics::CONNECTED, &Liveness { id: client_id.to_owned(), connected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_serializes_payload() {
        let msg = Message::new("t", &vec![1, 2]).unwrap();
        assert_eq!(msg.decode::<Vec<u8>>().unwrap(), [1, 2]);
        assert_eq!(msg.qos, QOS_EXACTLY_ONCE);
        assert!(!msg.retained);
    }

    #[test]
    fn shift_status_is_retained() {
        let msg = Message::shift_status(true);
        assert_eq!(msg.as_str(), Some("ON"));
        assert!(msg.retained);
        assert_eq!(Message::shift_status(false).as_str(), Some("OFF"));
    }

    #[test]
    fn last_will_reports_disconnected() {
        let will = Message::last_will("circuit-handler").unwrap();
        assert_eq!(will.topic, topics::CONNECTED);
        let live: Liveness = will.decode().unwrap();
        assert_eq!(live, Liveness { id: "circuit-handler".into(), connected: false });
        assert!(Message::connected("x").unwrap().decode::<Liveness>().unwrap().connected);
    }

    #[test]
    fn inbound_envelope_defaults() {
        let msg: Message = serde_json::from_str(r#"{"topic":"a/b","payload":"ON"}"#).unwrap();
        assert_eq!(msg.qos, 0);
        assert!(!msg.retained);
        assert_eq!(msg.as_str(), Some("ON"));
    }
}
