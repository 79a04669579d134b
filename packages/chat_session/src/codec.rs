//! Wire protocol codec.
//!
//! Every frame is a JSON text frame `{"type": ..., "data": {...}}`:
//!
//! ```text
//! {"type":"register",  "data":{"id":"<identity>"}}
//! {"type":"heartBeat", "data":{"id":"<identity>"}}
//! {"type":"message",   "data":{"sender":"<identity>","text":"<text>"}}
//! ```
//!
//! Unknown fields are ignored. A missing required field fails the frame.

use serde::Deserialize;
use serde_json::json;

use crate::error::DecodeError;
use crate::identity::Identity;

/// A protocol message. Carries no reference to the connection it came from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Message {
    #[serde(rename = "register")]
    Register { id: Identity },
    #[serde(rename = "heartBeat")]
    Heartbeat { id: Identity },
    #[serde(rename = "message")]
    Chat { sender: Identity, text: String },
}

impl Message {
    /// The `type` discriminator written for this message.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Register { .. } => "register",
            Message::Heartbeat { .. } => "heartBeat",
            Message::Chat { .. } => "message",
        }
    }
}

/// Chat payload as the peer relays it: the `data` object without an envelope.
#[derive(Deserialize)]
struct RelayedChat {
    sender: Identity,
    text: String,
}

pub fn encode(msg: &Message) -> String {
    let data = match msg {
        Message::Register { id } | Message::Heartbeat { id } => json!({ "id": id.as_str() }),
        Message::Chat { sender, text } => json!({ "sender": sender.as_str(), "text": text }),
    };
    json!({ "type": msg.kind(), "data": data }).to_string()
}

pub fn decode(frame: &str) -> Result<Message, DecodeError> {
    serde_json::from_str(frame).map_err(|e| DecodeError::MalformedFrame(e.to_string()))
}

/// Decode a frame received from the peer.
///
/// Besides enveloped frames this accepts the bare `{"sender","text"}` object
/// the relay writes when it fans a chat message out to every socket.
pub fn decode_inbound(frame: &str) -> Result<Message, DecodeError> {
    match decode(frame) {
        Ok(msg) => Ok(msg),
        Err(envelope_err) => match serde_json::from_str::<RelayedChat>(frame) {
            Ok(RelayedChat { sender, text }) => Ok(Message::Chat { sender, text }),
            Err(_) => Err(envelope_err),
        },
    }
}
