// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use murmur_core::Message;
use serde::{Deserialize, Serialize};

/// JSON wire form of a `Message`. Byte fields are base64 so the body is
/// plain text over the HTTP transport.
#[derive(Serialize, Deserialize)]
pub struct WireMessage {
    nonce: u64,
    key: String,
    value: String,
    signature: String,
}

impl From<&Message> for WireMessage {
    fn from(m: &Message) -> Self {
        Self {
            nonce: m.nonce,
            key: STANDARD.encode(&m.key),
            value: STANDARD.encode(&m.value),
            signature: STANDARD.encode(&m.signature),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("malformed wire message: {0}")]
pub struct WireDecodeError(String);

impl TryFrom<WireMessage> for Message {
    type Error = WireDecodeError;

    fn try_from(w: WireMessage) -> Result<Self, Self::Error> {
        Ok(Message {
            nonce: w.nonce,
            key: STANDARD.decode(&w.key).map_err(|e| WireDecodeError(e.to_string()))?,
            value: STANDARD.decode(&w.value).map_err(|e| WireDecodeError(e.to_string()))?,
            signature: STANDARD
                .decode(&w.signature)
                .map_err(|e| WireDecodeError(e.to_string()))?,
        })
    }
}

/// Request body for originating a new broadcast: just the key/value pair to
/// publish under a freshly assigned nonce. The node signs it locally, so no
/// signature travels over this endpoint.
#[derive(Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub key: String,
    pub value: String,
}

impl BroadcastRequest {
    pub fn decode(self) -> Result<(Vec<u8>, Vec<u8>), WireDecodeError> {
        let key = STANDARD.decode(&self.key).map_err(|e| WireDecodeError(e.to_string()))?;
        let value = STANDARD.decode(&self.value).map_err(|e| WireDecodeError(e.to_string()))?;
        Ok((key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_round_trips_through_wire_form() {
        let original = Message::new(9, "key", "value");
        let wire = WireMessage::from(&original);
        let json = serde_json::to_string(&wire).unwrap();
        let decoded: WireMessage = serde_json::from_str(&json).unwrap();
        let back = Message::try_from(decoded).unwrap();
        assert_eq!(back, original);
    }
}
