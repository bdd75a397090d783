// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::Path;

use async_trait::async_trait;
use murmur_core::{Message, MessageStore, StoreError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::sled_db::{SledDb, MESSAGES_TREE};

#[derive(Serialize, Deserialize)]
struct MessageRecord {
    nonce: u64,
    key: Vec<u8>,
    value: Vec<u8>,
    signature: Vec<u8>,
}

impl From<&Message> for MessageRecord {
    fn from(m: &Message) -> Self {
        Self {
            nonce: m.nonce,
            key: m.key.clone(),
            value: m.value.clone(),
            signature: m.signature.clone(),
        }
    }
}

impl From<MessageRecord> for Message {
    fn from(r: MessageRecord) -> Self {
        Message {
            nonce: r.nonce,
            key: r.key,
            value: r.value,
            signature: r.signature,
        }
    }
}

fn message_key(key: &[u8]) -> Vec<u8> {
    Sha256::digest(key).to_vec()
}

/// `MessageStore` backed by a sled tree. Message entries are keyed by a
/// SHA-256 hash of `Message::key`; the store itself overwrites unconditionally
/// on every `insert` — last-writer-wins by nonce is a Gossiper policy, not a
/// store invariant (spec.md §3 "MessageStore (durable)").
pub struct SledMessageStore {
    db: SledDb,
}

impl SledMessageStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            db: SledDb::open(path, MESSAGES_TREE)?,
        })
    }
}

#[async_trait]
impl MessageStore for SledMessageStore {
    async fn insert(&self, message: Message) -> Result<(), StoreError> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let key = message_key(&message.key);
            let value =
                serde_json::to_vec(&MessageRecord::from(&message)).map_err(|e| StoreError::Write(e.to_string()))?;
            db.insert(&key, &value)
        })
        .await
        .map_err(|e| StoreError::Write(e.to_string()))?
    }

    async fn get(&self, key: &[u8]) -> Result<Message, StoreError> {
        let db = self.db.clone();
        let key = key.to_vec();
        tokio::task::spawn_blocking(move || {
            let hashed = message_key(&key);
            match db.get(&hashed)? {
                Some(bytes) => serde_json::from_slice::<MessageRecord>(&bytes)
                    .map(Message::from)
                    .map_err(|e| StoreError::Read(e.to_string())),
                None => Ok(Message::none()),
            }
        })
        .await
        .map_err(|e| StoreError::Read(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_returns_zero_valued_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledMessageStore::open(&dir.path().join("msgs")).unwrap();

        let got = store.get(b"unknown").await.unwrap();
        assert_eq!(got.nonce, 0);
        assert!(got.value.is_empty());
    }

    #[tokio::test]
    async fn insert_overwrites_unconditionally() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledMessageStore::open(&dir.path().join("msgs")).unwrap();

        store.insert(Message::new(9, "x", "high")).await.unwrap();
        store.insert(Message::new(1, "x", "low")).await.unwrap();

        let got = store.get(b"x").await.unwrap();
        assert_eq!(got.nonce, 1);
        assert_eq!(got.value, b"low");
    }
}
