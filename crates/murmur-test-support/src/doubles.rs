// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::collections::HashMap;

use async_trait::async_trait;
use murmur_core::{
    Message, MessageStore, NotifyError, Observer, SignError, Signer, StoreError, VerifyError,
    Verifier,
};
use tokio::sync::Mutex;

/// In-memory `MessageStore`, last-write-wins on `insert` (dedup is the
/// Gossiper's job, not the store's).
#[derive(Default)]
pub struct InMemMessageStore(Mutex<HashMap<Vec<u8>, Message>>);

#[async_trait]
impl MessageStore for InMemMessageStore {
    async fn insert(&self, message: Message) -> Result<(), StoreError> {
        self.0.lock().await.insert(message.key.clone(), message);
        Ok(())
    }

    async fn get(&self, key: &[u8]) -> Result<Message, StoreError> {
        Ok(self.0.lock().await.get(key).cloned().unwrap_or_else(Message::none))
    }
}

/// `Signer`/`Verifier` pair that treats every value as self-authenticating:
/// the "signature" is the value itself, and verification checks equality.
/// Useful wherever a test needs a working Signer/Verifier without pulling in
/// real cryptography.
pub struct IdentitySignerVerifier;

#[async_trait]
impl Signer for IdentitySignerVerifier {
    async fn sign(&self, value: &[u8]) -> Result<Vec<u8>, SignError> {
        Ok(value.to_vec())
    }
}

#[async_trait]
impl Verifier for IdentitySignerVerifier {
    async fn verify(&self, value: &[u8], signature: &[u8]) -> Result<(), VerifyError> {
        if value == signature {
            Ok(())
        } else {
            Err(VerifyError::BadSignature)
        }
    }
}

/// An `Observer` that records every notified message, for assertions on
/// notify-once semantics.
#[derive(Default)]
pub struct RecordingObserver(Mutex<Vec<Message>>);

impl RecordingObserver {
    pub async fn notified(&self) -> Vec<Message> {
        self.0.lock().await.clone()
    }
}

#[async_trait]
impl Observer for RecordingObserver {
    async fn notify(&self, message: &Message) -> Result<(), NotifyError> {
        self.0.lock().await.push(message.clone());
        Ok(())
    }
}

/// An `Observer` that always fails, for exercising the
/// notify-fails-Receive-and-suppresses-fan-out path.
pub struct FailingObserver;

#[async_trait]
impl Observer for FailingObserver {
    async fn notify(&self, _message: &Message) -> Result<(), NotifyError> {
        Err(NotifyError::Failed("observer rejected message".into()))
    }
}
