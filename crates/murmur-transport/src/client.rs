// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use async_trait::async_trait;
use murmur_core::{Address, Client, Message, SendError};
use reqwest::Client as HttpInner;

use crate::backoff::{retry_with_backoff, BackoffPolicy};
use crate::wire::WireMessage;

/// Reference `Client`: dials fresh on every `send` (no persistent
/// connection), POSTing the message as JSON and retrying under a bounded
/// exponential backoff. `Address::value` is the peer's base URL.
pub struct HttpClient {
    http: HttpInner,
    backoff: BackoffPolicy,
}

impl HttpClient {
    pub fn new(backoff: BackoffPolicy) -> Self {
        Self {
            http: HttpInner::new(),
            backoff,
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(BackoffPolicy::default())
    }
}

#[async_trait]
impl Client for HttpClient {
    async fn send(&self, to: &Address, message: &Message) -> Result<(), SendError> {
        let url = format!("{}/messages", to.value);
        let wire = WireMessage::from(message);

        retry_with_backoff(self.backoff, || async {
            let response = self
                .http
                .post(&url)
                .json(&wire)
                .send()
                .await
                .map_err(|e| SendError::Failed(to.value.clone(), e.to_string()))?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(SendError::Failed(
                    to.value.clone(),
                    format!("peer responded {}", response.status()),
                ))
            }
        })
        .await;
        Ok(())
    }
}
