// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("node rejected the broadcast: {0}")]
    Rejected(String),
}

/// Posts `key`/`value` to a running node's `/broadcast` endpoint, which
/// signs and fans the message out on this CLI invocation's behalf.
pub async fn run(node_addr: &str, key: &[u8], value: &[u8]) -> Result<(), BroadcastError> {
    let url = format!("{node_addr}/broadcast");
    let body = serde_json::json!({
        "key": STANDARD.encode(key),
        "value": STANDARD.encode(value),
    });

    let response = reqwest::Client::new().post(&url).json(&body).send().await?;

    if response.status().is_success() {
        let text = response.text().await.unwrap_or_default();
        println!("broadcast accepted: {text}");
        Ok(())
    } else {
        Err(BroadcastError::Rejected(response.status().to_string()))
    }
}
