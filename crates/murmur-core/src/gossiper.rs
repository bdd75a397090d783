// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::errors::{BroadcastError, ReceiveError};
use crate::message::{Address, Message};
use crate::traits::{Client, MessageStore, Observer, PeerSampler, Signer, Verifier};

/// Fan-out sends are detached from the caller's request and bounded by this
/// timeout, so a slow or unreachable peer cannot hold the ingress path open.
pub const FANOUT_TIMEOUT: Duration = Duration::from_secs(60);

/// Serializes the "read previous / compare nonce / write" triple per key, so
/// two concurrent `receive` calls for the same key cannot both observe the
/// stale `prev` and both decide to write (see spec.md §5, §9 "Per-key write
/// serialisation"). A plain key-level lock table; entries are never evicted,
/// which is acceptable for the cardinality of keys a gossip network carries.
#[derive(Default)]
struct KeyLocks {
    table: Mutex<HashMap<Vec<u8>, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    async fn lock(&self, key: &[u8]) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().await;
            table.entry(key.to_vec()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// The gossip state machine: verify → dedup → persist → notify → fan-out.
///
/// Polymorphic over its five capability sets via trait objects, so test
/// doubles and the reference sled/HTTP adapters are interchangeable without
/// the Gossiper itself changing (spec.md §9 "Interface abstraction").
pub struct Gossiper {
    store: Arc<dyn MessageStore>,
    sampler: Arc<dyn PeerSampler>,
    client: Arc<dyn Client>,
    verifier: Arc<dyn Verifier>,
    signer: Arc<dyn Signer>,
    observer: Option<Arc<dyn Observer>>,
    alpha: usize,
    key_locks: KeyLocks,
}

impl Gossiper {
    pub fn new(
        store: Arc<dyn MessageStore>,
        sampler: Arc<dyn PeerSampler>,
        client: Arc<dyn Client>,
        verifier: Arc<dyn Verifier>,
        signer: Arc<dyn Signer>,
        observer: Option<Arc<dyn Observer>>,
        alpha: usize,
    ) -> Self {
        Self {
            store,
            sampler,
            client,
            verifier,
            signer,
            observer,
            alpha,
            key_locks: KeyLocks::default(),
        }
    }

    /// Ingress entry point. Verifies, dedups by `(key, nonce)`, persists on
    /// accept, notifies the observer, and launches background fan-out.
    /// Returns once the synchronous portion completes — fan-out is detached.
    pub async fn receive(&self, message: Message) -> Result<(), ReceiveError> {
        self.verifier.verify(&message.value, &message.signature).await?;

        let guard = self.key_locks.lock(&message.key).await;
        let prev = self.store.get(&message.key).await?;

        if message.nonce <= prev.nonce {
            debug!(nonce = message.nonce, prev = prev.nonce, "stale message dropped");
            return Ok(());
        }

        self.store.insert(message.clone()).await?;
        drop(guard);

        if let Some(observer) = &self.observer {
            observer.notify(&message).await?;
        }

        self.spawn_fanout(message);
        Ok(())
    }

    /// Origin-side entry point. Signs `value`, overwriting any caller-supplied
    /// `signature`, then launches background fan-out. Does not call `receive`
    /// on itself — the origin's own store does not reflect its own broadcast
    /// unless it later hears the message back from a peer (spec.md §9 OQ2).
    pub async fn broadcast(&self, mut message: Message) -> Result<(), BroadcastError> {
        message.signature = self.signer.sign(&message.value).await?;
        self.spawn_fanout(message);
        Ok(())
    }

    fn spawn_fanout(&self, message: Message) {
        let sampler = self.sampler.clone();
        let client = self.client.clone();
        let alpha = self.alpha;
        tokio::spawn(async move {
            let addrs = match sampler.sample(alpha).await {
                Ok(addrs) => addrs,
                Err(e) => {
                    error!(error = %e, "fan-out sampling failed");
                    return;
                }
            };
            info!(count = addrs.len(), nonce = message.nonce, "fan-out starting");
            let sends = addrs.into_iter().map(|addr| {
                let client = client.clone();
                let message = message.clone();
                async move { send_one(&*client, addr, &message).await }
            });
            join_all(sends).await;
        });
    }
}

async fn send_one(client: &dyn Client, addr: Address, message: &Message) {
    match tokio::time::timeout(FANOUT_TIMEOUT, client.send(&addr, message)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(peer = %addr.value, error = %e, "fan-out send failed"),
        Err(_) => warn!(peer = %addr.value, "fan-out send timed out"),
    }
}
