// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use murmur_core::{Address, AddrStore, PeerSampler, SampleError, StoreError};
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory cache over an `AddrStore`, keyed by `Address::value`. Reads do
/// not block reads; writers are serialised and may be briefly blocked by
/// readers (a `tokio::sync::RwLock`, matching spec.md §4.2/§5).
pub struct AddrBook {
    store: Arc<dyn AddrStore>,
    members: RwLock<HashMap<String, Address>>,
}

impl AddrBook {
    /// Loads the entire address set from `store` into the in-memory index.
    /// Fails if the initial load fails.
    pub async fn construct(store: Arc<dyn AddrStore>) -> Result<Self, StoreError> {
        let addrs = store.list().await?;
        info!(count = addrs.len(), "address book loaded");
        let members = addrs.into_iter().map(|a| (a.value.clone(), a)).collect();
        Ok(Self {
            store,
            members: RwLock::new(members),
        })
    }

    /// Writes to the in-memory index first (overwriting any prior entry with
    /// the same `value`), then writes through to the durable store. On
    /// durable failure the caller receives the error but the in-memory entry
    /// remains, since a peer address is harmless to keep even if it could not
    /// be persisted this time (spec.md §4.2).
    pub async fn insert_addr(&self, address: Address) -> Result<(), StoreError> {
        {
            let mut members = self.members.write().await;
            members.insert(address.value.clone(), address.clone());
        }
        self.store.insert(address).await
    }

    /// Current membership size.
    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }
}

#[async_trait]
impl PeerSampler for AddrBook {
    /// Uniform sample without replacement over a consistent snapshot of the
    /// membership. Uses `rand`'s partial Fisher-Yates (`choose_multiple`)
    /// rather than taking the hash map's iteration order, which would not be
    /// uniform (spec.md §4.2 "Sampling algorithm").
    async fn sample(&self, alpha: usize) -> Result<Vec<Address>, SampleError> {
        let members = self.members.read().await;
        let snapshot: Vec<&Address> = members.values().collect();
        let mut rng = rand::thread_rng();
        Ok(snapshot
            .choose_multiple(&mut rng, alpha)
            .map(|a| (*a).clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as StdHashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemAddrStore(Mutex<StdHashMap<String, Address>>);

    #[async_trait]
    impl AddrStore for InMemAddrStore {
        async fn insert(&self, address: Address) -> Result<(), StoreError> {
            self.0.lock().unwrap().insert(address.value.clone(), address);
            Ok(())
        }

        async fn list(&self) -> Result<Vec<Address>, StoreError> {
            Ok(self.0.lock().unwrap().values().cloned().collect())
        }
    }

    #[tokio::test]
    async fn sample_bound_is_min_alpha_and_membership() {
        let store = Arc::new(InMemAddrStore::default());
        let book = AddrBook::construct(store).await.unwrap();
        for i in 0..2 {
            book.insert_addr(Address::new("tcp", format!("10.0.0.{i}:8000")))
                .await
                .unwrap();
        }

        let sampled = book.sample(5).await.unwrap();
        assert_eq!(sampled.len(), 2);

        let sampled_zero = book.sample(0).await.unwrap();
        assert!(sampled_zero.is_empty());
    }

    #[tokio::test]
    async fn sample_has_no_duplicates_within_a_call() {
        let store = Arc::new(InMemAddrStore::default());
        let book = AddrBook::construct(store).await.unwrap();
        for i in 0..10 {
            book.insert_addr(Address::new("tcp", format!("10.0.0.{i}:8000")))
                .await
                .unwrap();
        }

        let sampled = book.sample(4).await.unwrap();
        assert_eq!(sampled.len(), 4);
        let mut values: Vec<_> = sampled.iter().map(|a| &a.value).collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), 4);
    }

    #[tokio::test]
    async fn insert_addr_is_visible_in_book_and_store() {
        let store = Arc::new(InMemAddrStore::default());
        let book = AddrBook::construct(store.clone()).await.unwrap();
        let addr = Address::new("tcp", "10.0.1.1:8000");

        book.insert_addr(addr.clone()).await.unwrap();

        assert_eq!(book.len().await, 1);
        assert!(store.list().await.unwrap().contains(&addr));
    }

    #[tokio::test]
    async fn sample_frequency_is_roughly_uniform() {
        let store = Arc::new(InMemAddrStore::default());
        let book = AddrBook::construct(store).await.unwrap();
        for i in 0..10 {
            book.insert_addr(Address::new("tcp", format!("10.0.0.{i}:8000")))
                .await
                .unwrap();
        }

        let mut counts = StdHashMap::new();
        let trials = 4000;
        for _ in 0..trials {
            for a in book.sample(3).await.unwrap() {
                *counts.entry(a.value).or_insert(0u32) += 1;
            }
        }

        let expected = trials as f64 * 3.0 / 10.0;
        for (_, count) in counts {
            let ratio = count as f64 / expected;
            assert!((0.7..1.3).contains(&ratio), "ratio {ratio} out of range");
        }
    }
}
