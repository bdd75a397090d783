// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::Path;

use async_trait::async_trait;
use murmur_core::{AddrStore, Address, StoreError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::sled_db::{SledDb, ADDRESSES_TREE};

#[derive(Serialize, Deserialize)]
struct AddressRecord {
    network: String,
    value: String,
}

impl From<&Address> for AddressRecord {
    fn from(a: &Address) -> Self {
        Self {
            network: a.network.clone(),
            value: a.value.clone(),
        }
    }
}

impl From<AddressRecord> for Address {
    fn from(r: AddressRecord) -> Self {
        Address::new(r.network, r.value)
    }
}

/// Hashes only `Address::value` (not `network`), since insertion is
/// idempotent on `value` alone (spec.md §4.1) — a record is a replacement,
/// never a new entry, whenever `value` repeats.
fn address_key(address: &Address) -> Result<Vec<u8>, StoreError> {
    let json = serde_json::to_vec(&address.value).map_err(|e| StoreError::Write(e.to_string()))?;
    Ok(Sha256::digest(json).to_vec())
}

/// `AddrStore` backed by a sled tree. Address entries are keyed by a SHA-256
/// hash of their JSON form and idempotent by `Address::value`, since two
/// distinct networks for the same value would hash differently but that is
/// acceptable — identity is `value` at the AddrBook layer, not here.
pub struct SledAddrStore {
    db: SledDb,
}

impl SledAddrStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            db: SledDb::open(path, ADDRESSES_TREE)?,
        })
    }
}

#[async_trait]
impl AddrStore for SledAddrStore {
    async fn insert(&self, address: Address) -> Result<(), StoreError> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let key = address_key(&address)?;
            let value =
                serde_json::to_vec(&AddressRecord::from(&address)).map_err(|e| StoreError::Write(e.to_string()))?;
            db.insert(&key, &value)
        })
        .await
        .map_err(|e| StoreError::Write(e.to_string()))?
    }

    async fn list(&self) -> Result<Vec<Address>, StoreError> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            db.iter_values()?
                .into_iter()
                .map(|bytes| {
                    serde_json::from_slice::<AddressRecord>(&bytes)
                        .map(Address::from)
                        .map_err(|e| StoreError::Read(e.to_string()))
                })
                .collect()
        })
        .await
        .map_err(|e| StoreError::Read(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_is_idempotent_on_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledAddrStore::open(&dir.path().join("addrs")).unwrap();

        store.insert(Address::new("tcp", "10.0.1.1:8000")).await.unwrap();
        store.insert(Address::new("tcp", "10.0.1.1:8000")).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn list_returns_all_inserted_addresses() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledAddrStore::open(&dir.path().join("addrs")).unwrap();

        store.insert(Address::new("tcp", "10.0.1.1:8000")).await.unwrap();
        store.insert(Address::new("tcp", "10.0.1.2:8000")).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
