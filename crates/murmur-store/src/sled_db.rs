// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use murmur_core::StoreError;
use once_cell::sync::Lazy;
use sled::{Db, Tree};

/// The two logically disjoint keyspaces of spec.md §6, realised as sled's
/// own named trees rather than a hand-rolled 8-byte byte-prefix scheme.
pub const ADDRESSES_TREE: &str = "addresses";
pub const MESSAGES_TREE: &str = "messages";

// One sled::Db handle per on-disk path, shared across whichever trees are
// opened against it, since sled locks the database file for the process that
// opened it.
static SLED_CACHE: Lazy<Mutex<HashMap<String, Db>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn canonical_key(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

fn get_or_open_db(path: &Path) -> Result<Db, StoreError> {
    let key = canonical_key(path);
    let mut cache = SLED_CACHE.lock().unwrap();
    if let Some(db) = cache.get(&key) {
        return Ok(db.clone());
    }
    let db = sled::open(path).map_err(|e| StoreError::Read(e.to_string()))?;
    cache.insert(key, db.clone());
    Ok(db)
}

/// A single named tree within a shared on-disk sled database.
#[derive(Clone)]
pub struct SledDb {
    tree: Tree,
}

impl SledDb {
    pub fn open(path: &Path, tree: &str) -> Result<Self, StoreError> {
        let db = get_or_open_db(path)?;
        let tree = db
            .open_tree(tree)
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(Self { tree })
    }

    pub fn insert(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.tree
            .insert(key, value)
            .map(|_| ())
            .map_err(|e| StoreError::Write(e.to_string()))
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.tree
            .get(key)
            .map(|opt| opt.map(|v| v.to_vec()))
            .map_err(|e| StoreError::Read(e.to_string()))
    }

    pub fn iter_values(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        self.tree
            .iter()
            .values()
            .map(|r| r.map(|v| v.to_vec()).map_err(|e| StoreError::Read(e.to_string())))
            .collect()
    }
}

/// A handle on an `Arc<SledDb>`, so stores can be cheaply cloned across
/// async tasks without re-opening the tree.
pub type SharedSledDb = Arc<SledDb>;
