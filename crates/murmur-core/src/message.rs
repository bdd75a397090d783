// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

/// The unit of dissemination: `(nonce, key, value, signature)`.
///
/// `nonce` versions `key`; a higher nonce supersedes a lower one. `signature`
/// authenticates `value` only — not `key` or `nonce` (see DESIGN.md open
/// question OQ1).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub nonce: u64,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Message {
    pub fn new(nonce: u64, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            nonce,
            key: key.into(),
            value: value.into(),
            signature: Vec::new(),
        }
    }

    /// The zero-valued Message a `MessageStore::get` returns for an unknown key.
    /// `nonce == 0` is reserved for "no prior message" and is therefore never
    /// itself accepted by the dedup predicate (see `Gossiper::receive`).
    pub fn none() -> Self {
        Self::default()
    }
}

/// A peer network endpoint, opaque to the core beyond `value`'s identity role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub network: String,
    pub value: String,
}

impl Address {
    pub fn new(network: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            value: value.into(),
        }
    }
}
