// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use async_trait::async_trait;

use crate::errors::{NotifyError, SampleError, SendError, SignError, StoreError, VerifyError};
use crate::message::{Address, Message};

/// Durable map `key -> latest Message`. Write-on-higher-nonce is a policy of
/// the Gossiper, not of the store — `insert` always overwrites.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, message: Message) -> Result<(), StoreError>;

    /// Returns the stored Message, or `Message::none()` (nonce = 0) when no
    /// entry exists for `key`. A missing key is not an error.
    async fn get(&self, key: &[u8]) -> Result<Message, StoreError>;
}

/// Durable set of peer addresses, keyed by `Address::value`.
#[async_trait]
pub trait AddrStore: Send + Sync {
    async fn insert(&self, address: Address) -> Result<(), StoreError>;

    /// All stored addresses, in unspecified order.
    async fn list(&self) -> Result<Vec<Address>, StoreError>;
}

/// Produces the signature over a message's `value`.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, value: &[u8]) -> Result<Vec<u8>, SignError>;
}

/// Authenticates a `value`/`signature` pair.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, value: &[u8], signature: &[u8]) -> Result<(), VerifyError>;
}

/// Best-effort single-delivery of a Message to one Address.
#[async_trait]
pub trait Client: Send + Sync {
    async fn send(&self, to: &Address, message: &Message) -> Result<(), SendError>;
}

/// Upcall invoked synchronously inside `receive`, once per newly accepted
/// Message, after the store write and before fan-out.
#[async_trait]
pub trait Observer: Send + Sync {
    async fn notify(&self, message: &Message) -> Result<(), NotifyError>;
}

/// Amortised O(α) uniform-random sample of known peer addresses. Implemented
/// by `murmur-addrbook`'s `AddrBook`, consumed here so `murmur-core` does not
/// depend on a concrete address-book implementation.
#[async_trait]
pub trait PeerSampler: Send + Sync {
    /// Returns up to `alpha` addresses drawn uniformly at random without
    /// replacement. If `alpha` exceeds membership, returns the full
    /// membership. No duplicate `Address::value` within a single call.
    async fn sample(&self, alpha: usize) -> Result<Vec<Address>, SampleError>;
}
