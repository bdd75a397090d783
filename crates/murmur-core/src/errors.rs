// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use thiserror::Error;

/// Signature check failed. Fatal for the affected `receive`; the message is dropped.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("signature verification failed")]
    BadSignature,
    #[error("verifier backend error: {0}")]
    Backend(String),
}

/// A durable read or write failed. Fatal for the affected call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store read failed: {0}")]
    Read(String),
    #[error("store write failed: {0}")]
    Write(String),
}

/// Signing failed during `broadcast`.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("signer backend error: {0}")]
    Backend(String),
}

/// Per-peer delivery failed. Logged and swallowed by the fan-out task; never
/// surfaced to `receive`/`broadcast` callers.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("send to {0} timed out")]
    Timeout(String),
    #[error("send to {0} failed: {1}")]
    Failed(String, String),
}

/// The observer rejected a newly accepted message. Surfaced; suppresses fan-out.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("observer failed: {0}")]
    Failed(String),
}

/// AddrBook sampling failed due to the underlying store.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample failed: {0}")]
    Failed(String),
}

/// Errors surfaced synchronously from `Gossiper::receive`.
#[derive(Debug, Error)]
pub enum ReceiveError {
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Errors surfaced synchronously from `Gossiper::broadcast`.
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error(transparent)]
    Sign(#[from] SignError),
}
