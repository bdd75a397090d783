// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod errors;
mod gossiper;
mod message;
mod traits;

pub use errors::*;
pub use gossiper::{Gossiper, FANOUT_TIMEOUT};
pub use message::{Address, Message};
pub use traits::{AddrStore, Client, MessageStore, Observer, PeerSampler, Signer, Verifier};
