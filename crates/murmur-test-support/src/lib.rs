// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod doubles;
mod network;

pub use doubles::{FailingObserver, IdentitySignerVerifier, InMemMessageStore, RecordingObserver};
pub use network::{GossipNetwork, GossipNetworkBuilder};
