// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod address_store;
mod message_store;
mod sled_db;

pub use address_store::SledAddrStore;
pub use message_store::SledMessageStore;
pub use sled_db::{SharedSledDb, SledDb, ADDRESSES_TREE, MESSAGES_TREE};
