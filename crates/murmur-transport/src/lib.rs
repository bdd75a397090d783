// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod backoff;
mod client;
mod rate_limit;
mod server;
mod wire;

pub use backoff::BackoffPolicy;
pub use client::HttpClient;
pub use rate_limit::RateLimiter;
pub use server::GossipServer;
pub use wire::WireMessage;
