// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use murmur_core::{Address, Client, Gossiper, Message, MessageStore, SendError};

use crate::doubles::{IdentitySignerVerifier, InMemMessageStore};

/// Amortised-O(1) `PeerSampler` over a fixed, pre-populated membership —
/// `murmur-test-support` exercises the Gossiper without depending on
/// `murmur-addrbook`, since the harness only needs the sampling contract.
struct FixedSampler {
    addrs: Vec<Address>,
}

#[async_trait]
impl murmur_core::PeerSampler for FixedSampler {
    async fn sample(&self, alpha: usize) -> Result<Vec<Address>, murmur_core::SampleError> {
        use rand::seq::SliceRandom;
        let mut rng = rand::thread_rng();
        Ok(self
            .addrs
            .choose_multiple(&mut rng, alpha)
            .cloned()
            .collect())
    }
}

/// Routes `Client::send` directly to another node's `Gossiper::receive`,
/// in-process, bypassing any real wire protocol. Nodes whose address is in
/// `disabled` are unreachable, simulating a peer that is offline or
/// partitioned.
struct RoutingClient {
    nodes: Arc<RwLock<HashMap<String, Arc<Gossiper>>>>,
    disabled: Arc<HashSet<String>>,
}

#[async_trait]
impl Client for RoutingClient {
    async fn send(&self, to: &Address, message: &Message) -> Result<(), SendError> {
        if self.disabled.contains(&to.value) {
            return Err(SendError::Failed(to.value.clone(), "peer unreachable".into()));
        }
        let gossiper = {
            let nodes = self.nodes.read().unwrap();
            nodes.get(&to.value).cloned()
        };
        match gossiper {
            Some(gossiper) => gossiper
                .receive(message.clone())
                .await
                .map_err(|e| SendError::Failed(to.value.clone(), e.to_string())),
            None => Err(SendError::Failed(to.value.clone(), "unknown peer".into())),
        }
    }
}

/// A simulated gossip network of in-process nodes wired together through
/// `RoutingClient`, for exercising convergence under fan-out and partial
/// node unavailability.
pub struct GossipNetwork {
    pub nodes: Vec<Arc<Gossiper>>,
    pub stores: Vec<Arc<InMemMessageStore>>,
    pub addresses: Vec<Address>,
    pub disabled: HashSet<String>,
}

impl GossipNetwork {
    /// Originates `message` from `origin_index`.
    pub async fn broadcast_from(&self, origin_index: usize, message: Message) {
        self.nodes[origin_index].broadcast(message).await.unwrap();
    }

    /// Fraction of non-disabled nodes whose store holds `key` at exactly
    /// `nonce`, for asserting eventual convergence.
    pub async fn convergence_ratio(&self, key: &[u8], nonce: u64) -> f64 {
        let mut reached = 0usize;
        let mut total = 0usize;
        for (store, address) in self.stores.iter().zip(&self.addresses) {
            if self.disabled.contains(&address.value) {
                continue;
            }
            total += 1;
            if store.get(key).await.unwrap().nonce == nonce {
                reached += 1;
            }
        }
        if total == 0 {
            return 0.0;
        }
        reached as f64 / total as f64
    }
}

/// Builds a `GossipNetwork` of `node_count` nodes, each with fan-out width
/// `alpha`, where a `disabled_fraction` of nodes are unreachable.
pub struct GossipNetworkBuilder {
    node_count: usize,
    alpha: usize,
    disabled_fraction: f64,
}

impl GossipNetworkBuilder {
    pub fn new(node_count: usize, alpha: usize) -> Self {
        Self {
            node_count,
            alpha,
            disabled_fraction: 0.0,
        }
    }

    pub fn with_disabled_fraction(mut self, fraction: f64) -> Self {
        self.disabled_fraction = fraction;
        self
    }

    pub fn build(self) -> GossipNetwork {
        let addresses: Vec<Address> = (0..self.node_count)
            .map(|i| Address::new("sim", format!("node-{i}")))
            .collect();

        let disabled_count = (self.node_count as f64 * self.disabled_fraction).round() as usize;
        let disabled: HashSet<String> = addresses
            .iter()
            .take(disabled_count)
            .map(|a| a.value.clone())
            .collect();

        let nodes_registry: Arc<RwLock<HashMap<String, Arc<Gossiper>>>> =
            Arc::new(RwLock::new(HashMap::new()));
        let disabled_arc = Arc::new(disabled.clone());

        let mut nodes = Vec::with_capacity(self.node_count);
        let mut stores = Vec::with_capacity(self.node_count);

        for address in &addresses {
            let store = Arc::new(InMemMessageStore::default());
            let sampler = FixedSampler {
                addrs: addresses.iter().filter(|a| a.value != address.value).cloned().collect(),
            };
            let client = RoutingClient {
                nodes: nodes_registry.clone(),
                disabled: disabled_arc.clone(),
            };
            let identity = Arc::new(IdentitySignerVerifier);

            let gossiper = Arc::new(Gossiper::new(
                store.clone(),
                Arc::new(sampler),
                Arc::new(client),
                identity.clone(),
                identity,
                None,
                self.alpha,
            ));

            stores.push(store);
            nodes.push(gossiper);
        }

        {
            let mut registry = nodes_registry.write().unwrap();
            for (address, gossiper) in addresses.iter().zip(&nodes) {
                registry.insert(address.value.clone(), gossiper.clone());
            }
        }

        GossipNetwork {
            nodes,
            stores,
            addresses,
            disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fully_connected_network_converges() {
        let network = GossipNetworkBuilder::new(12, 4).build();

        network.broadcast_from(0, Message::new(1, "x", "hello")).await;
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let ratio = network.convergence_ratio(b"x", 1).await;
        assert!(ratio > 0.9, "ratio was {ratio}");
    }

    #[tokio::test]
    async fn disabled_nodes_are_excluded_from_convergence_denominator() {
        let network = GossipNetworkBuilder::new(10, 4).with_disabled_fraction(0.3).build();
        assert_eq!(network.disabled.len(), 3);

        network.broadcast_from(9, Message::new(1, "x", "hello")).await;
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let ratio = network.convergence_ratio(b"x", 1).await;
        assert!(ratio > 0.8, "ratio was {ratio}");
    }

    #[tokio::test]
    async fn forty_eight_node_network_with_ten_percent_disabled_converges() {
        let network = GossipNetworkBuilder::new(48, 7).with_disabled_fraction(0.1).build();
        assert_eq!(network.disabled.len(), 5);

        network.broadcast_from(0, Message::new(1, "x", "hello")).await;
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;

        let ratio = network.convergence_ratio(b"x", 1).await;
        assert!(ratio >= 0.9, "ratio was {ratio}");
    }
}
