// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use murmur_addrbook::AddrBook;
use murmur_config::AppConfig;
use murmur_core::{Address, Gossiper};
use murmur_crypto::{Ed25519Signer, Ed25519Verifier, Keypair};
use murmur_store::{SledAddrStore, SledMessageStore};
use murmur_transport::{BackoffPolicy, GossipServer, HttpClient};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] murmur_core::StoreError),
    #[error("key error: {0}")]
    Key(#[from] murmur_crypto::KeyError),
    #[error("server error: {0}")]
    Server(std::io::Error),
}

fn load_or_generate_identity(data_dir: &Path) -> Result<Keypair, RunError> {
    std::fs::create_dir_all(data_dir)?;
    let identity_path = data_dir.join("identity.hex");

    if identity_path.exists() {
        let secret_hex = std::fs::read_to_string(&identity_path)?;
        Ok(Keypair::from_secret_hex(secret_hex.trim())?)
    } else {
        let keypair = Keypair::generate();
        std::fs::write(&identity_path, keypair.secret_hex())?;
        info!(path = %identity_path.display(), "generated new node identity");
        Ok(keypair)
    }
}

pub async fn run(config: AppConfig) -> Result<(), RunError> {
    let keypair = load_or_generate_identity(&config.data_dir)?;
    info!(public_key = keypair.public_hex(), "node identity loaded");

    let addr_store = Arc::new(SledAddrStore::open(&config.data_dir.join("addrs"))?);
    let addr_book = Arc::new(AddrBook::construct(addr_store.clone()).await?);
    for peer in &config.bootstrap_peers {
        addr_book
            .insert_addr(Address::new(peer.network.clone(), peer.value.clone()))
            .await?;
    }

    let message_store = Arc::new(SledMessageStore::open(&config.data_dir.join("messages"))?);

    let backoff = BackoffPolicy {
        initial_delay: Duration::from_millis(config.backoff_initial_delay_ms),
        factor: config.backoff_factor,
        max_delay: Duration::from_millis(config.backoff_max_delay_ms),
    };
    let client = Arc::new(HttpClient::new(backoff));

    let verifying_key = keypair.verifying_key();
    let signer = Arc::new(Ed25519Signer::new(keypair));
    let verifier = Arc::new(Ed25519Verifier::new(verifying_key));

    let gossiper = Arc::new(Gossiper::new(
        message_store,
        addr_book,
        client,
        verifier,
        signer,
        None,
        config.alpha,
    ));

    let server = GossipServer::new(
        gossiper,
        config.listen_addr.clone(),
        Duration::from_millis(config.rate_limit_interval_ms),
    );

    server.run().await.map_err(RunError::Server)
}
