// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use murmur_core::{Gossiper, Message};
use tracing::{info, warn};

use crate::rate_limit::RateLimiter;
use crate::wire::{BroadcastRequest, WireMessage};

struct ServerState {
    gossiper: Arc<Gossiper>,
    rate_limiter: RateLimiter,
    next_nonce: AtomicU64,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_millis() as u64
}

/// Reference `Server`: an actix-web HTTP ingress that deserialises a
/// `WireMessage`, applies the per-peer rate limit, and hands accepted
/// requests to `Gossiper::receive`. Also exposes `/broadcast`, through which
/// this node originates new messages signed with its own key.
pub struct GossipServer {
    state: Arc<ServerState>,
    bind_addr: String,
}

impl GossipServer {
    pub fn new(gossiper: Arc<Gossiper>, bind_addr: impl Into<String>, rate_limit_interval: Duration) -> Self {
        Self {
            state: Arc::new(ServerState {
                gossiper,
                rate_limiter: RateLimiter::new(rate_limit_interval),
                next_nonce: AtomicU64::new(now_millis()),
            }),
            bind_addr: bind_addr.into(),
        }
    }

    pub async fn run(self) -> std::io::Result<()> {
        let state = self.state;
        let bind_addr = self.bind_addr;
        info!(%bind_addr, "gossip server listening");

        HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state.clone()))
                .route("/messages", web::post().to(handle_message))
                .route("/broadcast", web::post().to(handle_broadcast))
                .route("/health", web::get().to(handle_health))
        })
        .bind(&bind_addr)?
        .run()
        .await
    }
}

async fn handle_message(
    req: HttpRequest,
    state: web::Data<Arc<ServerState>>,
    body: web::Json<WireMessage>,
) -> HttpResponse {
    let source: IpAddr = match req.peer_addr() {
        Some(addr) => addr.ip(),
        None => return HttpResponse::BadRequest().body("missing peer address"),
    };

    if !state.rate_limiter.check_and_record(source, Instant::now()) {
        warn!(%source, "rate limit exceeded");
        return HttpResponse::TooManyRequests().body("RATE_LIMIT_EXCEEDED");
    }

    let message = match murmur_core::Message::try_from(body.into_inner()) {
        Ok(m) => m,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };

    match state.gossiper.receive(message).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(e) => {
            warn!(error = %e, "receive failed");
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}

async fn handle_broadcast(
    state: web::Data<Arc<ServerState>>,
    body: web::Json<BroadcastRequest>,
) -> HttpResponse {
    let (key, value) = match body.into_inner().decode() {
        Ok(pair) => pair,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };

    let nonce = state.next_nonce.fetch_add(1, Ordering::SeqCst);
    let message = Message::new(nonce, key, value);

    match state.gossiper.broadcast(message).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "nonce": nonce })),
        Err(e) => {
            warn!(error = %e, "broadcast failed");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

async fn handle_health() -> HttpResponse {
    HttpResponse::Ok().finish()
}
