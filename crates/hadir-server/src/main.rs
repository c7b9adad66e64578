//! # hadir-server
//!
//! HTTP server for the hadir geofenced attendance system.
//!
//! This binary provides:
//! - REST API for check-in/check-out validation and teacher review
//! - OpenAPI documentation via Swagger UI
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development
//! cargo run --package hadir-server
//!
//! # Production
//! HADIR_ENV=production ./hadir-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use hadir_server::{api, logging, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("HADIR_ENV").as_deref() == Ok("production");

    logging::init(is_production)?;

    info!("Starting hadir-server");

    let state = AppState::new()?.into_shared();
    let app = api::create_router(state);

    let port = std::env::var("HADIR_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
