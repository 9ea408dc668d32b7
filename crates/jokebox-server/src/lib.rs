// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Liveness endpoint for the jokebox deployment. It serves no jokes; clients
//! talk to the joke API directly.

use anyhow::{Context, Result};
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use std::env;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3000;
pub const ROOT_MESSAGE: &str = "Joke App Server is running!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub status: String,
    pub message: String,
}

impl Status {
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_owned(),
            message: "Server is healthy".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(raw) = lookup("PORT") else {
            info!("PORT not set, using default: {DEFAULT_PORT}");
            return Ok(Self::default());
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }

        // 0 asks the OS for a free port.
        let port: u16 = raw
            .parse()
            .with_context(|| format!("invalid PORT value {raw:?}; expected 0-65535"))?;
        Ok(Self { port })
    }

    pub fn address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/status", get(status_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root_handler() -> &'static str {
    ROOT_MESSAGE
}

async fn status_handler() -> Json<Status> {
    Json(Status::healthy())
}

pub async fn serve(listener: TcpListener) -> Result<()> {
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve status endpoint")?;
    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(error) => {
                warn!("Failed to install Ctrl+C handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(error) => {
                warn!("Failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
