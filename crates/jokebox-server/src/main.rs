// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use jokebox_server::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    if let Ok(path) = dotenv {
        info!("loaded environment from {}", path.display());
    }

    let config = Config::from_env()?;
    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("bind {address}; set PORT to a free port"))?;

    let port = listener
        .local_addr()
        .context("read bound address")?
        .port();
    info!("Server is running on port {port}");
    jokebox_server::serve(listener).await
}
