// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use jokebox_app::FetchTicket;
use jokebox_source::JokeSource;
use jokebox_tui::InternalEvent;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::debug;

pub struct SourceRuntime {
    source: Arc<dyn JokeSource>,
}

impl SourceRuntime {
    pub fn new(source: Arc<dyn JokeSource>) -> Self {
        Self { source }
    }
}

impl jokebox_tui::AppRuntime for SourceRuntime {
    fn spawn_fetch(&mut self, ticket: FetchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let source = Arc::clone(&self.source);
        let generation = ticket.generation();
        thread::Builder::new()
            .name(format!("joke-fetch-{generation}"))
            .spawn(move || {
                let outcome = source.fetch_random_joke();
                if tx
                    .send(InternalEvent::JokeFetched {
                        generation,
                        outcome,
                    })
                    .is_err()
                {
                    debug!(generation, "ui gone before joke arrived");
                }
            })
            .context("spawn joke fetch thread")?;
        Ok(())
    }
}
