// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use jokebox_app::{Joke, JokeId};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://official-joke-api.appspot.com/random_joke";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(600);

/// The one way a joke fetch can fail. The cause is kept for logs but is not
/// part of the error's identity.
#[derive(Debug, Error)]
#[error("failed to retrieve a joke")]
pub struct FetchError {
    detail: String,
}

impl FetchError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

pub trait JokeSource: Send + Sync {
    fn fetch_random_joke(&self) -> Result<Joke, FetchError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    endpoint: String,
    reveal_delay: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(endpoint: &str, timeout: Duration, reveal_delay: Duration) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            bail!("source.endpoint must not be empty");
        }
        let parsed = Url::parse(endpoint)
            .with_context(|| format!("source.endpoint {endpoint:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "source.endpoint {endpoint:?} must use http or https, got {}",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint: endpoint.to_owned(),
            reveal_delay,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    fn request_joke(&self) -> Result<Joke, FetchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .map_err(|error| connection_error(&self.endpoint, error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let body = response
            .text()
            .map_err(|error| FetchError::new(format!("read response body: {error}")))?;
        parse_joke(&body)
    }
}

impl JokeSource for Client {
    fn fetch_random_joke(&self) -> Result<Joke, FetchError> {
        let started = Instant::now();
        debug!(endpoint = %self.endpoint, "fetching joke");

        let joke = self.request_joke().inspect_err(|error| {
            warn!(
                endpoint = %self.endpoint,
                detail = error.detail(),
                "joke fetch failed"
            );
        })?;

        thread::sleep(self.reveal_delay);
        debug!(
            id = joke.id.get(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "joke fetched"
        );
        Ok(joke)
    }
}

#[derive(Debug, Deserialize)]
struct JokePayload {
    id: Option<i64>,
    setup: Option<String>,
    punchline: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub fn parse_joke(body: &str) -> Result<Joke, FetchError> {
    let payload: JokePayload = serde_json::from_str(body)
        .map_err(|error| FetchError::new(format!("decode joke payload: {error}")))?;

    let setup = payload
        .setup
        .filter(|setup| !setup.is_empty())
        .ok_or_else(|| FetchError::new("payload has no setup"))?;
    let id = payload
        .id
        .ok_or_else(|| FetchError::new("payload has no id"))?;
    let punchline = payload
        .punchline
        .ok_or_else(|| FetchError::new("payload has no punchline"))?;

    Ok(Joke {
        id: JokeId::new(id),
        setup,
        punchline,
        kind: payload.kind.unwrap_or_default(),
    })
}

fn connection_error(endpoint: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::new(format!("request to {endpoint} timed out ({error})"));
    }
    FetchError::new(format!("cannot reach {endpoint} ({error})"))
}

fn status_error(status: StatusCode) -> FetchError {
    FetchError::new(format!("server returned {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::{Client, DEFAULT_REVEAL_DELAY, DEFAULT_TIMEOUT, FetchError, parse_joke};
    use jokebox_app::JokeId;

    #[test]
    fn parse_joke_reads_all_fields() {
        let joke = parse_joke(
            r#"{"type":"programming","setup":"Why?","punchline":"Because.","id":42}"#,
        )
        .expect("valid payload");
        assert_eq!(joke.id, JokeId::new(42));
        assert_eq!(joke.setup, "Why?");
        assert_eq!(joke.punchline, "Because.");
        assert_eq!(joke.kind, "programming");
    }

    #[test]
    fn parse_joke_rejects_missing_setup() {
        let error = parse_joke(r#"{"id":1,"punchline":"P"}"#).expect_err("setup required");
        assert!(error.detail().contains("setup"));
    }

    #[test]
    fn parse_joke_rejects_empty_setup() {
        let error = parse_joke(r#"{"id":1,"setup":"","punchline":"P"}"#)
            .expect_err("empty setup should fail");
        assert!(error.detail().contains("setup"));
    }

    #[test]
    fn parse_joke_rejects_missing_id_and_punchline() {
        assert!(parse_joke(r#"{"setup":"S","punchline":"P"}"#).is_err());
        assert!(parse_joke(r#"{"id":1,"setup":"S"}"#).is_err());
    }

    #[test]
    fn parse_joke_rejects_non_json() {
        let error = parse_joke("<html>rate limited</html>").expect_err("html should fail");
        assert!(error.detail().contains("decode joke payload"));
    }

    #[test]
    fn fetch_error_display_hides_cause() {
        let error = FetchError::new("cannot reach http://example.invalid");
        assert_eq!(error.to_string(), "failed to retrieve a joke");
    }

    #[test]
    fn client_rejects_empty_and_non_http_endpoints() {
        let empty = Client::new("  ", DEFAULT_TIMEOUT, DEFAULT_REVEAL_DELAY)
            .expect_err("empty endpoint should fail");
        assert!(empty.to_string().contains("must not be empty"));

        let ftp = Client::new("ftp://jokes.example/random", DEFAULT_TIMEOUT, DEFAULT_REVEAL_DELAY)
            .expect_err("ftp endpoint should fail");
        assert!(ftp.to_string().contains("http or https"));

        let garbage = Client::new("not a url", DEFAULT_TIMEOUT, DEFAULT_REVEAL_DELAY)
            .expect_err("garbage endpoint should fail");
        assert!(garbage.to_string().contains("not a valid URL"));
    }
}
