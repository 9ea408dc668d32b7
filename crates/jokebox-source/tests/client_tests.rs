// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use jokebox_app::JokeId;
use jokebox_source::{Client, JokeSource};
use std::thread;
use std::time::{Duration, Instant};
use tiny_http::{Header, Response, Server};

fn serve_once(status: u16, body: &'static str) -> Result<(String, thread::JoinHandle<()>)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/random_joke", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/random_joke");
        assert_eq!(request.method(), &tiny_http::Method::Get);
        let response = Response::from_string(body)
            .with_status_code(status)
            .with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
        request.respond(response).expect("response should succeed");
    });

    Ok((addr, handle))
}

#[test]
fn fetch_returns_joke_after_reveal_delay() -> Result<()> {
    let (addr, handle) = serve_once(
        200,
        r#"{"type":"general","setup":"What do you call a fake noodle?","punchline":"An impasta.","id":17}"#,
    )?;

    let delay = Duration::from_millis(80);
    let client = Client::new(&addr, Duration::from_secs(2), delay)?;
    let started = Instant::now();
    let joke = client.fetch_random_joke()?;

    assert!(started.elapsed() >= delay);
    assert_eq!(joke.id, JokeId::new(17));
    assert_eq!(joke.setup, "What do you call a fake noodle?");
    assert_eq!(joke.punchline, "An impasta.");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_fails_when_setup_is_missing() -> Result<()> {
    let (addr, handle) = serve_once(200, r#"{"id":3,"punchline":"orphaned"}"#)?;

    let client = Client::new(&addr, Duration::from_secs(2), Duration::ZERO)?;
    let error = client
        .fetch_random_joke()
        .expect_err("payload without setup should fail");
    assert_eq!(error.to_string(), "failed to retrieve a joke");
    assert!(error.detail().contains("setup"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_fails_on_server_error_status() -> Result<()> {
    let (addr, handle) = serve_once(
        503,
        r#"{"type":"general","setup":"S","punchline":"P","id":1}"#,
    )?;

    let client = Client::new(&addr, Duration::from_secs(2), Duration::ZERO)?;
    let error = client
        .fetch_random_joke()
        .expect_err("non-2xx status should fail");
    assert!(error.detail().contains("503"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_fails_fast_for_unreachable_endpoint() -> Result<()> {
    let delay = Duration::from_secs(5);
    let client = Client::new(
        "http://127.0.0.1:1/random_joke",
        Duration::from_millis(200),
        delay,
    )?;

    let started = Instant::now();
    let error = client
        .fetch_random_joke()
        .expect_err("unreachable endpoint should fail");
    assert!(started.elapsed() < delay);
    assert!(error.detail().contains("127.0.0.1:1"));
    Ok(())
}

#[test]
fn fetch_times_out_without_reveal_delay() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/random_joke", server.server_addr());
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        thread::sleep(Duration::from_secs(1));
        drop(request);
    });

    let delay = Duration::from_secs(5);
    let client = Client::new(&addr, Duration::from_millis(200), delay)?;
    let started = Instant::now();
    let error = client
        .fetch_random_joke()
        .expect_err("stalled server should time out");

    assert!(started.elapsed() < delay);
    assert_eq!(error.to_string(), "failed to retrieve a joke");
    assert!(error.detail().contains("timed out"), "{}", error.detail());

    handle.join().expect("server thread should join");
    Ok(())
}
