//! Shared test utilities for integration tests
//!
//! Provides environment isolation, an instant progress reporter and a minimal
//! HTTP server that answers with canned responses. The in-memory transport is
//! `kanvas_snapshot::http::mock::MockTransport`.

use async_trait::async_trait;
use kanvas_snapshot::progress::{ProgressOutcome, ProgressReporter};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "KANVAS_SNAPSHOT__MESHERY__API_BASE_URL",
    "KANVAS_SNAPSHOT__MESHERY__PROVIDER_TOKEN",
    "KANVAS_SNAPSHOT__TRIGGER__MODE",
];

/// Point HOME and XDG_CONFIG_HOME into `test_dir` for the duration of `f`,
/// clear the config variables the tests touch, and restore everything after.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ISOLATED_VARS
        .iter()
        .map(|name| (*name, std::env::var(name).ok()))
        .collect();

    let home = test_dir.path().join("home");
    let config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&config_home).unwrap();
    for name in ISOLATED_VARS {
        std::env::remove_var(name);
    }
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);

    let result = f();

    for (name, value) in saved {
        match value {
            Some(value) => std::env::set_var(name, value),
            None => std::env::remove_var(name),
        }
    }
    result
}

/// Progress reporter that returns immediately and counts its calls.
#[derive(Clone)]
pub struct InstantProgress {
    pub calls: Arc<AtomicUsize>,
    outcome: ProgressOutcome,
}

impl InstantProgress {
    pub fn elapsed() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            outcome: ProgressOutcome::Elapsed,
        }
    }

    pub fn interrupted() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            outcome: ProgressOutcome::Interrupted,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressReporter for InstantProgress {
    async fn run_progress(&self, _estimate: Duration) -> ProgressOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
    }
}

/// A request as seen by `StubServer`.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Blocking HTTP/1.1 server on a background thread. Serves one canned
/// response per connection, in order, then stops accepting.
pub struct StubServer {
    base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    pub fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();

        thread::spawn(move || {
            for (status, body) in responses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let _ = serve_one(stream, status, body, &sink);
            }
        });

        Self { base_url, captured }
    }

    /// Accepts one connection and never answers it.
    pub fn silent(hold: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                thread::sleep(hold);
                drop(stream);
            }
        });
        Self {
            base_url,
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

/// An address nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// Records the request before answering so callers that saw the response
// also see the capture.
fn serve_one(
    stream: TcpStream,
    status: u16,
    body: &str,
    sink: &Mutex<Vec<CapturedRequest>>,
) -> Option<()> {
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .ok()?;
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name.to_string(), value));
        }
    }

    let mut body_bytes = vec![0u8; content_length];
    reader.read_exact(&mut body_bytes).ok()?;

    sink.lock().unwrap().push(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body_bytes).into_owned(),
    });

    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let mut stream = stream;
    stream.write_all(response.as_bytes()).ok()?;
    stream.flush().ok()
}
