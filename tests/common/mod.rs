#![allow(dead_code)]

use axum::http::HeaderValue;
use events_log_viewer::{AppState, build_router, events::LogSource};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

pub const TWO_LINES: &[&str] = &[
    "2024-01-01T10:00:00 - User 123 Event: login",
    "2024-01-01T10:05:00 - User 456 Event: logout",
];

pub const THREE_LINES: &[&str] = &[
    "2024-01-01T10:00:00 - User 123 Event: login",
    "2024-01-01T10:05:00 - User 456 Event: logout",
    "2024-01-01T10:10:00 - User 123 Event: click_button",
];

/// A server on an ephemeral port reading a log file in a temp directory.
pub struct TestServer {
    pub addr: SocketAddr,
    pub log_path: PathBuf,
    _dir: TempDir,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn events_url(&self) -> String {
        format!("{}/events/log", self.base_url())
    }
}

/// Start a server. With `None` the log file is never created.
pub async fn spawn_server(lines: Option<&[&str]>) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("events.log");

    if let Some(lines) = lines {
        let mut file = std::fs::File::create(&log_path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
    }

    let router = build_router(
        AppState::new(LogSource::new(log_path.clone())),
        HeaderValue::from_static(ALLOWED_ORIGIN),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        addr,
        log_path,
        _dir: dir,
    }
}

/// Accept connections and never answer them.
pub async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}
