//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use gemini_multimodal::models::{ModelParams, Part, Response};
use gemini_multimodal::{ModelClient, MultiModalError, Result};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// What the fake client does when asked to generate content.
pub enum Reply {
    Respond(Response),
    Fail(String),
    Panic,
    Stall,
}

/// An in-memory model client recording every call it receives.
pub struct FakeClient {
    reply: Reply,
    token_counts: Vec<std::result::Result<i32, String>>,
    count_calls: AtomicUsize,
    pub generate_calls: Mutex<Vec<(ModelParams, Vec<Part>)>>,
    pub counted_parts: Mutex<Vec<Part>>,
}

impl FakeClient {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            token_counts: Vec::new(),
            count_calls: AtomicUsize::new(0),
            generate_calls: Mutex::new(Vec::new()),
            counted_parts: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(text: &str) -> Self {
        Self::new(Reply::Respond(text_response(text)))
    }

    /// A client whose n-th token count call returns the n-th entry.
    pub fn counting(token_counts: Vec<std::result::Result<i32, String>>) -> Self {
        Self {
            token_counts,
            ..Self::new(Reply::Fail("not used".into()))
        }
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for FakeClient {
    async fn generate_content(&self, params: &ModelParams, parts: &[Part]) -> Result<Response> {
        self.generate_calls
            .lock()
            .unwrap()
            .push((params.clone(), parts.to_vec()));
        match &self.reply {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::Fail(message) => Err(MultiModalError::Generation(message.clone())),
            Reply::Panic => panic!("fake client exploded"),
            Reply::Stall => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Response::default())
            }
        }
    }

    async fn count_tokens(&self, _model: &str, parts: &[Part]) -> Result<i32> {
        let index = self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.counted_parts.lock().unwrap().extend_from_slice(parts);
        match self.token_counts.get(index) {
            Some(Ok(count)) => Ok(*count),
            Some(Err(message)) => Err(MultiModalError::Generation(message.clone())),
            None => Err(MultiModalError::Generation("unexpected count".into())),
        }
    }
}

/// A response whose single candidate holds one text part.
pub fn text_response(text: &str) -> Response {
    serde_json::from_value(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
    .unwrap()
}

/// Accepts one connection, reads the whole request, answers with `response`
/// verbatim and hands the raw request back through the returned receiver.
pub async fn serve_once_at(
    response: impl Into<String>,
) -> (String, tokio::sync::oneshot::Receiver<String>) {
    let response = response.into();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
        let _ = tx.send(request);
    });
    (format!("http://{}", addr), rx)
}

/// Like [`serve_once_at`], returning a file URL on the server.
pub async fn serve_once(response: impl Into<String>) -> String {
    let (base, _) = serve_once_at(response).await;
    format!("{}/images/frog.png", base)
}

/// An HTTP/1.1 response with a JSON body.
pub fn json_response(status: &str, body: &serde_json::Value) -> String {
    let body = body.to_string();
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    )
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);
        if let Some(end) = find(&data, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
