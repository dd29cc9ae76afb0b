//! A minimal HTTP/1.1 backend for exercising `BackendClient` over a real socket.
//!
//! Routes answer with scripted responses in order and repeat the last one.
//! Unknown routes answer 404.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Default)]
struct Routes {
    responses: HashMap<(String, String), VecDeque<(u16, String)>>,
    requests: Vec<RecordedRequest>,
}

impl Routes {
    fn respond(&mut self, request: RecordedRequest) -> (u16, String) {
        let key = (request.method.clone(), request.path.clone());
        self.requests.push(request);

        match self.responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => (404, r#"{"error":"NOT_FOUND"}"#.to_string()),
        }
    }
}

pub struct StubBackend {
    base_url: String,
    routes: Arc<Mutex<Routes>>,
    handle: JoinHandle<()>,
}

impl StubBackend {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(Mutex::new(Routes::default()));

        let accept_routes = routes.clone();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = accept_routes.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, routes).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            routes,
            handle,
        }
    }

    /// Scripts the responses for `method path`, in order.
    pub fn route(&self, method: &str, path: &str, responses: Vec<(u16, &str)>) -> &Self {
        let queue = responses
            .into_iter()
            .map(|(status, body)| (status, body.to_string()))
            .collect();
        self.routes
            .lock()
            .unwrap()
            .responses
            .insert((method.to_string(), path.to_string()), queue);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.routes.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

async fn serve(mut stream: TcpStream, routes: Arc<Mutex<Routes>>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    let (status, reply) = routes
        .lock()
        .unwrap()
        .respond(RecordedRequest { method, path, body });

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        if status < 400 { "OK" } else { "Error" },
        reply.len(),
        reply
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
