//! Shared test helpers: a local stub server speaking just enough HTTP/1.1
//! and WebSocket for integration flows, with scripted responses and request
//! capture.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{accept_async, WebSocketStream};

/// Server side of an accepted push-channel connection.
pub type ServerWs = WebSocketStream<TcpStream>;

/// Scripted (status, JSON body) response for non-channel HTTP requests.
pub type HttpScript = Vec<(u16, String)>;

/// A minimal local server for tests: requests whose path contains `/ws/`
/// are upgraded to WebSocket (when enabled) and handed to the test through
/// a channel; everything else gets the next scripted HTTP response (the
/// last entry repeats once the script runs out).
pub struct StubServer {
    pub base_url: String,
    /// Raw request heads of every plain-HTTP request, in arrival order.
    pub requests: Arc<Mutex<Vec<String>>>,
    /// Number of plain-HTTP requests served.
    pub hits: Arc<AtomicUsize>,
    /// Accepted push-channel connections.
    pub ws_conns: mpsc::Receiver<ServerWs>,
    task: JoinHandle<()>,
}

impl StubServer {
    pub async fn spawn(script: HttpScript, accept_ws: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let hits = Arc::new(AtomicUsize::new(0));
        let (ws_tx, ws_conns) = mpsc::channel(8);

        let requests_clone = requests.clone();
        let hits_clone = hits.clone();
        let task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                if is_channel_request(&stream).await && accept_ws {
                    if let Ok(ws) = accept_async(stream).await {
                        let _ = ws_tx.send(ws).await;
                    }
                } else {
                    let index = hits_clone.fetch_add(1, Ordering::SeqCst);
                    let (status, body) = script
                        .get(index.min(script.len().saturating_sub(1)))
                        .cloned()
                        .unwrap_or((500, String::new()));
                    serve_http(stream, status, &body, &requests_clone).await;
                }
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            hits,
            ws_conns,
            task,
        }
    }

    /// Stop accepting connections; later connects are refused.
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Values of the given request header across all captured requests.
    pub fn header_values(&self, name: &str) -> Vec<String> {
        let needle = format!("{}:", name.to_ascii_lowercase());
        self.requests
            .lock()
            .unwrap()
            .iter()
            .flat_map(|head| {
                head.lines()
                    .filter(|line| line.to_ascii_lowercase().starts_with(&needle))
                    .map(|line| line.splitn(2, ':').nth(1).unwrap_or("").trim().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Peek at the request line to decide whether this is a channel upgrade.
async fn is_channel_request(stream: &TcpStream) -> bool {
    let mut buf = [0u8; 256];
    for _ in 0..50 {
        let Ok(n) = stream.peek(&mut buf).await else {
            return false;
        };
        if buf[..n].windows(2).any(|w| w == b"\r\n") {
            let head = String::from_utf8_lossy(&buf[..n]);
            return head
                .lines()
                .next()
                .map(|line| line.contains("/ws/"))
                .unwrap_or(false);
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    false
}

async fn serve_http(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    requests: &Mutex<Vec<String>>,
) {
    // Read the request head; bodies are irrelevant for these tests.
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match tokio::time::timeout(Duration::from_secs(2), stream.read(&mut buf)).await {
            Ok(Ok(0)) | Err(_) => break,
            Ok(Ok(n)) => {
                head.extend_from_slice(&buf[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            },
            Ok(Err(_)) => break,
        }
    }
    requests
        .lock()
        .unwrap()
        .push(String::from_utf8_lossy(&head).to_string());

    let response = format!(
        "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.flush().await;
}

/// JSON body of a non-terminal status snapshot.
pub fn processing_status_body(session_id: &str) -> String {
    format!(
        r#"{{"session_id":"{}","status":"processing","total_units":10,"completed_units":1}}"#,
        session_id
    )
}

/// JSON body of a sparse status snapshot (no fields beyond the id).
pub fn sparse_status_body(session_id: &str) -> String {
    format!(r#"{{"session_id":"{}"}}"#, session_id)
}
