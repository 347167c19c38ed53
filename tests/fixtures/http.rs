//! One-shot local HTTP responder.
//!
//! Serves a canned response to each incoming connection and records the
//! request line, so the real provider clients can be exercised offline.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub enum Reply {
    Json { status: u16, body: String },
    /// Accept the connection and never answer.
    Silent(Duration),
}

pub struct Responder {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Responder {
    /// Serve `replies` in order, one per connection.
    pub fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind responder");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        thread::spawn(move || {
            for reply in replies {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                handle(stream, reply, &seen);
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn json(status: u16, body: &str) -> Self {
        Self::start(vec![Reply::Json {
            status,
            body: body.to_string(),
        }])
    }

    /// Request lines received so far, e.g. `GET /search?q=... HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

fn handle(mut stream: TcpStream, reply: Reply, seen: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&buf);
    if let Some(line) = head.lines().next() {
        seen.lock().expect("requests lock").push(line.to_string());
    }

    match reply {
        Reply::Json { status, body } => {
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
        Reply::Silent(hold) => thread::sleep(hold),
    }
}
