//! In-process stand-in for the inventory functions, for tests.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Requests seen by a `FakeRemote`, as `"METHOD /path?query"`
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// HTTP/1.1 responder on a local port. Every request is answered by
/// `respond(method, target, body)`, which returns the status and JSON body.
pub struct FakeRemote {
    pub url: String,
    pub requests: RequestLog,
}

impl FakeRemote {
    pub fn start<F>(respond: F) -> Self
    where
        F: Fn(&str, &str, &str) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/inventory", listener.local_addr().unwrap());
        let requests = RequestLog::default();

        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                handle(stream, &respond, &log);
            }
        });

        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests()
            .iter()
            .filter(|line| line.starts_with(method))
            .count()
    }
}

fn handle<F>(stream: TcpStream, respond: &F, log: &RequestLog)
where
    F: Fn(&str, &str, &str) -> (u16, String),
{
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).is_err() || header.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0; content_length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }
    let body = String::from_utf8_lossy(&body).into_owned();

    log.lock().unwrap().push(format!("{} {}", method, target));
    let (status, payload) = respond(&method, &target, &body);

    let response = format!(
        "HTTP/1.1 {} Fake\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// JSON for one remote entry row with only forks counted
pub fn entry_json(id: i64, venue: &str, date: &str, forks: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "venue": venue,
        "date": date,
        "forks": forks,
        "created_at": "2025-10-01 08:00:00.000000"
    })
}
