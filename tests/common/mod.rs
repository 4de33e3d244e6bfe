#![allow(dead_code)]

use movies_api::app::{build_service, AppConfig};
use movies_api::movies::{shared, InMemoryMovieStore, Movie};
use movies_api::server::{HttpServer, ServerHandle};
use movies_api::validator::MovieValidator;
use serde_json::Value;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Once};
use std::time::Duration;

static MAY_INIT: Once = Once::new();

/// Configure May coroutines once per test binary.
pub fn setup_may_runtime() {
    MAY_INIT.call_once(|| {
        may::config().set_stack_size(0x8000);
    });
}

/// A running service on an ephemeral port, stopped on drop.
pub struct TestServer {
    handle: Option<ServerHandle>,
    addr: SocketAddr,
}

impl TestServer {
    pub fn start(movies: Vec<Movie>) -> Self {
        Self::with_config(movies, AppConfig::default())
    }

    pub fn with_config(movies: Vec<Movie>, config: AppConfig) -> Self {
        setup_may_runtime();
        let store = shared(InMemoryMovieStore::with_movies(movies));
        let validator = Arc::new(MovieValidator::new().unwrap());
        let service = build_service(&config, store, validator).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let handle = HttpServer(service).start(addr).unwrap();
        handle.wait_ready().unwrap();
        Self {
            handle: Some(handle),
            addr,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn request(&self, raw: &str) -> TestResponse {
        parse_response(&send_request(&self.addr, raw))
    }

    /// `method path` with optional extra header lines and JSON body.
    pub fn call(&self, method: &str, path: &str, headers: &[(&str, &str)], body: Option<&str>) -> TestResponse {
        let mut raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n");
        for (name, value) in headers {
            raw.push_str(&format!("{name}: {value}\r\n"));
        }
        if let Some(body) = body {
            raw.push_str("Content-Type: application/json\r\n");
            raw.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
        } else {
            raw.push_str("\r\n");
        }
        self.request(&raw)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

/// Write a raw request and read one response, using `Content-Length` to find its end.
pub fn send_request(addr: &SocketAddr, req: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(req.as_bytes()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_millis(1000)))
        .unwrap();

    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];
    loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            let len = content_length(&head).unwrap_or(0);
            if buf.len() >= pos + 4 + len {
                buf.truncate(pos + 4 + len);
                break;
            }
        }
        match stream.read(&mut tmp) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                break
            }
            Err(e) => panic!("read error: {e:?}"),
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn content_length(head: &str) -> Option<usize> {
    head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

pub fn parse_response(resp: &str) -> TestResponse {
    let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
    let mut lines = head.lines();
    let status = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();
    TestResponse {
        status,
        headers,
        body: body.to_string(),
    }
}

/// The two-record collection most tests start from.
pub fn sample_movies() -> Vec<Movie> {
    let value = serde_json::json!([
        {
            "id": "a1", "title": "X", "year": 2000, "director": "D",
            "duration": 90, "poster": "https://example.com/x.jpg",
            "genre": ["Drama"], "rate": 7.5
        },
        {
            "id": "b2", "title": "Heat", "year": 1995, "director": "Michael Mann",
            "duration": 170, "poster": "https://example.com/heat.jpg",
            "genre": ["Crime", "Thriller"], "rate": 8.3
        }
    ]);
    serde_json::from_value(value).unwrap()
}
