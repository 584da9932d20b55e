//! Shared fixtures for unit tests.

use crate::api::client::{RawResponse, WeatherApi};
use crate::api::error::ApiError;
use crate::types::data_type::DataType;
use crate::types::date_range::DateRange;
use crate::types::location::Location;
use chrono::Duration;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

pub fn test_location() -> Location {
    Location::new(40.7128, -74.0060).unwrap()
}

pub fn raw_response(body: Value) -> RawResponse {
    RawResponse::new("http://test.local/points", body.to_string())
}

pub fn historical_body(entries: &[Value]) -> Value {
    json!({
        "history": entries,
        "location": {"latitude": 40.7128, "longitude": -74.006}
    })
}

/// A one-route HTTP server on a random local port answering every request
/// with the same canned status and body.
pub struct StubServer {
    port: u16,
    last_request: Arc<Mutex<Option<String>>>,
    requests: Arc<AtomicUsize>,
}

impl StubServer {
    pub fn respond(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let last_request = Arc::new(Mutex::new(None));
        let requests = Arc::new(AtomicUsize::new(0));

        let seen = last_request.clone();
        let counter = requests.clone();
        let body = body.to_string();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let request = read_request(&mut stream);
                *seen.lock().unwrap() = Some(request);
                counter.fetch_add(1, Ordering::SeqCst);
                let content_type = if body.trim_start().starts_with('{') {
                    "application/json"
                } else {
                    "text/plain"
                };
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    content_type,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            port,
            last_request,
            requests,
        }
    }

    /// A base URL nothing listens on.
    pub fn unused_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}", port)
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Raw text of the most recent request (request line and headers).
    pub fn last_request(&self) -> Option<String> {
        self.last_request.lock().unwrap().clone()
    }

    /// Number of requests answered so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut received = Vec::new();
    let mut buffer = [0u8; 1024];
    while !received.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(n) => received.extend_from_slice(&buffer[..n]),
        }
    }
    String::from_utf8_lossy(&received).into_owned()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchCall {
    pub location: Location,
    pub date_range: DateRange,
    pub data_type: DataType,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum FakeMode {
    Hourly,
    Empty,
    Fail(u16),
}

/// In-process [`WeatherApi`] returning 24 hourly entries per requested day.
///
/// Clones share the call log, so a test can keep one handle after boxing
/// another into a pipeline.
#[derive(Debug, Clone)]
pub struct FakeApi {
    calls: Arc<Mutex<Vec<FetchCall>>>,
    mode: FakeMode,
}

impl FakeApi {
    pub fn hourly() -> Self {
        Self::with_mode(FakeMode::Hourly)
    }

    pub fn empty() -> Self {
        Self::with_mode(FakeMode::Empty)
    }

    pub fn failing(status: u16) -> Self {
        Self::with_mode(FakeMode::Fail(status))
    }

    fn with_mode(mode: FakeMode) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            mode,
        }
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl WeatherApi for FakeApi {
    fn fetch(
        &self,
        location: &Location,
        date_range: &DateRange,
        data_type: DataType,
        fields: &[String],
    ) -> Result<RawResponse, ApiError> {
        self.calls.lock().unwrap().push(FetchCall {
            location: *location,
            date_range: *date_range,
            data_type,
            fields: fields.to_vec(),
        });
        let url = format!("fake://{}/{}", data_type, location);

        let entries = match self.mode {
            FakeMode::Fail(status) => {
                return Err(ApiError::Request {
                    url,
                    status: StatusCode::from_u16(status).unwrap(),
                    message: "fake failure".to_string(),
                })
            }
            FakeMode::Empty => Vec::new(),
            FakeMode::Hourly => hourly_entries(date_range, fields),
        };

        let mut body = Map::new();
        body.insert(data_type.values_container().to_string(), Value::Array(entries));
        body.insert(
            "location".to_string(),
            json!({"latitude": location.latitude(), "longitude": location.longitude()}),
        );
        Ok(RawResponse::new(url, Value::Object(body).to_string()))
    }
}

fn hourly_entries(date_range: &DateRange, fields: &[String]) -> Vec<Value> {
    let (start, _) = date_range.utc_bounds();
    let hours = date_range.num_days() * 24;
    (0..hours)
        .map(|hour| {
            let mut entry = Map::new();
            let timestamp = start + Duration::hours(hour);
            entry.insert("timestamp".to_string(), json!(timestamp.to_rfc3339()));
            for field in fields {
                entry.insert(field.clone(), json!(hour as f64 / 10.0));
            }
            Value::Object(entry)
        })
        .collect()
}
