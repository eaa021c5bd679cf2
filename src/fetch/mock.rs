//! Scripted in-memory transport for unit tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use reqwest::{Method, Request, Response};

use super::client::HttpClient;
use crate::error::FetchError;

/// What the mock does for one call, consumed in order.
pub(crate) enum Reply {
    Respond(Response),
    Fail(FetchError),
    /// Never completes; used to exercise cancellation.
    Hang,
}

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

#[derive(Default)]
pub(crate) struct MockClient {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Recorded>>,
}

impl MockClient {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn execute(&self, req: Request) -> Result<Response, FetchError> {
        let body = req
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| String::from_utf8_lossy(b).into_owned());
        self.calls.lock().unwrap().push(Recorded {
            method: req.method().clone(),
            url: req.url().to_string(),
            headers: req.headers().clone(),
            body,
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Fail(FetchError::Transport("no scripted reply".into())));

        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(err) => Err(err),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// A complete response with a JSON (or any text) body.
pub(crate) fn json(status: u16, body: &str) -> Response {
    http::Response::builder()
        .status(status)
        .body(body.to_string())
        .unwrap()
        .into()
}

/// A response whose body arrives as the given chunks, in order.
pub(crate) fn chunked(status: u16, chunks: &[&[u8]], content_length: Option<u64>) -> Response {
    let items: Vec<Result<Bytes, io::Error>> = chunks
        .iter()
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    streaming(status, items, content_length)
}

/// A response whose body yields `chunks` and then fails mid-read.
pub(crate) fn broken(status: u16, chunks: &[&[u8]]) -> Response {
    let mut items: Vec<Result<Bytes, io::Error>> = chunks
        .iter()
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    items.push(Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")));
    streaming(status, items, None)
}

fn streaming(
    status: u16,
    items: Vec<Result<Bytes, io::Error>>,
    content_length: Option<u64>,
) -> Response {
    let mut builder = http::Response::builder().status(status);
    if let Some(len) = content_length {
        builder = builder.header(CONTENT_LENGTH, len);
    }
    builder
        .body(reqwest::Body::wrap_stream(futures_util::stream::iter(items)))
        .unwrap()
        .into()
}

/// A complete response carrying a non-canonical reason phrase, as hyper
/// records it when parsing an HTTP/1 status line.
pub(crate) fn with_reason(status: u16, reason: &'static str, body: &str) -> Response {
    http::Response::builder()
        .status(status)
        .extension(hyper::ext::ReasonPhrase::from_static(reason.as_bytes()))
        .body(body.to_string())
        .unwrap()
        .into()
}
