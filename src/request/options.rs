//! Transport-call arguments derived from a [`RequestConfig`].

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Request, Url};

use super::config::{Method, RequestConfig};
use crate::error::FetchError;
use crate::fetch::bearer_header;

/// The method, headers and body sent on every attempt of one call.
///
/// Built once per call; each retry rebuilds an identical [`Request`] from it.
/// This is also what the request log callback receives.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    /// JSON text. Always `None` for GET.
    pub body: Option<String>,
    pub cancellable: bool,
}

impl RequestOptions {
    /// Merges headers (caller, then `Authorization`, then `Content-Type`) and
    /// serializes the body.
    pub(crate) fn build(
        config: &RequestConfig,
        stored_token: Option<&str>,
        cancellable: bool,
    ) -> Result<Self, FetchError> {
        let mut headers = config.headers.clone();

        if let Some(auth) = bearer_header(stored_token, config.token.as_deref())? {
            headers.insert(AUTHORIZATION, auth);
        }

        let payload = config.body.as_ref().filter(|b| !b.is_null());
        let body = match (config.method, payload) {
            (Method::Get, _) | (_, None) => None,
            (_, Some(value)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(serde_json::to_string(value)?)
            }
        };

        Ok(Self {
            method: config.method,
            headers,
            body,
            cancellable,
        })
    }

    /// The caller's method and headers only, for logging a call whose
    /// options could not be built.
    pub(crate) fn unprepared(config: &RequestConfig, cancellable: bool) -> Self {
        Self {
            method: config.method,
            headers: config.headers.clone(),
            body: None,
            cancellable,
        }
    }

    pub(crate) fn to_request(&self, url: &Url) -> Request {
        let mut req = Request::new(self.method.into(), url.clone());
        *req.headers_mut() = self.headers.clone();
        if let Some(body) = &self.body {
            *req.body_mut() = Some(body.clone().into());
        }
        req
    }
}
