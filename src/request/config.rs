//! Per-call request configuration.

use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;

use super::options::RequestOptions;
use crate::error::FetchError;
use crate::fetch::CancelHandle;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TOKEN_ERROR_CODE: StatusCode = StatusCode::UNAUTHORIZED;

pub type Hook = Arc<dyn Fn() + Send + Sync>;
pub type ProgressHook = Arc<dyn Fn(f64) + Send + Sync>;
pub type LogHook = Arc<dyn Fn(&str, &RequestOptions) + Send + Sync>;
pub type CancelHook = Arc<dyn Fn(CancelHandle) + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(&FetchError) + Send + Sync>;

/// HTTP verbs the wrapper issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Everything a single call can customise.
///
/// Built fresh for each request and consumed by it. All fields default to
/// "off"; use the builder methods or set fields directly.
#[derive(Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    /// Drain the body as raw chunks and return it as text.
    pub is_stream: bool,
    pub retry_on_error: bool,
    pub max_retries: u32,
    /// Also retry attempts that failed because the cancel handle was aborted.
    pub retry_cancelled: bool,
    pub token_error_code: StatusCode,
    pub token: Option<String>,
    pub support_cancel: bool,
    /// Caller-owned cancel handle. Setting one enables cancellation.
    pub cancel_handle: Option<CancelHandle>,
    pub show_loading: Option<Hook>,
    pub hide_loading: Option<Hook>,
    pub on_progress: Option<ProgressHook>,
    pub log_request: Option<LogHook>,
    pub handle_cancel: Option<CancelHook>,
    pub handle_error: Option<ErrorHook>,
    pub handle_unauthorized: Option<Hook>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            method: Method::Get,
            headers: HeaderMap::new(),
            body: None,
            is_stream: false,
            retry_on_error: false,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_cancelled: false,
            token_error_code: DEFAULT_TOKEN_ERROR_CODE,
            token: None,
            support_cancel: false,
            cancel_handle: None,
            show_loading: None,
            hide_loading: None,
            on_progress: None,
            log_request: None,
            handle_cancel: None,
            handle_error: None,
            handle_unauthorized: None,
        }
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("is_stream", &self.is_stream)
            .field("retry_on_error", &self.retry_on_error)
            .field("max_retries", &self.max_retries)
            .field("retry_cancelled", &self.retry_cancelled)
            .field("token_error_code", &self.token_error_code)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("support_cancel", &self.support_cancel)
            .field("has_cancel_handle", &self.cancel_handle.is_some())
            .field("has_progress", &self.on_progress.is_some())
            .finish_non_exhaustive()
    }
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Serializes `body` to a JSON value up front so the config stays `Clone`.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, FetchError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn stream(mut self) -> Self {
        self.is_stream = true;
        self
    }

    /// Enables retry on error with at most `max_retries` extra attempts.
    pub fn retry(mut self, max_retries: u32) -> Self {
        self.retry_on_error = true;
        self.max_retries = max_retries;
        self
    }

    pub fn retry_cancelled(mut self, enabled: bool) -> Self {
        self.retry_cancelled = enabled;
        self
    }

    pub fn token_error_code(mut self, code: StatusCode) -> Self {
        self.token_error_code = code;
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn support_cancel(mut self) -> Self {
        self.support_cancel = true;
        self
    }

    pub fn cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel_handle = Some(handle);
        self
    }

    pub fn show_loading(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.show_loading = Some(Arc::new(f));
        self
    }

    pub fn hide_loading(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.hide_loading = Some(Arc::new(f));
        self
    }

    pub fn on_progress(mut self, f: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(f));
        self
    }

    pub fn log_request(mut self, f: impl Fn(&str, &RequestOptions) + Send + Sync + 'static) -> Self {
        self.log_request = Some(Arc::new(f));
        self
    }

    /// Receives the cancel handle before the request is issued. Implies
    /// [`support_cancel`](Self::support_cancel).
    pub fn handle_cancel(mut self, f: impl Fn(CancelHandle) + Send + Sync + 'static) -> Self {
        self.support_cancel = true;
        self.handle_cancel = Some(Arc::new(f));
        self
    }

    pub fn handle_error(mut self, f: impl Fn(&FetchError) + Send + Sync + 'static) -> Self {
        self.handle_error = Some(Arc::new(f));
        self
    }

    pub fn handle_unauthorized(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.handle_unauthorized = Some(Arc::new(f));
        self
    }

    /// Resolves the cancel handle for this call, if cancellation is enabled.
    pub(crate) fn resolve_cancel(&self) -> Option<CancelHandle> {
        match (&self.cancel_handle, self.support_cancel) {
            (Some(handle), _) => Some(handle.clone()),
            (None, true) => Some(CancelHandle::new()),
            (None, false) => None,
        }
    }

    /// Whether a failed attempt may be followed by another one.
    ///
    /// `attempts` counts retries already made, not including the first try.
    pub(crate) fn should_retry(&self, err: &FetchError, attempts: u32) -> bool {
        if !self.retry_on_error || attempts >= self.max_retries {
            return false;
        }
        if err.is_cancelled() {
            return self.retry_cancelled;
        }
        !err.is_preparation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RequestConfig::default();
        assert_eq!(config.method, Method::Get);
        assert!(!config.is_stream);
        assert!(!config.retry_on_error);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.token_error_code, StatusCode::UNAUTHORIZED);
        assert!(!config.support_cancel);
        assert!(config.resolve_cancel().is_none());
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(serde_json::to_string(&Method::Put).unwrap(), "\"PUT\"");
    }

    #[test]
    fn test_retry_disabled_by_default() {
        let config = RequestConfig::default();
        let err = FetchError::Transport("refused".into());
        assert!(!config.should_retry(&err, 0));
    }

    #[test]
    fn test_retry_bounded_by_max_retries() {
        let config = RequestConfig::new().retry(2);
        let err = FetchError::Transport("refused".into());
        assert!(config.should_retry(&err, 0));
        assert!(config.should_retry(&err, 1));
        assert!(!config.should_retry(&err, 2));
    }

    #[test]
    fn test_cancelled_not_retried_unless_opted_in() {
        let config = RequestConfig::new().retry(3);
        assert!(!config.should_retry(&FetchError::Cancelled, 0));

        let config = config.retry_cancelled(true);
        assert!(config.should_retry(&FetchError::Cancelled, 0));
    }

    #[test]
    fn test_handle_cancel_enables_cancellation() {
        let config = RequestConfig::new().handle_cancel(|_| {});
        assert!(config.support_cancel);
        assert!(config.resolve_cancel().is_some());
    }

    #[test]
    fn test_supplied_cancel_handle_is_reused() {
        let handle = CancelHandle::new();
        let config = RequestConfig::new().cancel_handle(handle.clone());
        let resolved = config.resolve_cancel().unwrap();
        handle.abort();
        assert!(resolved.is_aborted());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = RequestConfig::new().token("secret-token");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
