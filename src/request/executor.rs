//! The request-execution routine shared by every public surface.

use hyper::ext::ReasonPhrase;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::body;
use super::config::RequestConfig;
use super::options::RequestOptions;
use super::response::ApiResponse;
use crate::error::FetchError;
use crate::fetch::{BasicClient, CancelHandle, HttpClient};

/// Runs requests against `base_url` through a transport `C`.
///
/// Holds only read-only state (base URL, default token), so one executor can
/// serve any number of concurrent calls.
#[derive(Debug)]
pub struct RequestExecutor<C = BasicClient> {
    client: C,
    base_url: String,
    token: Option<String>,
}

impl<C: HttpClient> RequestExecutor<C> {
    pub fn new(client: C, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub(crate) fn into_client(self) -> C {
        self.client
    }

    /// Executes one call: prepare, attempt (with retries), tear down.
    ///
    /// show-loading runs before the first attempt; hide-loading and the request
    /// log run once after the terminal attempt, whatever its outcome.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt once retries are exhausted or
    /// disabled, or a preparation error (bad URL or header) before any attempt.
    #[tracing::instrument(skip(self, config), fields(method = %config.method))]
    pub async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError> {
        let cancel = config.resolve_cancel();

        // A failed preparation still reaches the request log, with whatever
        // options could be built. Show never ran, so neither does hide.
        let options = match RequestOptions::build(&config, self.token.as_deref(), cancel.is_some()) {
            Ok(options) => options,
            Err(err) => {
                report_error(&config, endpoint, &err);
                log_request(&config, endpoint, &RequestOptions::unprepared(&config, cancel.is_some()));
                return Err(err);
            }
        };
        let url = match self.url_for(endpoint) {
            Ok(url) => url,
            Err(err) => {
                report_error(&config, endpoint, &err);
                log_request(&config, endpoint, &options);
                return Err(err);
            }
        };

        if let (Some(handle), Some(on_cancel)) = (&cancel, &config.handle_cancel) {
            on_cancel(handle.clone());
        }
        if let Some(show) = &config.show_loading {
            show();
        }

        let mut attempts = 0;
        let outcome = loop {
            match self.attempt(&url, &options, &config, cancel.as_ref()).await {
                Ok(response) => break Ok(response),
                Err(err) if config.should_retry(&err, attempts) => {
                    attempts += 1;
                    warn!(attempt = attempts, endpoint, error = %err, "Retry attempt");
                }
                Err(err) => {
                    report_error(&config, endpoint, &err);
                    break Err(err);
                }
            }
        };

        if let Some(hide) = &config.hide_loading {
            hide();
        }
        log_request(&config, endpoint, &options);

        outcome
    }

    fn url_for(&self, endpoint: &str) -> Result<Url, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);
        Url::parse(&url).map_err(|e| FetchError::InvalidUrl {
            url,
            reason: e.to_string(),
        })
    }

    /// One fetch-and-interpret pass, raced against the cancel handle.
    async fn attempt<T: DeserializeOwned>(
        &self,
        url: &Url,
        options: &RequestOptions,
        config: &RequestConfig,
        cancel: Option<&CancelHandle>,
    ) -> Result<ApiResponse<T>, FetchError> {
        let exchange = async {
            let response = self.client.execute(options.to_request(url)).await?;
            let status = response.status();

            if status == config.token_error_code {
                if let Some(on_unauthorized) = &config.handle_unauthorized {
                    on_unauthorized();
                }
            }

            let msg = status_text(&response);
            let data = body::interpret(response, config).await?;
            Ok::<_, FetchError>(ApiResponse {
                data,
                code: status.as_u16(),
                msg,
            })
        };

        match cancel {
            // Dropping `exchange` drops the in-flight transport future.
            Some(handle) => tokio::select! {
                biased;
                _ = handle.aborted() => Err(FetchError::Cancelled),
                result = exchange => result,
            },
            None => exchange.await,
        }
    }
}

/// The reason phrase the server sent, falling back to the canonical one.
fn status_text(response: &Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response.status().canonical_reason().unwrap_or_default().to_string(),
    }
}

fn log_request(config: &RequestConfig, endpoint: &str, options: &RequestOptions) {
    match &config.log_request {
        Some(log) => log(endpoint, options),
        None => debug!(endpoint, ?options, "Request made"),
    }
}

pub(crate) fn report_error(config: &RequestConfig, endpoint: &str, err: &FetchError) {
    match &config.handle_error {
        Some(handle) => handle(err),
        None => error!(endpoint, error = %err, "Request failed"),
    }
}
