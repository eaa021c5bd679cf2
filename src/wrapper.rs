//! Public call surfaces over [`RequestExecutor`].
//!
//! [`FetchWrapper`] is the object-style client; [`fetch_wrapper`] /
//! [`fetch_fns`] build the factory-style [`FetchFns`]. Both only pin the HTTP
//! method (and, for post/put/patch, the body) and delegate to the same
//! executor.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::fetch::{BasicClient, HttpClient};
use crate::request::{ApiResponse, Method, RequestConfig, RequestExecutor, report_error};

/// Pins `method` onto `config` and runs it. Every other field, the body
/// included, passes through untouched.
async fn dispatch<C, T>(
    executor: &RequestExecutor<C>,
    method: Method,
    endpoint: &str,
    mut config: RequestConfig,
) -> Result<ApiResponse<T>, FetchError>
where
    C: HttpClient,
    T: DeserializeOwned,
{
    config.method = method;
    executor.execute(endpoint, config).await
}

/// Like [`dispatch`], but the body argument replaces any body already set on
/// `config`.
async fn dispatch_with_body<C, T, B>(
    executor: &RequestExecutor<C>,
    method: Method,
    endpoint: &str,
    body: Option<&B>,
    mut config: RequestConfig,
) -> Result<ApiResponse<T>, FetchError>
where
    C: HttpClient,
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    config.body = match body.map(serde_json::to_value).transpose() {
        Ok(body) => body,
        Err(err) => {
            let err = FetchError::from(err);
            report_error(&config, endpoint, &err);
            return Err(err);
        }
    };
    dispatch(executor, method, endpoint, config).await
}

/// Object-style client bound to a base URL and an optional default token.
///
/// The default token is fixed for the lifetime of the instance; use
/// [`FetchWrapper::with_token`] to re-construct with a different one.
#[derive(Debug)]
pub struct FetchWrapper<C = BasicClient> {
    executor: RequestExecutor<C>,
}

impl FetchWrapper<BasicClient> {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self::with_client(BasicClient::new(), base_url, token)
    }
}

impl<C: HttpClient> FetchWrapper<C> {
    pub fn with_client(client: C, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            executor: RequestExecutor::new(client, base_url, token),
        }
    }

    /// Rebuilds the wrapper around the same transport with a new default token.
    pub fn with_token(self, token: Option<String>) -> Self {
        let base_url = self.executor.base_url().to_string();
        Self::with_client(self.executor.into_client(), base_url, token)
    }

    pub fn executor(&self) -> &RequestExecutor<C> {
        &self.executor
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError> {
        dispatch(&self.executor, Method::Get, endpoint, config).await
    }

    pub async fn post<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        dispatch_with_body(&self.executor, Method::Post, endpoint, body, config).await
    }

    pub async fn put<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        dispatch_with_body(&self.executor, Method::Put, endpoint, body, config).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError> {
        dispatch(&self.executor, Method::Delete, endpoint, config).await
    }

    pub async fn patch<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        dispatch_with_body(&self.executor, Method::Patch, endpoint, body, config).await
    }
}

/// Factory-style surface: a cheap, cloneable bundle of verb functions that
/// capture the base URL and token at creation.
#[derive(Debug)]
pub struct FetchFns<C = BasicClient> {
    executor: Arc<RequestExecutor<C>>,
}

impl<C> Clone for FetchFns<C> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
        }
    }
}

/// Builds [`FetchFns`] over the default reqwest transport.
pub fn fetch_wrapper(base_url: impl Into<String>, token: Option<String>) -> FetchFns {
    fetch_fns(BasicClient::new(), base_url, token)
}

/// Builds [`FetchFns`] over any transport.
pub fn fetch_fns<C: HttpClient>(
    client: C,
    base_url: impl Into<String>,
    token: Option<String>,
) -> FetchFns<C> {
    FetchFns {
        executor: Arc::new(RequestExecutor::new(client, base_url, token)),
    }
}

impl<C: HttpClient> FetchFns<C> {
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError> {
        dispatch(&self.executor, Method::Get, endpoint, config).await
    }

    pub async fn post<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        dispatch_with_body(&self.executor, Method::Post, endpoint, body, config).await
    }

    pub async fn put<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        dispatch_with_body(&self.executor, Method::Put, endpoint, body, config).await
    }

    pub async fn del<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError> {
        dispatch(&self.executor, Method::Delete, endpoint, config).await
    }

    pub async fn patch<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: RequestConfig,
    ) -> Result<ApiResponse<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        dispatch_with_body(&self.executor, Method::Patch, endpoint, body, config).await
    }
}
