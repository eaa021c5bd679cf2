use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Request, Response};

use crate::error::FetchError;

/// The transport boundary: performs one network call and returns the raw
/// response.
///
/// Implementations must not interpret status codes; a 4xx/5xx is still an
/// `Ok` response.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> Result<Response, FetchError>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    async fn execute(&self, req: Request) -> Result<Response, FetchError> {
        (**self).execute(req).await
    }
}
