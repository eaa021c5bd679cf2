pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod request;
pub mod wrapper;

pub use config::ClientConfig;
pub use error::FetchError;
pub use fetch::{BasicClient, CancelHandle, HttpClient};
pub use request::{ApiResponse, Method, RequestConfig, RequestExecutor, RequestOptions};
pub use wrapper::{FetchFns, FetchWrapper, fetch_fns, fetch_wrapper};
