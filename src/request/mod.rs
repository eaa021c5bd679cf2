//! Request execution: per-call configuration, option building, body
//! interpretation, and the retrying executor.

mod body;
pub mod config;
mod executor;
mod options;
mod response;

pub use config::{Method, RequestConfig};
pub use executor::RequestExecutor;
pub(crate) use executor::report_error;
pub use options::RequestOptions;
pub use response::ApiResponse;
