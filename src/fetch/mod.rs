//! Transport layer: the [`HttpClient`] seam, its reqwest-backed default, and
//! the pieces the executor layers on top (bearer auth, cancellation).

mod auth;
mod basic;
mod cancel;
mod client;
#[cfg(test)]
pub(crate) mod mock;

pub use auth::bearer_header;
pub use basic::BasicClient;
pub use cancel::CancelHandle;
pub use client::HttpClient;
