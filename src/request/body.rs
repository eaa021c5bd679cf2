//! Response body interpretation: stream, progress, or JSON.

use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::Response;
use reqwest::header::CONTENT_LENGTH;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::config::{ProgressHook, RequestConfig};
use crate::error::FetchError;

/// Reads the body in the mode selected by `config`.
///
/// Text results (stream and progress modes) are handed to `T` as a JSON
/// string, so `T` is usually `String` or [`Value`] in those modes.
pub(crate) async fn interpret<T: DeserializeOwned>(
    response: Response,
    config: &RequestConfig,
) -> Result<T, FetchError> {
    if config.is_stream {
        let text = read_text(response, None).await?;
        Ok(serde_json::from_value(Value::String(text))?)
    } else if let Some(on_progress) = &config.on_progress {
        let text = read_text(response, Some(on_progress)).await?;
        Ok(serde_json::from_value(Value::String(text))?)
    } else {
        Ok(response.json::<T>().await?)
    }
}

/// Content length as declared by the header, read once.
fn declared_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|len| *len > 0)
}

/// Drains the body chunk by chunk in arrival order and decodes it as UTF-8.
///
/// With a progress hook, reports `received / declared * 100` after every
/// chunk. Without a usable content length the hook is never called.
async fn read_text(response: Response, on_progress: Option<&ProgressHook>) -> Result<String, FetchError> {
    let declared = declared_length(&response);
    let on_progress = match (on_progress, declared) {
        (Some(hook), Some(_)) => Some(hook),
        (Some(_), None) => {
            debug!("No usable Content-Length, progress is indeterminate");
            None
        }
        (None, _) => None,
    };

    let mut buf = BytesMut::new();
    let mut chunks = response.bytes_stream();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        buf.extend_from_slice(&chunk);

        if let (Some(hook), Some(total)) = (on_progress, declared) {
            hook(buf.len() as f64 / total as f64 * 100.0);
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
