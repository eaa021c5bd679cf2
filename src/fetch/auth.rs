use reqwest::header::HeaderValue;

use crate::error::FetchError;

/// Resolves the `Authorization` header value for a request.
///
/// `stored` is the executor's default token and `per_call` the token supplied
/// with a single request. When both are present the stored token wins. Empty
/// strings count as absent. The returned value is marked sensitive so it is
/// redacted from `Debug` output (and therefore from request logs).
pub fn bearer_header(
    stored: Option<&str>,
    per_call: Option<&str>,
) -> Result<Option<HeaderValue>, FetchError> {
    let token = stored
        .filter(|t| !t.is_empty())
        .or(per_call.filter(|t| !t.is_empty()));

    let Some(token) = token else {
        return Ok(None);
    };

    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    Ok(Some(value))
}
