//! Output formatting for responses.
//!
//! Supports debug logging and pretty JSON written to any writer.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::request::ApiResponse;

/// Logs a response using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(response: &ApiResponse<T>) {
    debug!("{:#?}", response);
}

/// Writes a response envelope as pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize, W: Write>(writer: &mut W, response: &ApiResponse<T>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn sample() -> ApiResponse<Value> {
        ApiResponse {
            data: json!({"foo": "bar"}),
            code: 200,
            msg: "OK".into(),
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample());
    }

    #[test]
    fn test_write_json_round_trips_envelope() {
        let mut out = Vec::new();
        write_json(&mut out, &sample()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let parsed: ApiResponse<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_write_json_text_body() {
        let response = ApiResponse {
            data: "streamed text".to_string(),
            code: 206,
            msg: "Partial Content".into(),
        };
        let mut out = Vec::new();
        write_json(&mut out, &response).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\"data\": \"streamed text\""));
    }
}
