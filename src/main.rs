//! CLI entry point for fetch_wrapper.
//!
//! Sends a single request through [`FetchWrapper`] and writes the
//! `{data, code, msg}` envelope to stdout as JSON. Logs go to stderr and to a
//! rolling JSON log file.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fetch_wrapper::{
    ApiResponse, CancelHandle, ClientConfig, FetchWrapper, Method, RequestConfig,
    output::{print_pretty, write_json},
};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fetch_wrapper")]
#[command(about = "Send HTTP requests and get a uniform {data, code, msg} response", long_about = None)]
struct Cli {
    /// JSON config file; FETCH_* environment variables are used when omitted
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Base URL prepended to every endpoint (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Default bearer token (overrides config)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RequestArgs {
    /// Endpoint path appended to the base URL (e.g. "/users/1")
    #[arg(value_name = "ENDPOINT")]
    endpoint: String,

    /// Extra request header as "Name: value" (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Read the body as a raw byte stream and return it as text
    #[arg(long, default_value_t = false)]
    stream: bool,

    /// Log download progress; the body is returned as text
    #[arg(long, default_value_t = false)]
    progress: bool,

    /// Retry failed attempts up to N times
    #[arg(long, value_name = "N")]
    retry: Option<u32>,

    /// Status code that means the token was rejected
    #[arg(long)]
    token_error_code: Option<u16>,
}

#[derive(Args)]
struct BodyArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// JSON request body
    #[arg(short, long)]
    data: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a GET request
    Get(RequestArgs),
    /// Send a DELETE request
    Delete(RequestArgs),
    /// Send a POST request with an optional JSON body
    Post(BodyArgs),
    /// Send a PUT request with an optional JSON body
    Put(BodyArgs),
    /// Send a PATCH request with an optional JSON body
    Patch(BodyArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fetch_wrapper.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fetch_wrapper.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut client_config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::from_env()?,
    };
    if let Some(base_url) = cli.base_url {
        client_config.base_url = base_url;
    }
    if let Some(token) = cli.token {
        client_config.token = Some(token);
    }
    client_config.validate()?;

    let wrapper = FetchWrapper::with_client(
        client_config.build_client()?,
        client_config.base_url.clone(),
        client_config.token.clone(),
    );

    let (method, args, data) = match cli.command {
        Commands::Get(args) => (Method::Get, args, None),
        Commands::Delete(args) => (Method::Delete, args, None),
        Commands::Post(b) => (Method::Post, b.request, b.data),
        Commands::Put(b) => (Method::Put, b.request, b.data),
        Commands::Patch(b) => (Method::Patch, b.request, b.data),
    };

    let body: Option<Value> = data
        .map(|d| serde_json::from_str(&d))
        .transpose()
        .context("--data is not valid JSON")?;

    // Ctrl-C aborts the in-flight request instead of killing the process.
    let cancel = CancelHandle::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            on_interrupt.abort();
        }
    });

    let config = request_config(&client_config, &args)?.cancel_handle(cancel);
    let endpoint = args.endpoint.as_str();

    let response: ApiResponse<Value> = match method {
        Method::Get => wrapper.get(endpoint, config).await?,
        Method::Delete => wrapper.delete(endpoint, config).await?,
        Method::Post => wrapper.post(endpoint, body.as_ref(), config).await?,
        Method::Put => wrapper.put(endpoint, body.as_ref(), config).await?,
        Method::Patch => wrapper.patch(endpoint, body.as_ref(), config).await?,
    };

    print_pretty(&response);
    write_json(&mut std::io::stdout().lock(), &response)?;

    Ok(())
}

/// Builds the per-call config from client defaults and CLI flags, with
/// lifecycle hooks reported through tracing.
fn request_config(client: &ClientConfig, args: &RequestArgs) -> Result<RequestConfig> {
    let mut config = client
        .request_defaults()?
        .headers(parse_headers(&args.headers)?)
        .show_loading(|| info!("Request started"))
        .hide_loading(|| debug!("Request finished"))
        .handle_unauthorized(|| warn!("Server rejected the token"))
        .handle_error(|e| error!(error = %e, "Request failed"));

    if args.stream {
        config = config.stream();
    }
    if args.progress {
        config = config.on_progress(|percent| info!(percent, "Download progress"));
    }
    if let Some(max_retries) = args.retry {
        config = config.retry(max_retries);
    }
    if let Some(code) = args.token_error_code {
        let status = StatusCode::from_u16(code)
            .with_context(|| format!("invalid --token-error-code {code}"))?;
        config = config.token_error_code(status);
    }

    Ok(config)
}

/// Parses repeated `-H "Name: value"` flags.
fn parse_headers(raw: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let (name, value) = entry
            .split_once(':')
            .with_context(|| format!("header '{entry}' must look like 'Name: value'"))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("invalid header name in '{entry}'"))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("invalid header value in '{entry}'"))?;
        headers.append(name, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers(&[
            "Accept: application/json".to_string(),
            "X-Tag: a".to_string(),
            "X-Tag: b".to_string(),
        ])
        .unwrap();
        assert_eq!(headers["accept"], "application/json");
        assert_eq!(headers.get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn test_parse_headers_rejects_missing_colon() {
        assert!(parse_headers(&["Accept application/json".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_post_with_body() {
        let cli = Cli::try_parse_from([
            "fetch_wrapper",
            "--base-url",
            "https://api.example.com",
            "post",
            "/submit",
            "--data",
            r#"{"name":"Tom"}"#,
            "--retry",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("https://api.example.com"));
        match cli.command {
            Commands::Post(b) => {
                assert_eq!(b.request.endpoint, "/submit");
                assert_eq!(b.request.retry, Some(2));
                assert_eq!(b.data.as_deref(), Some(r#"{"name":"Tom"}"#));
            }
            _ => panic!("expected post"),
        }
    }

    #[test]
    fn test_request_config_from_flags() {
        let client = ClientConfig {
            base_url: "https://api.example.com".into(),
            ..Default::default()
        };
        let args = RequestArgs {
            endpoint: "/x".into(),
            headers: vec!["X-Trace: 1".into()],
            stream: true,
            progress: true,
            retry: Some(4),
            token_error_code: Some(403),
        };

        let config = request_config(&client, &args).unwrap();
        assert!(config.is_stream);
        assert!(config.on_progress.is_some());
        assert!(config.retry_on_error);
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.token_error_code, StatusCode::FORBIDDEN);
        assert_eq!(config.headers["x-trace"], "1");
    }
}
