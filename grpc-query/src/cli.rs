//! # CLI
//!
//! Command-line interface of `grpc-query`, parsed with `clap`.
//!
//! Values are validated while parsing: the endpoint must be `package.Service/Method`,
//! headers must be `key:value` and the body must be valid JSON.
use clap::Parser;
use std::path::PathBuf;

/// Perform one gRPC query and print its `{ "data": ... }` envelope.
///
/// ## Examples:
///
/// ```bash
/// grpc-query --host http://localhost:50051 --file-descriptor-set echo.bin \
///     echo.EchoService/UnaryEcho --body '{"message": "hi"}'
/// ```
#[derive(Parser, Debug)]
#[command(name = "grpc-query", version, about = "Run a gRPC query")]
pub struct Cli {
    /// Endpoint (package.Service/Method)
    #[arg(value_parser = parse_endpoint)]
    pub endpoint: (String, String),

    /// JSON body of the single request message
    #[arg(long, value_parser = parse_body)]
    pub body: serde_json::Value,

    /// Path to the descriptor set (.bin) that defines the method
    #[arg(long)]
    pub file_descriptor_set: PathBuf,

    /// The server URL (e.g. http://localhost:50051). Overrides the config file.
    #[arg(long)]
    pub host: Option<String>,

    /// JSON file with the query configuration (`host`, `headers`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

fn parse_endpoint(value: &str) -> Result<(String, String), String> {
    let (service, method) = value.split_once('/').ok_or_else(|| {
        format!("Invalid endpoint format: '{value}'. Expected 'package.Service/Method'",)
    })?;

    if service.trim().is_empty() || method.trim().is_empty() {
        return Err("Service and Method names cannot be empty".to_string());
    }

    Ok((service.to_string(), method.to_string()))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    s.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| "Format must be 'key:value'".to_string())
}

fn parse_body(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command() {
        let cli = Cli::try_parse_from([
            "grpc-query",
            "echo.EchoService/UnaryEcho",
            "--body",
            r#"{"message": "hi"}"#,
            "--file-descriptor-set",
            "echo.bin",
            "--host",
            "http://localhost:50051",
            "-H",
            "x-trace: abc",
        ])
        .unwrap();

        assert_eq!(
            cli.endpoint,
            ("echo.EchoService".to_string(), "UnaryEcho".to_string())
        );
        assert_eq!(cli.body, serde_json::json!({ "message": "hi" }));
        assert_eq!(cli.host.as_deref(), Some("http://localhost:50051"));
        assert_eq!(cli.headers, vec![("x-trace".to_string(), "abc".to_string())]);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_endpoint_requires_separator() {
        assert!(parse_endpoint("echo.EchoService.UnaryEcho").is_err());
        assert!(parse_endpoint("echo.EchoService/ ").is_err());
    }

    #[test]
    fn test_parse_header_requires_colon() {
        assert!(parse_header("x-trace").is_err());
    }

    #[test]
    fn test_parse_body_rejects_invalid_json() {
        assert!(parse_body("{not json").is_err());
    }
}
