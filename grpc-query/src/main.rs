//! # gRPC Query CLI Entry Point
//!
//! Drives a single query end to end:
//!
//! 1. **Initialization**: Parses arguments with [`cli::Cli`] and installs the log subscriber.
//! 2. **Configuration**: Loads [`grpc_query_core::BaseQueryArgs`] from the optional config file,
//!    with `--host` taking precedence.
//! 3. **Resolution**: Finds the method in the given descriptor set.
//! 4. **Execution**: Runs the query through a `GrpcTransport` and prints the `{ "data" }`
//!    envelope, or the failure on standard error.

mod cli;
mod config;
mod formatter;

use clap::Parser;
use cli::Cli;
use formatter::{FormattedString, GenericError};
use grpc_query_core::{GrpcArgs, GrpcTransport, grpc_base_query, schema};
use std::process;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let args = Cli::parse();

    let config = match config::load(args.config.as_deref(), args.host) {
        Ok(config) => config,
        Err(err) => exit_with(GenericError("Invalid configuration", format!("{err:#}"))),
    };

    let bytes = match std::fs::read(&args.file_descriptor_set) {
        Ok(bytes) => bytes,
        Err(err) => exit_with(err),
    };

    let pool = match schema::decode_descriptor_pool(&bytes) {
        Ok(pool) => pool,
        Err(err) => exit_with(err),
    };

    let (service, method) = args.endpoint;
    let method = match schema::find_method(&pool, &service, &method) {
        Ok(method) => method,
        Err(err) => exit_with(err),
    };

    let base_query = grpc_base_query(config, GrpcTransport::new());
    let request = GrpcArgs {
        method,
        request: args.body,
        headers: args.headers,
    };

    match base_query.query(request).await {
        Ok(result) => println!("{}", FormattedString::from(result)),
        Err(err) => exit_with(err),
    }
}

fn exit_with(err: impl Into<FormattedString>) -> ! {
    eprintln!("{}", err.into());
    process::exit(1);
}
