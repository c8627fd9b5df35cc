//! # Base Query
//!
//! Bridges a callback-style [`Transport`] into a single awaitable result.
//!
//! Each call to [`GrpcBaseQuery::query`] opens exactly one transport call and parks on a
//! oneshot channel. The handler given to the transport owns the sending half and settles it
//! at most once:
//!
//! * **Unary methods**: the first message settles the call. Anything that arrives afterwards,
//!   the terminal signal included, finds the call already settled and is ignored.
//! * **Server streaming methods**: messages are accumulated in arrival order and the call
//!   settles with the whole list when the transport reports `OK`.
//! * **Non-OK completion**: the call settles with a [`CallError`] carrying the status code and
//!   message, unless it was already settled.
//!
//! A unary call that completes `OK` without sending a message settles with an empty list.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grpc_query_core::{BaseQueryArgs, GrpcArgs, GrpcTransport, grpc_base_query, schema};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = schema::decode_descriptor_pool(&std::fs::read("descriptor.bin")?)?;
//! let method = schema::find_method(&pool, "echo.EchoService", "UnaryEcho")?;
//!
//! let base_query = grpc_base_query(
//!     BaseQueryArgs::new("http://localhost:50051"),
//!     GrpcTransport::new(),
//! );
//!
//! let result = base_query
//!     .query(GrpcArgs::new(method, serde_json::json!({ "message": "hi" })))
//!     .await?;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```
mod types;

pub use types::*;

use crate::transport::{CallEnd, CallHandler, Invocation, Transport};
use tokio::sync::oneshot;

type Settlement = Result<QueryData, CallError>;

/// Builds a [`GrpcBaseQuery`] over `transport`.
///
/// A transport that reports itself unavailable, or a missing host, is logged as a warning
/// and recorded in [`GrpcBaseQuery::warnings`]. Neither stops the query from being built or
/// used.
pub fn grpc_base_query<T: Transport>(args: BaseQueryArgs, transport: T) -> GrpcBaseQuery<T> {
    let mut warnings = Vec::new();
    if !transport.is_available() {
        warnings.push(SetupWarning::TransportUnavailable);
    }
    if args.host.is_none() {
        warnings.push(SetupWarning::MissingHost);
    }

    for warning in &warnings {
        tracing::warn!("gRPC base query: {warning}");
    }

    GrpcBaseQuery {
        transport,
        args,
        warnings,
    }
}

/// Runs calls through a [`Transport`] and resolves them to a [`QueryResult`].
#[derive(Debug, Clone)]
pub struct GrpcBaseQuery<T> {
    transport: T,
    args: BaseQueryArgs,
    warnings: Vec<SetupWarning>,
}

impl<T: Transport> GrpcBaseQuery<T> {
    /// Performs one call.
    ///
    /// Dropping the returned future does not cancel the transport call; its outcome is
    /// discarded once it completes.
    pub async fn query(&self, args: GrpcArgs) -> Result<QueryResult, QueryError> {
        let GrpcArgs {
            method,
            request,
            headers,
        } = args;

        let (tx, rx) = oneshot::channel();
        let handler = Settle::new(method.is_server_streaming(), tx);

        tracing::debug!(
            method = method.full_name(),
            streaming = method.is_server_streaming(),
            "dispatching query"
        );

        let invocation = Invocation {
            method,
            request,
            host: self.args.host.clone(),
            headers: self.args.headers.iter().cloned().chain(headers).collect(),
        };
        self.transport.invoke(invocation, handler);

        let data = rx.await.map_err(|_| QueryError::Abandoned)??;
        Ok(QueryResult { data })
    }

    pub fn warnings(&self) -> &[SetupWarning] {
        &self.warnings
    }

    pub fn host(&self) -> Option<&str> {
        self.args.host.as_deref()
    }
}

/// The handler of one call: accumulates streamed messages and settles the pending result.
struct Settle {
    response_stream: bool,
    messages: Vec<serde_json::Value>,
    tx: Option<oneshot::Sender<Settlement>>,
}

impl Settle {
    fn new(response_stream: bool, tx: oneshot::Sender<Settlement>) -> Self {
        Self {
            response_stream,
            messages: Vec::new(),
            tx: Some(tx),
        }
    }

    fn settle(&mut self, settlement: Settlement) {
        if let Some(tx) = self.tx.take() {
            // The caller may have stopped waiting.
            let _ = tx.send(settlement);
        }
    }
}

impl CallHandler for Settle {
    fn on_message(&mut self, message: serde_json::Value) {
        if self.response_stream {
            self.messages.push(message);
        } else {
            self.settle(Ok(QueryData::Message(message)));
        }
    }

    fn on_end(mut self, end: CallEnd) {
        if end.is_ok() {
            let messages = std::mem::take(&mut self.messages);
            self.settle(Ok(QueryData::Messages(messages)));
        } else {
            tracing::debug!(code = ?end.code, message = ?end.message, "gRPC call failed");
            self.settle(Err(CallError {
                code: end.code,
                msg: end.message,
            }));
        }
    }
}
