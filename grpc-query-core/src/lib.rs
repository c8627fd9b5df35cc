//! # gRPC Query Core
//!
//! `grpc-query-core` lets a data-fetching layer issue gRPC calls through a callback-style
//! transport and await a single `{ data }` envelope, for both unary and server-streaming
//! methods.
//!
//! ## Key Components
//!
//! * **[`GrpcBaseQuery`]:** The call bridge. Built once with [`grpc_base_query`], it turns
//!   every `(method, request)` pair into one transport call and settles a future with either
//!   the single response, the ordered list of streamed responses, or a [`CallError`].
//! * **[`Transport`] & [`CallHandler`]:** The seam between the bridge and whatever performs
//!   the network exchange. A transport pushes messages and one terminal [`CallEnd`] into the
//!   handler it was given.
//! * **[`GrpcTransport`]:** The default transport, driving calls over `tonic` with the
//!   dynamic [`GrpcClient`].
//!
//! ## Internal clients
//!
//! * **[`GrpcClient`]:** A dynamic gRPC client that speaks JSON on the Rust side and protobuf
//!   on the wire, through [`grpc::codec::JsonCodec`].
//!
//! ## Re-exports
//!
//! This crate re-exports `prost-reflect` and `tonic` so that consumers build method
//! descriptors and status codes against the same versions the bridge uses.
pub mod grpc;
pub mod query;
pub mod schema;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use grpc::client::GrpcClient;
pub use query::{
    BaseQueryArgs, CallError, GrpcArgs, GrpcBaseQuery, QueryData, QueryError, QueryResult,
    SetupWarning, grpc_base_query,
};
pub use transport::{CallEnd, CallHandler, Invocation, Transport, grpc::GrpcTransport};

// Re-exports
pub use prost_reflect;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
