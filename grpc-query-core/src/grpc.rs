//! # Dynamic gRPC Client
//!
//! Low-level building blocks for performing gRPC calls without generated message types.
//! Requests and responses are plain `serde_json::Value`s, transcoded to and from protobuf
//! using the method's descriptors.
pub mod client;
pub mod codec;
