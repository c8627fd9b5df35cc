//! # Echo Service
//!
//! **INTERNAL USE ONLY**: generated server bindings and descriptor set used by the
//! `grpc-query-core` integration tests. Not intended for production use.

pub mod pb {
    include!(concat!(env!("OUT_DIR"), "/echo.rs"));
}

pub use pb::echo_service_server::{EchoService, EchoServiceServer};
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("descriptors");
