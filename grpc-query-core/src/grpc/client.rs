//! # Generic gRPC Client
//!
//! Wraps `tonic::client::Grpc` so that any method can be called knowing only its
//! [`MethodDescriptor`]. The HTTP/2 path (`/package.Service/Method`) is derived from the
//! descriptor at runtime and payloads go through [`JsonCodec`].
//!
//! Only the call shapes that take a single request message are exposed: unary and server
//! streaming.
//!
//! Every call returns `Result<Result<T, Status>, GrpcRequestError>`:
//!
//! * `Err(GrpcRequestError)` - the request could not be sent (service not ready, bad header).
//! * `Ok(Err(Status))` - the call reached the server, which answered with an error status.
//! * `Ok(Ok(T))` - the call succeeded.
use super::codec::JsonCodec;
use crate::BoxError;
use http::uri::{InvalidUri, PathAndQuery};
use http_body::Body as HttpBody;
use prost_reflect::MethodDescriptor;
use std::str::FromStr;
use tonic::{
    Code, Response, Status, Streaming,
    client::GrpcService,
    metadata::{
        MetadataKey, MetadataValue,
        errors::{InvalidMetadataKey, InvalidMetadataValue},
    },
    transport::Channel,
};

#[derive(thiserror::Error, Debug)]
pub enum GrpcRequestError {
    #[error("Internal error, the client was not ready: '{0}'")]
    ClientNotReady(#[source] BoxError),
    #[error("Invalid gRPC path '{path}': '{source}'")]
    InvalidPath { path: String, source: InvalidUri },
    #[error("Invalid metadata (header) key '{key}': '{source}'")]
    InvalidMetadataKey {
        key: String,
        source: InvalidMetadataKey,
    },
    #[error("Invalid metadata (header) value for key '{key}': '{source}'")]
    InvalidMetadataValue {
        key: String,
        source: InvalidMetadataValue,
    },
}

impl GrpcRequestError {
    /// The status code a transport reports when the request never left the client.
    pub fn code(&self) -> Code {
        match self {
            GrpcRequestError::ClientNotReady(_) => Code::Unavailable,
            GrpcRequestError::InvalidPath { .. } => Code::Internal,
            GrpcRequestError::InvalidMetadataKey { .. }
            | GrpcRequestError::InvalidMetadataValue { .. } => Code::InvalidArgument,
        }
    }
}

/// A dynamic gRPC client over any `tonic` service (a `Channel` by default).
#[derive(Debug, Clone)]
pub struct GrpcClient<S = Channel> {
    client: tonic::client::Grpc<S>,
}

impl<S> GrpcClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn new(service: S) -> Self {
        let client = tonic::client::Grpc::new(service);
        Self { client }
    }

    /// Performs a Unary gRPC call (Single Request -> Single Response).
    ///
    /// The returned [`Response`] keeps the response metadata, which for unary calls also
    /// carries the trailers sent by the server.
    pub async fn unary(
        &mut self,
        method: MethodDescriptor,
        payload: serde_json::Value,
        headers: Vec<(String, String)>,
    ) -> Result<Result<Response<serde_json::Value>, Status>, GrpcRequestError> {
        self.client
            .ready()
            .await
            .map_err(|e| GrpcRequestError::ClientNotReady(e.into()))?;

        let codec = JsonCodec::for_method(&method);
        let path = http_path(&method)?;
        let request = build_request(payload, headers)?;

        Ok(self.client.unary(request, path, codec).await)
    }

    /// Performs a Server Streaming gRPC call (Single Request -> Stream of Responses).
    ///
    /// The stream is handed back as [`Streaming`] so the caller can read the trailers once
    /// every message has been consumed.
    pub async fn server_streaming(
        &mut self,
        method: MethodDescriptor,
        payload: serde_json::Value,
        headers: Vec<(String, String)>,
    ) -> Result<Result<Streaming<serde_json::Value>, Status>, GrpcRequestError> {
        self.client
            .ready()
            .await
            .map_err(|e| GrpcRequestError::ClientNotReady(e.into()))?;

        let codec = JsonCodec::for_method(&method);
        let path = http_path(&method)?;
        let request = build_request(payload, headers)?;

        Ok(self
            .client
            .server_streaming(request, path, codec)
            .await
            .map(Response::into_inner))
    }
}

fn http_path(method: &MethodDescriptor) -> Result<PathAndQuery, GrpcRequestError> {
    let path = format!("/{}/{}", method.parent_service().full_name(), method.name());
    PathAndQuery::from_str(&path).map_err(|source| GrpcRequestError::InvalidPath { path, source })
}

fn build_request<T>(
    payload: T,
    headers: Vec<(String, String)>,
) -> Result<tonic::Request<T>, GrpcRequestError> {
    let mut request = tonic::Request::new(payload);
    for (k, v) in headers {
        let key =
            MetadataKey::from_str(&k).map_err(|source| GrpcRequestError::InvalidMetadataKey {
                key: k.clone(),
                source,
            })?;
        let val = MetadataValue::from_str(&v)
            .map_err(|source| GrpcRequestError::InvalidMetadataValue { key: k, source })?;
        request.metadata_mut().append(key, val);
    }
    Ok(request)
}
