//! # gRPC Transport
//!
//! The default [`Transport`]: every invocation runs on its own tokio task, using the dynamic
//! [`GrpcClient`] over a `tonic` service, and reports progress to the call handler.
//!
//! ## Services
//!
//! * [`GrpcTransport::new`] connects to the invocation's host lazily, on first use.
//! * [`GrpcTransport::from_service`] sends every call to a fixed service (an in-process
//!   server, or an already configured `Channel`) and ignores the host.
//!
//! ## Failures before the call
//!
//! Problems that keep the request from leaving the client are still reported through
//! [`CallHandler::on_end`], with the closest matching status code, so the caller only ever
//! deals with one failure path.
use super::{CallEnd, CallHandler, Invocation, Transport};
use crate::{
    BoxError,
    grpc::client::{GrpcClient, GrpcRequestError},
};
use http_body::Body as HttpBody;
use std::{fmt, sync::Arc};
use tokio::runtime::Handle;
use tonic::{
    Code,
    client::GrpcService,
    metadata::MetadataMap,
    transport::{Channel, Endpoint},
};

/// Errors that can occur while picking the service for an invocation.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("No host was configured for the call")]
    MissingHost,
    #[error("Invalid host '{0}': {1}")]
    InvalidHost(String, #[source] tonic::transport::Error),
}

impl ConnectError {
    fn code(&self) -> Code {
        match self {
            ConnectError::MissingHost => Code::Unavailable,
            ConnectError::InvalidHost(..) => Code::InvalidArgument,
        }
    }
}

type Connector<S> = dyn Fn(Option<&str>) -> Result<S, ConnectError> + Send + Sync;

/// A [`Transport`] backed by `tonic`.
#[derive(Clone)]
pub struct GrpcTransport<S = Channel> {
    connector: Arc<Connector<S>>,
}

impl<S> fmt::Debug for GrpcTransport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrpcTransport").finish_non_exhaustive()
    }
}

impl GrpcTransport<Channel> {
    /// Creates a transport that opens a lazy `Channel` to the host of each invocation.
    pub fn new() -> Self {
        Self {
            connector: Arc::new(|host: Option<&str>| -> Result<Channel, ConnectError> {
                let host = host.ok_or(ConnectError::MissingHost)?;
                let endpoint = Endpoint::from_shared(host.to_string())
                    .map_err(|e| ConnectError::InvalidHost(host.to_string(), e))?;
                Ok(endpoint.connect_lazy())
            }),
        }
    }
}

impl Default for GrpcTransport<Channel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> GrpcTransport<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Creates a transport that sends every call to `service`.
    pub fn from_service(service: S) -> Self {
        Self {
            connector: Arc::new(move |_: Option<&str>| -> Result<S, ConnectError> {
                Ok(service.clone())
            }),
        }
    }
}

impl<S> Transport for GrpcTransport<S>
where
    S: GrpcService<tonic::body::Body> + Send + 'static,
    S::Error: Into<BoxError> + Send,
    S::Future: Send,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Calls need a tokio runtime to be driven.
    fn is_available(&self) -> bool {
        Handle::try_current().is_ok()
    }

    fn invoke<H: CallHandler>(&self, invocation: Invocation, handler: H) {
        let Ok(runtime) = Handle::try_current() else {
            handler.on_end(CallEnd::error(
                Code::Unavailable,
                "No tokio runtime is running to drive the call",
            ));
            return;
        };

        let connector = Arc::clone(&self.connector);
        runtime.spawn(async move {
            let service = match connector(invocation.host.as_deref()) {
                Ok(service) => service,
                Err(err) => return handler.on_end(CallEnd::error(err.code(), err.to_string())),
            };

            drive(GrpcClient::new(service), invocation, handler).await;
        });
    }
}

async fn drive<S, H>(mut client: GrpcClient<S>, invocation: Invocation, mut handler: H)
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    H: CallHandler,
{
    let Invocation {
        method,
        request,
        headers,
        ..
    } = invocation;

    tracing::debug!(method = method.full_name(), "opening gRPC call");

    if method.is_client_streaming() {
        return handler.on_end(CallEnd::error(
            Code::Unimplemented,
            format!(
                "Method '{}' expects a stream of requests, only single request calls are supported",
                method.full_name()
            ),
        ));
    }

    if !method.is_server_streaming() {
        match client.unary(method, request, headers).await {
            Ok(Ok(response)) => {
                let (metadata, message, _) = response.into_parts();
                handler.on_message(message);
                handler.on_end(CallEnd::ok(metadata));
            }
            Ok(Err(status)) => handler.on_end(status.into()),
            Err(err) => handler.on_end(request_failure(err)),
        }
        return;
    }

    let mut stream = match client.server_streaming(method, request, headers).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(status)) => return handler.on_end(status.into()),
        Err(err) => return handler.on_end(request_failure(err)),
    };

    loop {
        match stream.message().await {
            Ok(Some(message)) => handler.on_message(message),
            Ok(None) => break,
            Err(status) => return handler.on_end(status.into()),
        }
    }

    match stream.trailers().await {
        Ok(trailers) => handler.on_end(CallEnd::ok(trailers.unwrap_or_else(MetadataMap::new))),
        Err(status) => handler.on_end(status.into()),
    }
}

fn request_failure(err: GrpcRequestError) -> CallEnd {
    tracing::debug!(error = %err, "gRPC request could not be sent");
    CallEnd::error(err.code(), err.to_string())
}
