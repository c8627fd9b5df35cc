use prost_reflect::MethodDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use tonic::Code;

/// Configuration of a [`super::GrpcBaseQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BaseQueryArgs {
    /// Base URL of the gRPC endpoint, e.g. `https://api.example.com/v1/`.
    pub host: Option<String>,
    /// Metadata sent with every call, before the per-call headers.
    pub headers: Vec<(String, String)>,
}

impl BaseQueryArgs {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            headers: Vec::new(),
        }
    }
}

/// A single call to perform.
#[derive(Debug, Clone)]
pub struct GrpcArgs {
    pub method: MethodDescriptor,
    pub request: serde_json::Value,
    pub headers: Vec<(String, String)>,
}

impl GrpcArgs {
    pub fn new(method: MethodDescriptor, request: serde_json::Value) -> Self {
        Self {
            method,
            request,
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// The envelope a successful call resolves to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub data: QueryData,
}

/// Payload of a successful call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryData {
    /// The first message of a unary call.
    Message(serde_json::Value),
    /// Every message of the call, in arrival order.
    Messages(Vec<serde_json::Value>),
}

impl QueryData {
    pub fn into_value(self) -> serde_json::Value {
        match self {
            QueryData::Message(value) => value,
            QueryData::Messages(values) => serde_json::Value::Array(values),
        }
    }
}

/// A call that completed with a non-OK status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "gRPC call failed with code '{code:?}': '{}'",
    .msg.as_deref().unwrap_or("<no message>")
)]
pub struct CallError {
    pub code: Code,
    pub msg: Option<String>,
}

/// Errors returned by [`super::GrpcBaseQuery::query`].
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Call(#[from] CallError),
    #[error("The transport dropped the call before it completed")]
    Abandoned,
}

impl QueryError {
    /// The failing status, if the call got far enough to have one.
    pub fn call_error(&self) -> Option<&CallError> {
        match self {
            QueryError::Call(err) => Some(err),
            QueryError::Abandoned => None,
        }
    }
}

/// Advisory problems detected while building the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupWarning {
    TransportUnavailable,
    MissingHost,
}

impl fmt::Display for SetupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupWarning::TransportUnavailable => write!(
                f,
                "the transport cannot run calls in this environment, calls will fail until it can"
            ),
            SetupWarning::MissingHost => {
                write!(f, "no host was configured, calls will fail at call time")
            }
        }
    }
}
