//! # Transport Seam
//!
//! A [`Transport`] performs the actual network exchange for one call and reports back
//! through a [`CallHandler`]: zero or more [`CallHandler::on_message`] calls, delivered in
//! order, followed by at most one [`CallHandler::on_end`].
//!
//! `on_end` consumes the handler, so a transport cannot signal completion twice. Messages
//! may be delivered synchronously from inside [`Transport::invoke`] or later, from another
//! task.
pub mod grpc;

use prost_reflect::MethodDescriptor;
use tonic::{Code, Status, metadata::MetadataMap};

/// Everything a transport needs to open one call.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub method: MethodDescriptor,
    pub request: serde_json::Value,
    /// Base URL of the endpoint. `None` when the caller never configured one.
    pub host: Option<String>,
    /// gRPC metadata sent with the request.
    pub headers: Vec<(String, String)>,
}

/// Terminal signal of a call.
#[derive(Debug, Clone)]
pub struct CallEnd {
    pub code: Code,
    pub message: Option<String>,
    pub trailers: MetadataMap,
}

impl CallEnd {
    pub fn ok(trailers: MetadataMap) -> Self {
        Self {
            code: Code::Ok,
            message: None,
            trailers,
        }
    }

    pub fn error(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            trailers: MetadataMap::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok
    }
}

impl From<Status> for CallEnd {
    fn from(status: Status) -> Self {
        let message = Some(status.message())
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Self {
            code: status.code(),
            message,
            trailers: status.metadata().clone(),
        }
    }
}

/// Receives the events of a single call.
pub trait CallHandler: Send + 'static {
    fn on_message(&mut self, message: serde_json::Value);

    fn on_end(self, end: CallEnd);
}

/// Something able to open calls described by an [`Invocation`].
pub trait Transport {
    /// Whether the transport can run calls in the current environment.
    ///
    /// Only used to warn early; `invoke` is still attempted when this returns `false`.
    fn is_available(&self) -> bool {
        true
    }

    fn invoke<H: CallHandler>(&self, invocation: Invocation, handler: H);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_end_from_status_drops_empty_message() {
        let end = CallEnd::from(Status::new(Code::NotFound, ""));

        assert_eq!(end.code, Code::NotFound);
        assert_eq!(end.message, None);
        assert!(!end.is_ok());
    }

    #[test]
    fn test_call_end_from_status_keeps_metadata() {
        let mut metadata = MetadataMap::new();
        metadata.insert("x-request-id", "42".parse().unwrap());
        let status = Status::with_metadata(Code::Aborted, "boom", metadata);

        let end = CallEnd::from(status);

        assert_eq!(end.message.as_deref(), Some("boom"));
        assert_eq!(
            end.trailers.get("x-request-id").unwrap().to_str().unwrap(),
            "42"
        );
    }
}
