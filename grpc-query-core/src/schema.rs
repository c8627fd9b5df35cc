//! # Schema Lookup
//!
//! Helpers to obtain the [`MethodDescriptor`] a query needs from an encoded
//! `FileDescriptorSet` (as produced by `protoc --descriptor_set_out`).
use prost_reflect::{DescriptorError, DescriptorPool, MethodDescriptor};

#[derive(Debug, thiserror::Error)]
pub enum MethodLookupError {
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),
    #[error("Method '{method}' not found in service '{service}'")]
    MethodNotFound { service: String, method: String },
}

/// Decodes an encoded `FileDescriptorSet` into a pool.
pub fn decode_descriptor_pool(bytes: &[u8]) -> Result<DescriptorPool, DescriptorError> {
    DescriptorPool::decode(bytes)
}

/// Finds `method` in the fully qualified `service` (e.g. `my.package.Service`).
pub fn find_method(
    pool: &DescriptorPool,
    service: &str,
    method: &str,
) -> Result<MethodDescriptor, MethodLookupError> {
    pool.get_service_by_name(service)
        .ok_or_else(|| MethodLookupError::ServiceNotFound(service.to_string()))?
        .methods()
        .find(|m| m.name() == method)
        .ok_or_else(|| MethodLookupError::MethodNotFound {
            service: service.to_string(),
            method: method.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use prost::Message;

    #[test]
    fn test_find_method() {
        let pool = test_support::pool();

        let method = find_method(&pool, "echo.EchoService", "ServerStream").unwrap();

        assert_eq!(method.full_name(), "echo.EchoService.ServerStream");
        assert!(method.is_server_streaming());
    }

    #[test]
    fn test_find_method_unknown_service() {
        let pool = test_support::pool();

        let err = find_method(&pool, "echo.Missing", "Unary").unwrap_err();

        assert!(matches!(err, MethodLookupError::ServiceNotFound(s) if s == "echo.Missing"));
    }

    #[test]
    fn test_find_method_unknown_method() {
        let pool = test_support::pool();

        let err = find_method(&pool, "echo.EchoService", "Missing").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Method 'Missing' not found in service 'echo.EchoService'"
        );
    }

    #[test]
    fn test_decode_descriptor_pool_roundtrips_file_set() {
        let bytes = test_support::file_descriptor_set().encode_to_vec();

        let pool = decode_descriptor_pool(&bytes).unwrap();

        assert!(pool.get_service_by_name("echo.EchoService").is_some());
    }

    #[test]
    fn test_decode_descriptor_pool_rejects_garbage() {
        assert!(decode_descriptor_pool(&[0xff, 0xff, 0xff]).is_err());
    }
}
