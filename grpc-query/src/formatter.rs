use colored::*;
use grpc_query_core::{QueryError, QueryResult, prost_reflect, schema::MethodLookupError};
use std::fmt::Display;

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

pub struct GenericError<T: Display>(pub &'static str, pub T);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<QueryResult> for FormattedString {
    fn from(result: QueryResult) -> Self {
        let json = serde_json::to_string_pretty(&result)
            .unwrap_or_else(|e| format!("<unprintable result: {e}>"));
        FormattedString(json)
    }
}

impl From<QueryError> for FormattedString {
    fn from(err: QueryError) -> Self {
        match err.call_error() {
            Some(call) => FormattedString(format!(
                "{} code={:?} message={:?}",
                "gRPC Failed:".red().bold(),
                call.code,
                call.msg.as_deref().unwrap_or_default()
            )),
            None => FormattedString(format!("{}\n\n'{}'", "Query Failed:".red().bold(), err)),
        }
    }
}

impl From<MethodLookupError> for FormattedString {
    fn from(err: MethodLookupError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Method Lookup Failed:".red().bold(), err))
    }
}

impl From<prost_reflect::DescriptorError> for FormattedString {
    fn from(err: prost_reflect::DescriptorError) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Failed to parse file descriptor:".red().bold(),
            err
        ))
    }
}

impl From<std::io::Error> for FormattedString {
    fn from(err: std::io::Error) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Failed to read file:".red().bold(),
            err
        ))
    }
}

impl<T: Display> From<GenericError<T>> for FormattedString {
    fn from(GenericError(msg, err): GenericError<T>) -> Self {
        FormattedString(format!("{}:\n\n'{}'", msg.red().bold(), err))
    }
}
