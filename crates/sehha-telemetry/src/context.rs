//! Invocation span helpers.

use tracing::Span;
use uuid::Uuid;

/// Fresh identifier sent as `x-request-id` and recorded on the invocation span.
#[must_use]
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span and request id describing one command invocation.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    span: Span,
    request_id: String,
}

impl InvocationContext {
    /// Create a span tagged with the command name, locale and a new request id.
    #[must_use]
    pub fn new(command: &str, locale: &str) -> Self {
        let request_id = new_request_id();
        let span = tracing::info_span!(
            "invocation",
            command = %command,
            locale = %locale,
            request_id = %request_id
        );
        Self { span, request_id }
    }

    /// Span to instrument the invocation future with.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Request id shared by every call made during this invocation.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}
