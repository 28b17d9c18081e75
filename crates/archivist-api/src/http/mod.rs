//! HTTP surface modules (router, handlers, error responses).

/// Wire messages returned to callers.
pub mod constants;
/// Failure responses.
pub mod errors;
/// Endpoint handlers.
pub mod handlers;
/// Router construction and server host.
pub mod router;
