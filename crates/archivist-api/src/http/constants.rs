/// Readiness probe reply.
pub const MESSAGE_READY: &str = "Ready";
/// Successful move reply.
pub const MESSAGE_MOVED: &str = "Directory is moved";
/// Size query reply.
pub const MESSAGE_SIZE: &str = "Directory size.";
/// Request body could not be decoded.
pub const MESSAGE_DECODE: &str = "Decoding params error.";
/// A workflow worker died before replying.
pub const MESSAGE_INTERNAL: &str = "Internal error.";
/// Plain-text body for unsupported methods.
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method not allowed";
