use thiserror::Error;

/// Runtime error type shared by transports and lookup-backed value types.
#[derive(Debug, Error)]
pub enum ParleyError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("lookup failed ({kind}): {message}")]
    Lookup { kind: String, message: String },

    #[error("contract violation: {0}")]
    ContractViolation(String),
}
