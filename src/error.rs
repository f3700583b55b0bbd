use num_bigint::BigUint;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SharingError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("division by zero in GF({0})")]
    DivisionByZero(BigUint),
    #[error("need at least {required} points to decode, got {available}")]
    InsufficientData { required: usize, available: usize },
    #[error("decoding failed: {0}")]
    DecodeError(String),
}
