use thiserror::Error;

/// Token signing and verification failures. Expiry is reported on its own.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token signing failed: {0}")]
    EncodingFailed(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}
