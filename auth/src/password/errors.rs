use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("bcrypt hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored hash is unreadable: {0}")]
    VerificationFailed(String),
}
