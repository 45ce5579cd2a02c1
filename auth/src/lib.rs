//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (bcrypt, cost 12)
//! - JWT token generation and validation
//! - Authentication coordination
//!
//! Services define their own principal type and embed it in the token claims.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(4);
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::new("user123".to_string(), 24);
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims<String> = handler.decode(&token).unwrap();
//! assert_eq!(decoded.user, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims, PasswordHasher};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", 24)
//!     .with_password_hasher(PasswordHasher::with_cost(4));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, "alice").unwrap();
//!
//! // Validate token
//! let claims: Claims<String> = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.user, "alice");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
