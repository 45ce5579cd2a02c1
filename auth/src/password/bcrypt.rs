use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Provides salted one-way password hashing (internally uses bcrypt).
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Work factor applied to every production hash.
    pub const DEFAULT_COST: u32 = 12;

    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance using cost factor 12
    pub fn new() -> Self {
        Self {
            cost: Self::DEFAULT_COST,
        }
    }

    /// Create a hasher with an explicit cost factor.
    ///
    /// Meant for tests, where cost 12 makes every hash take a noticeable
    /// amount of time. Accepts the bcrypt range 4..=31.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Cost factor used for new hashes.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password securely.
    ///
    /// Every call draws a fresh random salt, so hashing the same password
    /// twice yields two different strings.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular crypt string (`$2b$<cost>$<salt><digest>`)
    ///
    /// # Errors
    /// * `HashingFailed` - Cost out of range or hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        ::bcrypt::hash(password, self.cost)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Cost and salt are read back from `hash`; the digest comparison is
    /// constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored bcrypt hash
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        ::bcrypt::verify(password, hash)
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
