use crate::error::AppError;
use bcrypt::{hash, verify};

/// Slow, salted one-way password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, AppError>;

    /// `Ok(false)` on mismatch; an error only when `hashed_password` is malformed.
    fn verify_password(&self, password: &str, hashed_password: &str) -> Result<bool, AppError>;
}

/// bcrypt with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash_password(&self, password: &str) -> Result<String, AppError> {
        Ok(hash(password, self.cost)?)
    }

    fn verify_password(&self, password: &str, hashed_password: &str) -> Result<bool, AppError> {
        Ok(verify(password, hashed_password)?)
    }
}
