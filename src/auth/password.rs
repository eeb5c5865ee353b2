use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt ignores everything past this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes a plaintext password with bcrypt at the given cost.
///
/// Passwords longer than [`MAX_PASSWORD_BYTES`] are rejected rather than
/// silently truncated.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::BadRequest(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(hash(password, cost)?)
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// A malformed hash is reported as a mismatch, never as an error.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}
