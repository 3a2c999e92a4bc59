use thiserror::Error;

/// Shared by every credential failure so callers cannot tell an unknown
/// e-mail from a wrong password.
pub const MISMATCH_MESSAGE: &str = "email or password not matched";

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashingError(#[from] bcrypt::BcryptError);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("email or password not matched")]
pub struct CredentialMismatch;

pub fn hash_password(password: &str, cost: u32) -> Result<String, HashingError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// An unreadable stored hash counts as a mismatch, never as a server error.
pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<(), CredentialMismatch> {
    match bcrypt::verify(candidate, stored_hash) {
        Ok(true) => Ok(()),
        _ => Err(CredentialMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter22", TEST_COST).unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password(&hash, "hunter22").is_ok());
        assert_eq!(verify_password(&hash, "hunter23"), Err(CredentialMismatch));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same-password", TEST_COST).unwrap();
        let second = hash_password("same-password", TEST_COST).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn configured_cost_is_encoded_in_hash() {
        let hash = hash_password("hunter22", 5).unwrap();
        assert!(hash.starts_with("$2b$05$"));
    }

    #[test]
    fn invalid_cost_is_a_recoverable_error() {
        let err = hash_password("hunter22", 99).unwrap_err();
        assert!(err.to_string().starts_with("password hashing failed"));
    }

    #[test]
    fn garbage_stored_hash_is_a_mismatch() {
        assert_eq!(verify_password("not-a-hash", "anything"), Err(CredentialMismatch));
        assert_eq!(CredentialMismatch.to_string(), MISMATCH_MESSAGE);
    }
}
