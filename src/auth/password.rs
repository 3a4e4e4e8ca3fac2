use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Salted one-way hash. Argon2id with default parameters keeps verification
/// comfortably above the 100ms mark on commodity hardware.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_verifies_original_password() {
        let hash = hash_password("hunter2hunter2").expect("hash");
        assert!(verify_password("hunter2hunter2", &hash).expect("verify"));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("the-real-password").expect("hash");
        assert!(!verify_password("a-guess", &hash).expect("verify"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-input").expect("hash");
        let b = hash_password("same-input").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("anything", "plainly-not-a-phc-string").is_err());
    }
}
