use std::fmt;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::ApiError;
use crate::validation::ValidationError;

/// Argon2 PHC string for a stored password.
///
/// Write-only: there is no accessor and no `Serialize`, the only way to use
/// the value is [`verify_password`]. It reaches the database through the
/// transparent sqlx encoding.
#[derive(Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(transparent)]
pub struct PasswordDigest(String);

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

pub fn hash_password(plain: &str) -> Result<PasswordDigest, ApiError> {
    if plain.is_empty() {
        return Err(ValidationError("password required").into());
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(PasswordDigest(hash))
}

/// Mismatches and unreadable digests both come back as `false`.
pub fn verify_password(plain: &str, digest: &PasswordDigest) -> bool {
    let parsed = match PasswordHash::new(&digest.0) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "argon2 parse hash error");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let digest = hash_password(password).expect("hashing should succeed");
        assert_ne!(digest.0, password);
        assert!(verify_password(password, &digest));
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let a = hash_password("pw123").unwrap();
        let b = hash_password("pw123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let digest = hash_password("correct-horse-battery-staple").unwrap();
        assert!(!verify_password("wrong-password", &digest));
    }

    #[test]
    fn empty_password_is_a_validation_error() {
        let err = hash_password("").unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError("password required"))
        ));
    }

    #[test]
    fn malformed_digest_never_verifies() {
        let digest = PasswordDigest("not-a-valid-hash".into());
        assert!(!verify_password("anything", &digest));
    }

    #[test]
    fn debug_output_is_redacted() {
        let digest = hash_password("pw123").unwrap();
        let shown = format!("{:?}", digest);
        assert!(!shown.contains("argon2"));
        assert!(shown.contains("redacted"));
    }
}
