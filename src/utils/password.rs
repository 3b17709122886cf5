use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher, PasswordVerifier, phc::PasswordHash},
};

use crate::config::PasswordConfig;
use crate::error::{AppError, AppResult};

fn hasher(config: &PasswordConfig) -> AppResult<Argon2<'static>> {
    let params = Params::new(config.memory_cost, config.time_cost, config.parallelism, None)
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Invalid argon2 parameters: {}", e),
        })?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password using Argon2id with the configured cost parameters
///
/// # Returns
/// The PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`
pub fn hash_password(password: &str, config: &PasswordConfig) -> AppResult<String> {
    let password_hash = hasher(config)?
        .hash_password(password.as_bytes())
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to hash password: {}", e),
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored PHC hash
///
/// The cost parameters are read from the hash itself, so hashes created
/// under older settings keep verifying.
///
/// # Returns
/// * `AppResult<bool>` - True if password matches, false otherwise
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Stored password hash is malformed: {}", e),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap parameters keep the tests fast
    fn test_config() -> PasswordConfig {
        PasswordConfig {
            memory_cost: 64,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_password_uses_configured_params() {
        let hash = hash_password("test_password_123", &test_config()).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=64,t=1,p=1"));
    }

    #[test]
    fn test_verify_password_success_and_failure() {
        let hash = hash_password("test_password_123", &test_config()).unwrap();

        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hash1 = hash_password("test_password_123", &test_config()).unwrap();
        let hash2 = hash_password("test_password_123", &test_config()).unwrap();

        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);
        assert!(verify_password("test_password_123", &hash1).unwrap());
        assert!(verify_password("test_password_123", &hash2).unwrap());
    }

    #[test]
    fn test_invalid_params_are_internal_errors() {
        let config = PasswordConfig {
            memory_cost: 1,
            time_cost: 1,
            parallelism: 1,
        };
        assert!(matches!(
            hash_password("pw", &config),
            Err(AppError::Internal { .. })
        ));
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        assert!(matches!(
            verify_password("pw", "not-a-phc-string"),
            Err(AppError::Internal { .. })
        ));
    }
}
