use argon2::Config;
use std::sync::OnceLock;
use tracing::warn;

static DUMMY_PASSWORD_HASH: OnceLock<String> = OnceLock::new();

pub fn encode_password(password: &str) -> Result<String, argon2::Error> {
    let config = Config::default();
    let salt: [u8; 32] = rand::random();
    let password_hash = argon2::hash_encoded(password.as_bytes(), &salt, &config)?;
    Ok(password_hash)
}

/// Returns false on mismatch and on a stored hash that cannot be decoded, so a corrupt hash never
/// authenticates anybody.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match argon2::verify_encoded(password_hash, password.as_bytes()) {
        Ok(matched) => matched,
        Err(e) => {
            warn!(error = %e, "stored password hash could not be verified");
            false
        }
    }
}

/// Verifies `password` against a throwaway hash with the same cost as a stored one. Always false.
///
/// Used when there is no stored hash, so the response time does not depend on whether the account
/// exists.
pub fn verify_dummy_password(password: &str) -> bool {
    let dummy_hash = DUMMY_PASSWORD_HASH.get_or_init(|| {
        let random_password: [u8; 16] = rand::random();
        encode_password(&format!("{:x?}", random_password)).unwrap_or_else(|e| {
            warn!(error = %e, "unable to create dummy password hash");
            String::new()
        })
    });
    verify_password(password, dummy_hash);
    false
}
