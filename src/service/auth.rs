use crate::models::error::{AdminError, Result};
use crate::models::user_row::UserRow;
use crate::repo::sqlite::{self, Db};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::{debug, info};

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AdminError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AdminError::PasswordHash(format!("stored hash is malformed: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Creates the administrator account on first run. An existing account with
/// the same username is left untouched, whatever its password.
pub fn seed_default_user(db: &Db, username: &str, password: &str) -> Result<bool> {
    if sqlite::select_user(db, username)?.is_some() {
        debug!("User {} already exists, skipping seed", username);
        return Ok(false);
    }

    let created = sqlite::insert_user(db, username, &hash_password(password)?)?;
    if created {
        info!("Created default administrator account: {}", username);
    }
    Ok(created)
}

/// Returns the user only when both the username and the password match.
pub fn authenticate(db: &Db, username: &str, password: &str) -> Result<Option<UserRow>> {
    let Some(user) = sqlite::select_user(db, username)? else {
        return Ok(None);
    };

    if verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}
