//! Environment variable secret lookup.
//!
//! The Gemini API key is read once at startup from the variable named by
//! `gemini.api_key_env` and wrapped in a [`SecretString`] immediately.

use secrecy::SecretString;

use gemgate_types::error::SecretError;

/// Read the secret stored in environment variable `name`.
///
/// Values that are unset or not valid Unicode count as not found;
/// whitespace-only values count as empty.
pub fn env_secret(name: &str) -> Result<SecretString, SecretError> {
    match std::env::var(name) {
        Ok(val) if val.trim().is_empty() => Err(SecretError::Empty(name.to_string())),
        Ok(val) => Ok(SecretString::from(val.trim().to_string())),
        Err(_) => Err(SecretError::NotFound(name.to_string())),
    }
}
