//! Internal helpers for validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so the engine enforces consistent invariants.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim a required text field, rejecting blank input.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, mapping blank input to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Normalize a category slug: trimmed, lowercase, no whitespace inside.
pub(crate) fn normalize_slug(value: &str) -> ResultEngine<String> {
    let slug = normalize_required(value, "category id")?.to_lowercase();
    if slug.chars().any(char::is_whitespace) {
        return Err(EngineError::InvalidId(format!(
            "category id '{slug}' must not contain spaces"
        )));
    }
    Ok(slug)
}

/// Normalize an email used as login.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = normalize_required(value, "email")?.to_lowercase();
    if !email.contains('@') {
        return Err(EngineError::InvalidName(format!("invalid email: {email}")));
    }
    Ok(email)
}

pub(crate) fn ensure_price(price: i64) -> ResultEngine<()> {
    if price < 0 {
        return Err(EngineError::InvalidAmount(format!(
            "price must be >= 0, got {price}"
        )));
    }
    Ok(())
}

/// Folding used by menu search: NFKC then lowercase.
pub(crate) fn search_key(value: &str) -> String {
    value.nfkc().collect::<String>().to_lowercase()
}

pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| EngineError::Password(err.to_string()))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_lowercased_and_trimmed() {
        assert_eq!(normalize_slug("  Ayam ").unwrap(), "ayam");
        assert!(normalize_slug("nasi goreng").is_err());
        assert!(normalize_slug("   ").is_err());
    }

    #[test]
    fn search_key_folds_case_and_width() {
        assert_eq!(search_key("Rendang"), "rendang");
        // Fullwidth letters fold to ASCII under NFKC.
        assert_eq!(search_key("ＲＥＮ"), "ren");
    }

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret", "not-a-phc-string"));
    }
}
