use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, Result};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    email.len() <= 255 && EMAIL_RE.is_match(email)
}

pub(crate) fn check_email(email: &str) -> Result<()> {
    if !is_valid_email(email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    Ok(())
}

pub(crate) fn check_password(password: &str) -> Result<()> {
    if password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if name.len() > 255 {
        return Err(AppError::Validation(
            "Name must be at most 255 characters".into(),
        ));
    }
    Ok(())
}

pub(crate) fn check_avatar(avatar: &str) -> Result<()> {
    if avatar.len() > 500 {
        return Err(AppError::Validation(
            "Avatar must be at most 500 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@x"));
    }

    #[test]
    fn password_minimum_length() {
        assert!(check_password("12345").is_err());
        assert!(check_password("123456").is_ok());
    }

    #[test]
    fn name_and_avatar_caps() {
        assert!(check_name("").is_err());
        assert!(check_name("  ").is_err());
        assert!(check_name(&"x".repeat(256)).is_err());
        assert!(check_name("Ada").is_ok());
        assert!(check_avatar(&"y".repeat(501)).is_err());
        assert!(check_avatar("https://cdn/avatar.png").is_ok());
    }
}
