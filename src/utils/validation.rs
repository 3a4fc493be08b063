//! Validation utilities for user input.

use crate::core::error::AppError;

/// Website types accepted by `create`.
pub const WEBSITE_TYPES: &[&str] = &["static", "php", "build"];

/// Validates a subdomain.
/// Must contain only lowercase letters, numbers and hyphens.
pub fn validate_subdomain(subdomain: &str) -> Result<(), AppError> {
    if subdomain.is_empty() {
        return Err(AppError::Validation("Subdomain is required".into()));
    }

    if !subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::Validation(
            "Subdomain can only contain lowercase letters, numbers, and hyphens".into(),
        ));
    }

    Ok(())
}

/// Validates a website type.
pub fn validate_website_type(website_type: &str) -> Result<(), AppError> {
    if WEBSITE_TYPES.contains(&website_type) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Website type must be 'static', 'php', or 'build'".into(),
        ))
    }
}

/// Validates an email address (basic shape only).
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::Validation(format!("Invalid email address: {}", email))),
    }
}

/// Turns an arbitrary name into a safe database identifier.
///
/// Lowercases, replaces anything outside `[a-z0-9_]` with `_`, collapses
/// repeated underscores, trims them at both ends and limits the length.
/// Falls back to `database` when nothing is left.
pub fn sanitize_database_name(name: &str, max_length: usize) -> String {
    let mut sanitized = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            c
        } else {
            '_'
        };
        if c == '_' && sanitized.ends_with('_') {
            continue;
        }
        sanitized.push(c);
    }

    let mut sanitized = sanitized.trim_matches('_').to_string();
    if sanitized.len() > max_length {
        // Only ASCII remains, byte truncation is safe
        sanitized.truncate(max_length);
        sanitized = sanitized.trim_end_matches('_').to_string();
    }

    if sanitized.is_empty() {
        "database".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_subdomain_valid() {
        assert!(validate_subdomain("my-site").is_ok());
        assert!(validate_subdomain("site42").is_ok());
    }

    #[test]
    fn test_validate_subdomain_invalid() {
        assert!(validate_subdomain("").is_err());
        assert!(validate_subdomain("My-Site").is_err());
        assert!(validate_subdomain("my_site").is_err());
        assert!(validate_subdomain("my.site").is_err());
    }

    #[test]
    fn test_validate_website_type() {
        assert!(validate_website_type("static").is_ok());
        assert!(validate_website_type("php").is_ok());
        assert!(validate_website_type("build").is_ok());
        assert!(validate_website_type("node").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("dev@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("dev").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_sanitize_database_name() {
        assert_eq!(sanitize_database_name("My-Shop_abcdef_db", 63), "my_shop_abcdef_db");
        assert_eq!(sanitize_database_name("__a--b__", 63), "a_b");
        assert_eq!(sanitize_database_name("!!!", 63), "database");
        assert_eq!(sanitize_database_name("", 63), "database");
    }

    #[test]
    fn test_sanitize_database_name_truncates() {
        let long = "a".repeat(70);
        assert_eq!(sanitize_database_name(&long, 63).len(), 63);
        assert_eq!(sanitize_database_name("abc_def", 4), "abc");
    }
}
