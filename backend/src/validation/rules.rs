//! Registration input rules. Pure functions of their input, shared by the
//! session lifecycle service; the error code names the failing rule.

use validator::ValidationError;

/// Validates username length.
///
/// Requirements:
/// - 3-30 characters
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.len() < 3 || username.len() > 30 {
        return Err(ValidationError::new("username_invalid_length"));
    }

    Ok(())
}

/// Validates email shape. Deliberately permissive: length bounds plus the
/// presence of an `@`, not RFC 5322.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() < 5 || email.len() > 50 {
        return Err(ValidationError::new("email_invalid_length"));
    }

    if !email.contains('@') {
        return Err(ValidationError::new("email_missing_at_sign"));
    }

    Ok(())
}

/// Validates password strength.
///
/// Requirements:
/// - At least 8 characters
/// - At least one uppercase letter, one lowercase letter, one digit, and one
///   symbol character each
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(ValidationError::new("password_too_short"));
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_symbol = false;

    for c in password.chars() {
        if c.is_uppercase() {
            has_upper = true;
        } else if c.is_lowercase() {
            has_lower = true;
        } else if c.is_numeric() {
            has_digit = true;
        } else if !c.is_whitespace() {
            has_symbol = true;
        }
    }

    if !has_upper {
        return Err(ValidationError::new("password_missing_uppercase"));
    }
    if !has_lower {
        return Err(ValidationError::new("password_missing_lowercase"));
    }
    if !has_digit {
        return Err(ValidationError::new("password_missing_digit"));
    }
    if !has_symbol {
        return Err(ValidationError::new("password_missing_symbol"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rejects_too_short() {
        assert!(validate_username("ab").is_err());
    }

    #[test]
    fn username_rejects_too_long() {
        assert!(validate_username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn username_accepts_bounds() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(30)).is_ok());
    }

    #[test]
    fn email_rejects_missing_at_sign() {
        let err = validate_email("alice.example.com").unwrap_err();
        assert_eq!(err.code, "email_missing_at_sign");
    }

    #[test]
    fn email_rejects_out_of_bounds_length() {
        assert!(validate_email("a@b").is_err());
        let local = "a".repeat(49);
        assert!(validate_email(&format!("{local}@e")).is_err());
    }

    #[test]
    fn email_accepts_minimal_shape() {
        assert!(validate_email("a@b.c").is_ok());
    }

    #[test]
    fn password_rejects_each_missing_class() {
        assert_eq!(
            validate_password("Pass1!").unwrap_err().code,
            "password_too_short"
        );
        assert_eq!(
            validate_password("passw0rd!").unwrap_err().code,
            "password_missing_uppercase"
        );
        assert_eq!(
            validate_password("PASSW0RD!").unwrap_err().code,
            "password_missing_lowercase"
        );
        assert_eq!(
            validate_password("Password!").unwrap_err().code,
            "password_missing_digit"
        );
        assert_eq!(
            validate_password("Passw0rdd").unwrap_err().code,
            "password_missing_symbol"
        );
    }

    #[test]
    fn password_accepts_all_classes() {
        assert!(validate_password("Passw0rd!").is_ok());
    }
}
