use std::borrow::Cow;
use validator::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// At least eight characters and at least one ASCII digit.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if long_enough && has_digit {
        return Ok(());
    }
    let mut err = ValidationError::new("password_strength");
    err.message = Some(Cow::Borrowed(
        "Password must have at least 8 characters and contain at least one number",
    ));
    Err(err)
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}

/// Deduplicates ids while keeping the order they were submitted in.
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_rule() {
        assert!(validate_password("abc123").is_err());
        assert!(validate_password("abcdefgh").is_err());
        assert!(validate_password("abcd1234").is_ok());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank(" x ").is_ok());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(dedup_ids(&[]).is_empty());
    }
}
