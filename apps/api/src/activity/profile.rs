//! Profile URL handling for the front-end trigger.

use crate::errors::AppError;

/// Only profile links of this shape are accepted.
pub const PROFILE_URL_PREFIX: &str = "https://www.reddit.com/user/";

const MAX_USERNAME_LEN: usize = 32;

/// Extracts the account identifier from a profile URL such as
/// `https://www.reddit.com/user/kojied/`.
pub fn username_from_profile_url(url: &str) -> Result<String, AppError> {
    let path = url.trim().strip_prefix(PROFILE_URL_PREFIX).ok_or_else(|| {
        AppError::Validation(format!("profile_url must start with {PROFILE_URL_PREFIX}"))
    })?;

    let username = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    validate_username(username)?;
    Ok(username.to_string())
}

/// Usernames name output files, so only `[A-Za-z0-9_-]` is allowed.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "username must be 1-{MAX_USERNAME_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(format!(
            "username contains invalid characters: {username:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_username_with_trailing_slash() {
        let name = username_from_profile_url("https://www.reddit.com/user/kojied/").unwrap();
        assert_eq!(name, "kojied");
    }

    #[test]
    fn test_extracts_username_without_trailing_slash() {
        let name = username_from_profile_url("https://www.reddit.com/user/Hungry-Move-6603").unwrap();
        assert_eq!(name, "Hungry-Move-6603");
    }

    #[test]
    fn test_rejects_foreign_host() {
        let result = username_from_profile_url("https://example.com/user/kojied/");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_bare_prefix() {
        let result = username_from_profile_url("https://www.reddit.com/user/");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_path_traversal() {
        assert!(validate_username("..").is_err());
        assert!(validate_username("a/b").is_err());
        assert!(validate_username("spez_2").is_ok());
    }
}
