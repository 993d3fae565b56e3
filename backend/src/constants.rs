// =============================================================================
// DevConnect Backend Constants
// =============================================================================
// This file contains all constants used throughout the backend to enable
// easy tuning and configuration from a single location.

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 4000;

/// Default number of pooled database connections
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Header the upstream identity layer uses to pass the resolved user id
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

// =============================================================================
// FEED CONFIGURATION
// =============================================================================

/// Users returned per feed page when the caller does not ask for a size
pub const DEFAULT_FEED_PAGE_SIZE: u32 = 10;

/// Upper bound on a single feed page
pub const MAX_FEED_PAGE_SIZE: u32 = 50;

// =============================================================================
// USER DIRECTORY LIMITS
// =============================================================================

/// Minimum length of a user name
pub const MIN_USER_NAME_LENGTH: usize = 3;

/// Maximum length of a user name
pub const MAX_USER_NAME_LENGTH: usize = 32;

/// Maximum length of a full name
pub const MAX_FULL_NAME_LENGTH: usize = 100;

/// Maximum character limit for a bio
pub const BIO_CHAR_LIMIT: usize = 400;

/// Maximum number of skills listed on a profile
pub const MAX_SKILLS: usize = 10;

// =============================================================================
// HELPER FUNCTIONS FOR VALIDATION
// =============================================================================

/// Validates if a string is a well-formed user name
pub fn is_valid_user_name(user_name: &str) -> bool {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static USER_NAME_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"^[A-Za-z0-9_.\-]{{{},{}}}$",
            MIN_USER_NAME_LENGTH, MAX_USER_NAME_LENGTH
        ))
        .unwrap()
    });

    USER_NAME_RE.is_match(user_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_name_validation() {
        assert!(is_valid_user_name("alice"));
        assert!(is_valid_user_name("bob_dev.42"));
        assert!(!is_valid_user_name("al"));
        assert!(!is_valid_user_name("has space"));
        assert!(!is_valid_user_name(&"x".repeat(MAX_USER_NAME_LENGTH + 1)));
    }
}
