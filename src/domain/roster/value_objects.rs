use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Email value object representing a syntactically valid address
///
/// # Invariants
/// - Exactly one '@' with a non-empty local part
/// - Domain part contains a '.' and no whitespace
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Returns
    /// * `Ok(Email)` - If the address passes the syntax check
    /// * `Err(String)` - If the address is malformed
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    fn is_valid(email: &str) -> bool {
        let mut parts = email.splitn(2, '@');
        let local = parts.next().unwrap_or("");
        let domain = parts.next().unwrap_or("");
        !local.is_empty()
            && !domain.is_empty()
            && domain.contains('.')
            && !email.chars().any(char::is_whitespace)
            && email.matches('@').count() == 1
    }

    /// Returns the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive equality, for dedup and self-invite checks
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the player submitting a registration
///
/// Authentication is handled outside this core; the captain arrives as a
/// resolved identity on the request.
#[derive(Debug, Clone)]
pub struct Captain {
    pub user_id: Uuid,
    pub email: Email,
}
