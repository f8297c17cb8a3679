//! Password requirements.

use serde::{Deserialize, Serialize};

/// Password requirements configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_number: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: false,
            require_lowercase: false,
            require_number: false,
            require_special: false,
        }
    }
}

impl PasswordPolicy {
    /// First requirement `password` misses, as a user-facing message
    pub fn violation(&self, password: &str) -> Option<String> {
        if password.chars().count() < self.min_length {
            return Some(format!(
                "Password must be at least {} characters",
                self.min_length
            ));
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Some("Password must contain at least one uppercase letter".to_string());
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            return Some("Password must contain at least one lowercase letter".to_string());
        }

        if self.require_number && !password.chars().any(|c| c.is_numeric()) {
            return Some("Password must contain at least one number".to_string());
        }

        if self.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Some("Password must contain at least one special character".to_string());
        }

        None
    }
}
