//! # Account Errors
//!
//! Errors raised by the store and hashing collaborators. None of these
//! cross a domain operation's boundary: they are converted to envelopes.

use thiserror::Error;

use super::model::Attribute;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for hashing operations
pub type HashResult<T> = Result<T, HashError>;

/// Errors reported by an [`AccountRepository`](super::AccountRepository)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No account with the given id
    #[error("Account not found")]
    NotFound,

    /// Storage-level unique constraint rejected the write
    #[error("Unique constraint violated on {attribute}")]
    UniqueViolation { attribute: Attribute },

    /// Value cannot be stored in the attribute's column
    #[error("Attribute {attribute} expects {expected}")]
    TypeMismatch {
        attribute: Attribute,
        expected: &'static str,
    },

    /// Store unreachable or internally broken
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by a [`CredentialHasher`](super::CredentialHasher)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Hashing primitive failed
    #[error("Internal error: credential hashing failed")]
    HashingFailed,

    /// Stored digest cannot be parsed
    #[error("Internal error: stored credential digest is malformed")]
    MalformedDigest,

    /// Cost parameters rejected by the primitive
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_names_attribute() {
        let err = StoreError::UniqueViolation {
            attribute: Attribute::Email,
        };
        assert_eq!(err.to_string(), "Unique constraint violated on email");
    }

    #[test]
    fn test_hash_errors_do_not_leak_material() {
        for err in [HashError::HashingFailed, HashError::MalformedDigest] {
            assert!(err.to_string().starts_with("Internal error"));
        }
    }
}
