//! # Feedback Inbox
//!
//! Destination for accepted feedback submissions.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};

/// An accepted feedback submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            message: message.into(),
            received_at: Utc::now(),
        }
    }
}

/// Returned to the submitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReceipt {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
}

impl From<&Feedback> for FeedbackReceipt {
    fn from(feedback: &Feedback) -> Self {
        Self {
            id: feedback.id,
            received_at: feedback.received_at,
        }
    }
}

/// Feedback storage trait
pub trait FeedbackInbox: Send + Sync {
    fn submit(&self, feedback: &Feedback) -> StoreResult<()>;
}

/// In-memory inbox
#[derive(Debug, Default)]
pub struct InMemoryFeedbackInbox {
    entries: RwLock<Vec<Feedback>>,
}

impl InMemoryFeedbackInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything submitted so far
    pub fn entries(&self) -> Vec<Feedback> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }
}

impl FeedbackInbox for InMemoryFeedbackInbox {
    fn submit(&self, feedback: &Feedback) -> StoreResult<()> {
        self.entries
            .write()
            .map_err(|_| StoreError::Unavailable("Lock poisoned".to_string()))?
            .push(feedback.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbox_keeps_submissions() {
        let inbox = InMemoryFeedbackInbox::new();
        let feedback = Feedback::new("Ada", "ada@example.com", "Great form");
        inbox.submit(&feedback).unwrap();

        assert_eq!(inbox.entries(), vec![feedback.clone()]);
        assert_eq!(FeedbackReceipt::from(&feedback).id, feedback.id);
    }
}
