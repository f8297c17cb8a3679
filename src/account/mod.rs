//! # Accounts
//!
//! Server side of the form protocol: account storage and hashing
//! boundaries, the attribute schema registry, per-attribute validation,
//! and the registration / login / feedback workflows.
//!
//! Every public operation here answers with a
//! [`ResponseEnvelope`](crate::envelope::ResponseEnvelope); store and
//! hashing errors are converted at the operation boundary.

pub mod attributes;
pub mod crypto;
pub mod errors;
pub mod feedback;
pub mod forms;
pub mod model;
pub mod registry;
pub mod service;

pub use attributes::AttributeValidator;
pub use crypto::{Argon2Hasher, CredentialHasher};
pub use errors::{HashError, HashResult, StoreError, StoreResult};
pub use feedback::{Feedback, FeedbackInbox, FeedbackReceipt, InMemoryFeedbackInbox};
pub use model::{
    Account, AccountRepository, AccountView, Attribute, AttributeChange, InMemoryAccountRepository,
};
pub use registry::{AttributeEntry, AttributeRule, AttributeSchemaRegistry, IDENTITY_FIELD};
pub use service::{AccountService, ServiceConfig, INVALID_CREDENTIALS_MESSAGE};
