//! # Account Model
//!
//! Account entity, its attribute columns, and the repository boundary.

use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};

/// Account entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Identity; never mutable through attribute updates
    pub id: Uuid,

    /// Login handle (unique)
    pub handle: String,

    /// Display name
    pub name: String,

    /// Contact email (unique)
    pub email: String,

    /// Contact phone (unique when present)
    pub phone: Option<String>,

    /// Whether `email` has been confirmed
    pub email_verified: bool,

    /// Whether `phone` has been confirmed
    pub phone_verified: bool,

    /// Credential digest (never plaintext)
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create an unverified account
    pub fn new(
        handle: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            handle: handle.into(),
            name: name.into(),
            email: email.into(),
            phone,
            email_verified: false,
            phone_verified: false,
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Text value of a text column
    pub fn text(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Handle => Some(&self.handle),
            Attribute::Name => Some(&self.name),
            Attribute::Email => Some(&self.email),
            Attribute::Phone => self.phone.as_deref(),
            _ => None,
        }
    }

    /// Apply one change in place and bump `updated_at`
    pub fn apply(&mut self, change: &AttributeChange) {
        match change {
            AttributeChange::Handle(v) => self.handle = v.clone(),
            AttributeChange::Name(v) => self.name = v.clone(),
            AttributeChange::Email(v) => self.email = v.clone(),
            AttributeChange::Phone(v) => self.phone = v.clone(),
            AttributeChange::PasswordHash(v) => self.password_hash = v.clone(),
            AttributeChange::EmailVerified(v) => self.email_verified = *v,
            AttributeChange::PhoneVerified(v) => self.phone_verified = *v,
        }
        self.updated_at = Utc::now();
    }
}

/// Public projection of an account (no credential material)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: Uuid,
    pub handle: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            handle: account.handle.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            email_verified: account.email_verified,
            phone_verified: account.phone_verified,
            created_at: account.created_at,
        }
    }
}

/// Account columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Id,
    Handle,
    Name,
    Email,
    Phone,
    Password,
    EmailVerified,
    PhoneVerified,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Id => "id",
            Attribute::Handle => "handle",
            Attribute::Name => "name",
            Attribute::Email => "email",
            Attribute::Phone => "phone",
            Attribute::Password => "password",
            Attribute::EmailVerified => "email_verified",
            Attribute::PhoneVerified => "phone_verified",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed write to one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeChange {
    Handle(String),
    Name(String),
    Email(String),
    Phone(Option<String>),
    PasswordHash(String),
    EmailVerified(bool),
    PhoneVerified(bool),
}

impl AttributeChange {
    /// Convert a submitted JSON value into a typed write.
    ///
    /// Text values are trimmed; a blank phone clears the column. Identity
    /// and password cannot be written from a raw value.
    pub fn from_value(attribute: Attribute, value: &Value) -> StoreResult<Self> {
        let text = || {
            value
                .as_str()
                .map(|s| s.trim().to_string())
                .ok_or(StoreError::TypeMismatch {
                    attribute,
                    expected: "a string",
                })
        };
        let flag = || {
            value.as_bool().ok_or(StoreError::TypeMismatch {
                attribute,
                expected: "a boolean",
            })
        };

        match attribute {
            Attribute::Handle => Ok(AttributeChange::Handle(text()?)),
            Attribute::Name => Ok(AttributeChange::Name(text()?)),
            Attribute::Email => Ok(AttributeChange::Email(text()?)),
            Attribute::Phone => match value {
                Value::Null => Ok(AttributeChange::Phone(None)),
                _ => {
                    let phone = text()?;
                    Ok(AttributeChange::Phone((!phone.is_empty()).then_some(phone)))
                }
            },
            Attribute::EmailVerified => Ok(AttributeChange::EmailVerified(flag()?)),
            Attribute::PhoneVerified => Ok(AttributeChange::PhoneVerified(flag()?)),
            Attribute::Id | Attribute::Password => Err(StoreError::TypeMismatch {
                attribute,
                expected: "a value derived by the service",
            }),
        }
    }

    /// Text this change writes, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            AttributeChange::Handle(v) | AttributeChange::Name(v) | AttributeChange::Email(v) => {
                Some(v)
            }
            AttributeChange::Phone(v) => v.as_deref(),
            _ => None,
        }
    }
}

/// Account repository trait
///
/// The persistence boundary. Implementations own their concurrency
/// control and must enforce uniqueness of handle, email and phone at
/// write time, reporting conflicts as [`StoreError::UniqueViolation`].
pub trait AccountRepository: Send + Sync {
    /// Find an account by id
    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>>;

    /// Find an account whose `attribute` equals `value`, skipping `excluding`
    fn find_matching(
        &self,
        attribute: Attribute,
        value: &str,
        excluding: Option<Uuid>,
    ) -> StoreResult<Option<Account>>;

    /// Insert a new account
    fn create(&self, account: &Account) -> StoreResult<()>;

    /// Apply `changes` to one account as a single write
    fn update(&self, id: Uuid, changes: &[AttributeChange]) -> StoreResult<()>;
}

/// In-memory account repository
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing accounts
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("Lock poisoned".to_string())
    }

    /// First unique column on which `candidate` collides with another account
    fn conflict(accounts: &[Account], candidate: &Account) -> Option<Attribute> {
        [Attribute::Handle, Attribute::Email, Attribute::Phone]
            .into_iter()
            .find(|attribute| {
                let Some(value) = candidate.text(*attribute) else {
                    return false;
                };
                accounts
                    .iter()
                    .any(|other| other.id != candidate.id && other.text(*attribute) == Some(value))
            })
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.read().map_err(|_| Self::poisoned())?;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    fn find_matching(
        &self,
        attribute: Attribute,
        value: &str,
        excluding: Option<Uuid>,
    ) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.read().map_err(|_| Self::poisoned())?;
        Ok(accounts
            .iter()
            .filter(|a| Some(a.id) != excluding)
            .find(|a| a.text(attribute) == Some(value))
            .cloned())
    }

    fn create(&self, account: &Account) -> StoreResult<()> {
        let mut accounts = self.accounts.write().map_err(|_| Self::poisoned())?;

        if let Some(attribute) = Self::conflict(&accounts, account) {
            return Err(StoreError::UniqueViolation { attribute });
        }

        accounts.push(account.clone());
        Ok(())
    }

    fn update(&self, id: Uuid, changes: &[AttributeChange]) -> StoreResult<()> {
        let mut accounts = self.accounts.write().map_err(|_| Self::poisoned())?;

        let index = accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;

        let mut updated = accounts[index].clone();
        for change in changes {
            updated.apply(change);
        }

        if let Some(attribute) = Self::conflict(&accounts, &updated) {
            return Err(StoreError::UniqueViolation { attribute });
        }

        accounts[index] = updated;
        Ok(())
    }
}
