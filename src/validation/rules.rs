//! Field rules and per-field validators.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::password::PasswordPolicy;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").expect("valid phone regex"))
}

fn handle_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,32}$").expect("valid handle regex"))
}

/// A single check applied to a field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Present: not null, not a blank string
    Required,
    /// String of at most N characters
    MaxLength(usize),
    /// `local@domain.tld`
    Email,
    /// Optional `+`, then 7 to 20 digits, spaces or dashes
    Phone,
    /// 3 to 32 letters, digits, `_`, `.` or `-`
    Handle,
    /// Password requirements; the policy supplies its own message
    Password(PasswordPolicy),
}

impl Rule {
    /// `Ok` when `value` passes; on failure, the policy message if the
    /// rule has one
    fn check(&self, value: &Value) -> Result<(), Option<String>> {
        let passes = match (self, value) {
            (Rule::Required, Value::Null) => false,
            (Rule::Required, Value::String(s)) => !s.trim().is_empty(),
            (Rule::Required, _) => true,
            (Rule::MaxLength(max), Value::String(s)) => s.chars().count() <= *max,
            (Rule::Email, Value::String(s)) => email_pattern().is_match(s.trim()),
            (Rule::Phone, Value::String(s)) => phone_pattern().is_match(s.trim()),
            (Rule::Handle, Value::String(s)) => handle_pattern().is_match(s),
            (Rule::Password(policy), Value::String(s)) => {
                return match policy.violation(s) {
                    Some(message) => Err(Some(message)),
                    None => Ok(()),
                };
            }
            _ => false,
        };

        if passes {
            Ok(())
        } else {
            Err(None)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Check {
    rule: Rule,
    message: String,
}

/// Ordered checks for one field, each paired with its message.
///
/// ```ignore
/// let email = FieldValidator::new()
///     .rule(Rule::Required, "Email is required")
///     .rule(Rule::Email, "Enter a valid email address");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldValidator {
    checks: Vec<Check>,
    optional: bool,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check
    pub fn rule(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.checks.push(Check {
            rule,
            message: message.into(),
        });
        self
    }

    /// Skip every check when the value is null or a blank string
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn is_absent(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Every failing message, in check order
    pub fn violations(&self, value: &Value) -> Vec<String> {
        if self.optional && Self::is_absent(value) {
            return Vec::new();
        }

        self.checks
            .iter()
            .filter_map(|check| match check.rule.check(value) {
                Ok(()) => None,
                Err(custom) => Some(custom.unwrap_or_else(|| check.message.clone())),
            })
            .collect()
    }

    /// First failing message
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self.violations(value).into_iter().next() {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn email() -> FieldValidator {
        FieldValidator::new()
            .rule(Rule::Required, "Email is required")
            .rule(Rule::Email, "Enter a valid email address")
    }

    #[test]
    fn test_required() {
        let v = FieldValidator::new().rule(Rule::Required, "Required");
        assert!(v.validate(&json!("x")).is_ok());
        assert!(v.validate(&json!(3)).is_ok());
        assert_eq!(v.validate(&json!("   ")), Err("Required".to_string()));
        assert_eq!(v.validate(&Value::Null), Err("Required".to_string()));
    }

    #[test]
    fn test_email_collects_all_violations() {
        assert!(email().validate(&json!("ada@example.com")).is_ok());
        assert_eq!(
            email().violations(&json!("")),
            ["Email is required", "Enter a valid email address"]
        );
        assert_eq!(
            email().validate(&json!("bad")),
            Err("Enter a valid email address".to_string())
        );
    }

    #[test]
    fn test_phone_and_handle() {
        let phone = FieldValidator::new().rule(Rule::Phone, "Enter a valid phone number");
        assert!(phone.validate(&json!("+64 21 555 0199")).is_ok());
        assert!(phone.validate(&json!("555-0199")).is_ok());
        assert!(phone.validate(&json!("12")).is_err());
        assert!(phone.validate(&json!("call me")).is_err());

        let handle = FieldValidator::new().rule(Rule::Handle, "Invalid handle");
        assert!(handle.validate(&json!("alice_01")).is_ok());
        assert!(handle.validate(&json!("al")).is_err());
        assert!(handle.validate(&json!("has space")).is_err());
    }

    #[test]
    fn test_non_string_fails_text_rules() {
        let v = FieldValidator::new().rule(Rule::MaxLength(10), "Too long");
        assert_eq!(v.validate(&json!(12)), Err("Too long".to_string()));
    }

    #[test]
    fn test_optional_skips_blank() {
        let v = FieldValidator::new()
            .rule(Rule::Phone, "Enter a valid phone number")
            .optional();
        assert!(v.validate(&json!("")).is_ok());
        assert!(v.validate(&Value::Null).is_ok());
        assert!(v.validate(&json!("x")).is_err());
    }

    #[test]
    fn test_password_rule_uses_policy_message() {
        let v = FieldValidator::new().rule(
            Rule::Password(PasswordPolicy::default()),
            "Invalid password",
        );
        assert_eq!(
            v.validate(&json!("short")),
            Err("Password must be at least 8 characters".to_string())
        );
        assert_eq!(v.validate(&json!(5)), Err("Invalid password".to_string()));
    }
}
