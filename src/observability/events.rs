//! Observable events
//!
//! Events are explicit and typed; every log line names one.

use std::fmt;

use super::logger::Severity;

/// Observable events in formsync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// HTTP server bound and serving
    Serving,

    // Attribute updates
    /// Attribute update received
    AttributeUpdateBegin,
    /// Attribute persisted
    AttributeUpdated,
    /// Attribute rejected with field errors
    AttributeRejected,
    /// Attribute update failed (system-level)
    AttributeFailed,

    // Account workflows
    /// Account created
    AccountRegistered,
    /// Registration rejected with field errors
    RegistrationRejected,
    /// Credentials accepted
    LoginSucceeded,
    /// Credentials rejected
    LoginRejected,
    /// Feedback stored
    FeedbackAccepted,
    /// Feedback rejected with field errors
    FeedbackRejected,
    /// Any workflow ending in a Failure envelope
    OperationFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "FORMSYNC_SERVING",

            Event::AttributeUpdateBegin => "ATTRIBUTE_UPDATE_BEGIN",
            Event::AttributeUpdated => "ATTRIBUTE_UPDATED",
            Event::AttributeRejected => "ATTRIBUTE_REJECTED",
            Event::AttributeFailed => "ATTRIBUTE_FAILED",

            Event::AccountRegistered => "ACCOUNT_REGISTERED",
            Event::RegistrationRejected => "REGISTRATION_REJECTED",
            Event::LoginSucceeded => "LOGIN_SUCCEEDED",
            Event::LoginRejected => "LOGIN_REJECTED",
            Event::FeedbackAccepted => "FEEDBACK_ACCEPTED",
            Event::FeedbackRejected => "FEEDBACK_REJECTED",
            Event::OperationFailed => "OPERATION_FAILED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::AttributeUpdateBegin => Severity::Trace,
            Event::AttributeRejected
            | Event::RegistrationRejected
            | Event::LoginRejected
            | Event::FeedbackRejected => Severity::Warn,
            Event::AttributeFailed | Event::OperationFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        for event in [
            Event::ConfigLoaded,
            Event::AttributeUpdated,
            Event::FeedbackRejected,
            Event::OperationFailed,
        ] {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failures_log_at_error() {
        assert_eq!(Event::AttributeFailed.severity(), Severity::Error);
        assert_eq!(Event::OperationFailed.severity(), Severity::Error);
        assert_eq!(Event::LoginRejected.severity(), Severity::Warn);
        assert_eq!(Event::AccountRegistered.severity(), Severity::Info);
    }
}
