//! Structured JSON logger
//!
//! - One log line = one event
//! - Event first, severity second, remaining keys sorted
//! - Synchronous, no buffering
//! - Lines below the minimum severity (INFO by default) are dropped
//! - ERROR goes to stderr; everything goes to stderr once
//!   [`Logger::set_stderr_only`] is on, leaving stdout to command output

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use super::events::Event;

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);
static STDERR_ONLY: AtomicBool = AtomicBool::new(false);

/// Log severity levels
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    #[default]
    Info = 1,
    /// User-correctable rejections
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Log a typed event at its own severity
    pub fn event(event: Event, fields: &[(&str, &str)]) {
        Self::log(event.severity(), event.as_str(), fields);
    }

    /// Log an event name with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity < Self::min_severity() {
            return;
        }

        if Self::goes_to_stderr(severity, STDERR_ONLY.load(Ordering::Relaxed)) {
            Self::log_to_writer(severity, event, fields, &mut io::stderr());
        } else {
            Self::log_to_writer(severity, event, fields, &mut io::stdout());
        }
    }

    /// Drop lines below `severity` from now on
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Send every line to stderr
    pub fn set_stderr_only(enabled: bool) {
        STDERR_ONLY.store(enabled, Ordering::Relaxed);
    }

    fn goes_to_stderr(severity: Severity, stderr_only: bool) -> bool {
        stderr_only || severity >= Severity::Error
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let _ = writer.write_all(Self::format_line(severity, event, fields).as_bytes());
        let _ = writer.flush();
    }

    /// Render one log line, newline included
    fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);

        output.push_str("{\"event\":\"");
        Self::escape_json_string(&mut output, event);
        output.push_str("\",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            Self::escape_json_string(&mut output, key);
            output.push_str("\":\"");
            Self::escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push_str("}\n");
        output
    }

    fn escape_json_string(output: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => output.push_str("\\\""),
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c.is_control() => {
                    output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => output.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_severity_from_config_name() {
        let severity: Severity = serde_json::from_str("\"TRACE\"").unwrap();
        assert_eq!(severity, Severity::Trace);
        assert!(serde_json::from_str::<Severity>("\"VERBOSE\"").is_err());

        for severity in [Severity::Trace, Severity::Info, Severity::Warn, Severity::Error] {
            assert_eq!(Severity::from_u8(severity as u8), severity);
        }
    }

    #[test]
    fn test_stderr_routing() {
        assert!(!Logger::goes_to_stderr(Severity::Info, false));
        assert!(!Logger::goes_to_stderr(Severity::Warn, false));
        assert!(Logger::goes_to_stderr(Severity::Error, false));
        assert!(Logger::goes_to_stderr(Severity::Info, true));
        assert!(Logger::goes_to_stderr(Severity::Trace, true));
    }

    #[test]
    fn test_trace_dropped_by_default() {
        assert_eq!(Logger::min_severity(), Severity::Info);
        assert!(Severity::Trace < Logger::min_severity());
    }

    #[test]
    fn test_line_is_json() {
        let line = Logger::format_line(
            Severity::Warn,
            "ATTRIBUTE_REJECTED",
            &[("field", "email"), ("account", "42")],
        );
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "ATTRIBUTE_REJECTED");
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["field"], "email");
    }

    #[test]
    fn test_fields_sorted_after_event() {
        let a = Logger::format_line(Severity::Info, "E", &[("zebra", "1"), ("apple", "2")]);
        let b = Logger::format_line(Severity::Info, "E", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(a, b);
        assert!(a.find("\"event\"").unwrap() < a.find("\"severity\"").unwrap());
        assert!(a.find("apple").unwrap() < a.find("zebra").unwrap());
    }

    #[test]
    fn test_escapes_special_chars() {
        let line = Logger::format_line(Severity::Error, "E", &[("cause", "bad \"x\"\nnext")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["cause"], "bad \"x\"\nnext");
        assert_eq!(line.matches('\n').count(), 1);
    }
}
