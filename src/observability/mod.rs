//! Observability
//!
//! - Structured logging (JSON lines)
//! - Typed events
//! - Envelope outcome counters
//!
//! Observability is read-only: it never changes an operation's outcome.
//!
//! ```ignore
//! use formsync::observability::{Event, Logger};
//!
//! Logger::event(Event::AttributeUpdated, &[("attribute", "email")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
