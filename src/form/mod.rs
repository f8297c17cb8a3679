//! # Form State Container
//!
//! A pure, immutable container tracking named input fields and their
//! validation errors.
//!
//! Every transition goes through [`apply`], which builds a new
//! [`FormState`] from the old one plus the action's delta. The old value
//! is never mutated, no transition fails, and no transition adds or
//! removes keys once a form is initialized.
//!
//! Server feedback flows back in through [`Action::UpdateErrors`], whose
//! merge rule is [`project_errors`]:
//!
//! ```text
//! for every key k: state[k].error == envelope.errors[k]?.[0] ?? null
//! ```

mod action;
mod reducer;
mod state;

pub use action::{Action, Baseline};
pub use reducer::{apply, apply_all, project_errors};
pub use state::{FormState, InputState};
