//! formsync - validation-aware form state synchronization
//!
//! A client-side form reducer that never fails, a three-state response
//! envelope, and a server-side attribute validator whose field errors
//! project back onto the form one message per field.

pub mod account;
pub mod cli;
pub mod envelope;
pub mod form;
pub mod http_server;
pub mod observability;
pub mod validation;
