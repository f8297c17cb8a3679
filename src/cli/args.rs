//! CLI argument definitions using clap
//!
//! Commands:
//! - formsync serve [--config <path>]
//! - formsync reduce
//! - formsync validate --form <feedback|registration|login> [--config <path>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// formsync - validation-aware form state synchronization
#[derive(Parser, Debug)]
#[command(name = "formsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the account workflows over HTTP
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Apply actions to a form state read from stdin
    ///
    /// Input: {"state": {...}, "actions": [...]}. Output: the final state.
    Reduce,

    /// Validate a payload read from stdin and print the envelope
    Validate {
        /// Which form schema to apply
        #[arg(long, value_enum)]
        form: FormKind,

        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Forms known to `validate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormKind {
    Feedback,
    Registration,
    Login,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["formsync", "validate", "--form", "feedback"]).unwrap();
        match cli.command {
            Command::Validate { form, config } => {
                assert_eq!(form, FormKind::Feedback);
                assert!(config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_with_config() {
        let cli = Cli::try_parse_from(["formsync", "serve", "--config", "/tmp/f.json"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { config: Some(_) }));
    }

    #[test]
    fn test_unknown_form_rejected() {
        assert!(Cli::try_parse_from(["formsync", "validate", "--form", "survey"]).is_err());
    }
}
