//! CLI command implementations

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::args::{Cli, Command, FormKind};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_output};
use crate::account::forms::{feedback_schema, login_schema, registration_schema};
use crate::account::ServiceConfig;
use crate::envelope::ResponseEnvelope;
use crate::form::{apply_all, Action, FormState};
use crate::http_server::HttpServer;
use crate::observability::Logger;

/// Input of `formsync reduce`
#[derive(Debug, Deserialize)]
pub struct ReduceInput {
    #[serde(default)]
    pub state: FormState,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(command: Command) -> CliResult<()> {
    // stdout carries the JSON result of reduce and validate
    Logger::set_stderr_only(!matches!(command, Command::Serve { .. }));

    match command {
        Command::Serve { config } => serve(config.as_deref()),
        Command::Reduce => reduce(),
        Command::Validate { form, config } => validate(form, config.as_deref()),
    }
}

/// Start the HTTP server and block until it stops
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    Logger::set_min_severity(config.log_level);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to start runtime: {}", e)))?;

    runtime
        .block_on(HttpServer::new(config.http, config.service).start())
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

/// Fold actions from stdin over the given state
pub fn reduce() -> CliResult<()> {
    let input: ReduceInput = read_input()?;
    write_output(&reduce_input(input))
}

pub fn reduce_input(input: ReduceInput) -> FormState {
    apply_all(&input.state, input.actions)
}

/// Validate a stdin payload against a form schema
pub fn validate(form: FormKind, config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    Logger::set_min_severity(config.log_level);
    let payload: Map<String, Value> = read_input()?;
    write_output(&validate_payload(form, &config.service, &payload))
}

pub fn validate_payload(
    form: FormKind,
    config: &ServiceConfig,
    payload: &Map<String, Value>,
) -> ResponseEnvelope<()> {
    let schema = match form {
        FormKind::Feedback => feedback_schema(config.feedback_max_length),
        FormKind::Registration => registration_schema(&config.password_policy),
        FormKind::Login => login_schema(),
    };
    schema.check(payload)
}
