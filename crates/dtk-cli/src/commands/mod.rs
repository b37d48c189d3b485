pub mod team;
pub mod token;
pub mod user;

use serde::Serialize;

use dtk_config::DtkConfig;

use crate::cli::{Commands, GlobalFlags, OutputFormat};
use crate::output::output;

/// Whether the command produced its success document.
///
/// Failures are still printed to stdout as a response document, so they are
/// not surfaced as `anyhow` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Print `{"error": ...}` and report failure.
pub(crate) fn fail(error: impl std::fmt::Display, format: OutputFormat) -> anyhow::Result<Outcome> {
    output(
        &ErrorResponse {
            error: error.to_string(),
        },
        format,
    )?;
    Ok(Outcome::Failure)
}

pub async fn dispatch(
    command: Commands,
    config: &DtkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<Outcome> {
    match command {
        Commands::User { action } => user::handle(&action, config, flags).await,
        Commands::Team { action } => team::handle(&action, config, flags).await,
        Commands::Token { action } => token::handle(&action, flags),
    }
}
