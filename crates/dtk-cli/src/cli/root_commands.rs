use clap::Subcommand;

use crate::cli::subcommands::{TeamCommands, TokenCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Managed users: lookup, listing, login.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Teams: listing, membership, API keys.
    Team {
        #[command(subcommand)]
        action: TeamCommands,
    },
    /// Bearer token inspection (offline).
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },
}
