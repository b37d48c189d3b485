use clap::{Args, Subcommand};

/// Team commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TeamCommands {
    /// List teams and their permissions.
    List,
    /// List members of a team.
    Members(TeamMembersArgs),
    /// Generate a new API key for a team. Invalidates the current key.
    Key(TeamKeyArgs),
}

#[derive(Clone, Debug, Args)]
pub struct TeamMembersArgs {
    /// Team name (case-insensitive).
    pub team: String,
}

#[derive(Clone, Debug, Args)]
pub struct TeamKeyArgs {
    /// Team name (case-insensitive).
    pub team: String,
}
