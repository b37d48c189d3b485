use clap::{Args, Subcommand};

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Resolve a username or e-mail to a managed user.
    Find(UserFindArgs),
    /// List managed users.
    List,
    /// Log in with a username or e-mail and print the result.
    Login(UserCredentialArgs),
    /// Log in, then confirm the user exists in the directory.
    Check(UserCredentialArgs),
}

#[derive(Clone, Debug, Args)]
pub struct UserFindArgs {
    /// Username or e-mail address (case-insensitive).
    pub identifier: String,
}

#[derive(Clone, Debug, Args)]
pub struct UserCredentialArgs {
    /// Username or e-mail address.
    #[arg(short, long)]
    pub username: String,
    /// Password.
    #[arg(short, long)]
    pub password: String,
}
