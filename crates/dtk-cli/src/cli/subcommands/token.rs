use clap::{Args, Subcommand};

/// Token commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TokenCommands {
    /// Decode a token payload without verifying its signature.
    Decode(TokenDecodeArgs),
}

#[derive(Clone, Debug, Args)]
pub struct TokenDecodeArgs {
    /// Compact token (`header.payload.signature`).
    pub token: String,
}
