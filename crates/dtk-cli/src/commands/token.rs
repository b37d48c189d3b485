use crate::cli::GlobalFlags;
use crate::cli::subcommands::TokenCommands;
use crate::commands::{Outcome, fail};
use crate::output::output;

/// Handle `dtk token <subcommand>`. Never touches the network.
pub fn handle(action: &TokenCommands, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    match action {
        TokenCommands::Decode(args) => match dtk_access::inspect::decode(&args.token) {
            Ok(claims) => {
                output(&claims, flags.format)?;
                Ok(Outcome::Success)
            }
            Err(error) => fail(error, flags.format),
        },
    }
}
