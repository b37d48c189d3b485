use std::io::{self, BufRead, Write};

use serde::Serialize;

use dtk_config::DtkConfig;
use dtk_core::{KeyIssueResponse, Team};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::{TeamCommands, TeamKeyArgs};
use crate::commands::{Outcome, fail};
use crate::output::output;

#[derive(Debug, Serialize)]
struct TeamRow {
    name: String,
    uuid: String,
    permissions: Vec<String>,
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            uuid: team.uuid.clone(),
            permissions: team.permission_names().into_iter().map(String::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MemberRow {
    username: String,
    email: String,
    fullname: String,
}

#[derive(Debug, Serialize)]
struct MembersResponse {
    team: String,
    uuid: String,
    members: Vec<MemberRow>,
    count: usize,
}

/// Handle `dtk team <subcommand>`.
pub async fn handle(
    action: &TeamCommands,
    config: &DtkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<Outcome> {
    let session = bootstrap::admin_session(config)?;

    match action {
        TeamCommands::List => match session.list_teams().await {
            Ok(teams) => {
                let rows = teams.iter().map(TeamRow::from).collect::<Vec<_>>();
                output(&rows, flags.format)?;
                Ok(Outcome::Success)
            }
            Err(error) => fail(error, flags.format),
        },
        TeamCommands::Members(args) => match session.team_members(&args.team).await {
            Ok((team, members)) => {
                let members = members
                    .into_iter()
                    .map(|identity| MemberRow {
                        username: identity.username,
                        email: identity.email,
                        fullname: identity.full_name,
                    })
                    .collect::<Vec<_>>();
                let count = members.len();
                output(
                    &MembersResponse {
                        team: team.name,
                        uuid: team.uuid,
                        members,
                        count,
                    },
                    flags.format,
                )?;
                Ok(Outcome::Success)
            }
            Err(error) => fail(error, flags.format),
        },
        TeamCommands::Key(args) => issue_key(&session, args, config, flags).await,
    }
}

async fn issue_key(
    session: &dtk_access::AdminSession,
    args: &TeamKeyArgs,
    config: &DtkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<Outcome> {
    let team = match session.find_team(&args.team).await {
        Ok(team) => team,
        Err(error) => return key_failed(error, flags),
    };

    let needs_confirmation = config.general.confirm_key_rotation && !flags.assume_yes;
    if needs_confirmation {
        let stdin = io::stdin();
        let confirmed = confirm_rotation(&mut stdin.lock(), &mut io::stderr(), &team)?;
        if !confirmed {
            return key_failed("Operation cancelled.", flags);
        }
    }

    match session.rotate_team_key(&team).await {
        Ok(issued) => {
            output(&issued.into_response(), flags.format)?;
            if !flags.quiet {
                eprintln!("Save this API key securely: it cannot be retrieved again and the previous key is now invalid.");
            }
            Ok(Outcome::Success)
        }
        Err(error) => key_failed(error, flags),
    }
}

fn key_failed(error: impl std::fmt::Display, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    output(
        &KeyIssueResponse::Failed {
            error: error.to_string(),
        },
        flags.format,
    )?;
    Ok(Outcome::Failure)
}

/// Ask until the answer is yes or no. End of input counts as no.
fn confirm_rotation<R: BufRead, W: Write>(
    input: &mut R,
    prompt: &mut W,
    team: &Team,
) -> io::Result<bool> {
    writeln!(prompt, "WARNING: This will generate a new API key for team '{}'", team.name)?;
    writeln!(prompt, "  Any existing API key for this team will be invalidated!")?;
    writeln!(prompt, "  Team UUID: {}", team.uuid)?;
    writeln!(prompt, "  Team has {} permissions", team.permissions.len())?;

    loop {
        write!(prompt, "Do you want to proceed? (yes/no): ")?;
        prompt.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => writeln!(prompt, "Please enter 'yes' or 'no'")?,
        }
    }
}
