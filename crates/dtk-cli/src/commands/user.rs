use serde::Serialize;

use dtk_access::{Authenticator, CredentialStore};
use dtk_config::DtkConfig;
use dtk_core::{Identity, LoginResponse};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::{UserCommands, UserCredentialArgs};
use crate::commands::{Outcome, fail};
use crate::output::output;

#[derive(Debug, Serialize)]
struct UserRow {
    username: String,
    email: String,
    fullname: String,
    status: &'static str,
    last_login: String,
    teams: Vec<String>,
}

impl From<&Identity> for UserRow {
    fn from(identity: &Identity) -> Self {
        Self {
            username: identity.username.clone(),
            email: identity.email.clone(),
            fullname: identity.full_name.clone(),
            status: if identity.is_active() {
                "active"
            } else {
                "suspended"
            },
            last_login: identity.last_login_display(),
            teams: identity.team_names.clone(),
        }
    }
}

/// Handle `dtk user <subcommand>`.
pub async fn handle(
    action: &UserCommands,
    config: &DtkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<Outcome> {
    let session = bootstrap::admin_session(config)?;

    match action {
        UserCommands::Find(args) => match session.resolve(&args.identifier).await {
            Ok(resolution) => {
                output(&resolution.lookup(), flags.format)?;
                Ok(Outcome::Success)
            }
            Err(error) => fail(error, flags.format),
        },
        UserCommands::List => match session.list_identities().await {
            Ok(identities) => {
                let rows = identities.iter().map(UserRow::from).collect::<Vec<_>>();
                output(&rows, flags.format)?;
                Ok(Outcome::Success)
            }
            Err(error) => fail(error, flags.format),
        },
        UserCommands::Login(args) => {
            let mut store = CredentialStore::new(Some(session.credential().clone()));
            let response = login(&Authenticator::new(&session), &mut store, args).await;
            finish(&response, response.success, flags)
        }
        UserCommands::Check(args) => {
            let response = if has_credentials(args) {
                Authenticator::new(&session)
                    .check_user(&args.username, &args.password)
                    .await
            } else {
                dtk_core::CheckUserResponse::failed(MISSING_CREDENTIALS)
            };
            finish(&response, response.success, flags)
        }
    }
}

const MISSING_CREDENTIALS: &str = "Username and password are required";

fn has_credentials(args: &UserCredentialArgs) -> bool {
    !args.username.trim().is_empty() && !args.password.is_empty()
}

async fn login(
    authenticator: &Authenticator<'_>,
    store: &mut CredentialStore,
    args: &UserCredentialArgs,
) -> LoginResponse {
    if !has_credentials(args) {
        return LoginResponse::failed(MISSING_CREDENTIALS);
    }

    match authenticator
        .login_into(store, &args.username, &args.password)
        .await
    {
        Ok(outcome) => {
            let expires_at = store
                .bearer()
                .and_then(|token| token.claims().ok())
                .and_then(|claims| claims.expires_at())
                .map(|at| at.to_rfc3339());
            LoginResponse::succeeded(&args.username, outcome.resolved_username, expires_at)
        }
        Err(error) => {
            tracing::warn!(identifier = %args.username, kind = ?error.kind(), "login failed");
            LoginResponse::failed(error.to_string())
        }
    }
}

fn finish<T: Serialize>(response: &T, success: bool, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    output(response, flags.format)?;
    Ok(if success {
        Outcome::Success
    } else {
        Outcome::Failure
    })
}
