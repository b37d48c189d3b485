//! Directory listing: managed identities, teams, and team membership.
//!
//! The service returns whole collections; there is no paging and no indexed
//! lookup, so every call re-fetches the full list.

use dtk_core::{Identity, Team};

use crate::credentials::Credential;
use crate::error::AccessError;
use crate::session::{AdminSession, Session};

const MANAGED_USERS_ENDPOINT: &str = "/v1/user/managed";
const TEAMS_ENDPOINT: &str = "/v1/team";

impl AdminSession {
    /// List every managed identity.
    ///
    /// # Errors
    ///
    /// Returns `AccessError` on transport failure, 401/403, any other
    /// non-success status, or an unparseable body.
    pub async fn list_identities(&self) -> Result<Vec<Identity>, AccessError> {
        tracing::info!("retrieving managed users");
        let identities: Vec<Identity> = self
            .api()
            .get_json(MANAGED_USERS_ENDPOINT, self.credential())
            .await?;
        tracing::info!(count = identities.len(), "retrieved managed users");
        Ok(identities)
    }
}

impl<C: Credential> Session<C> {
    /// List every team visible to this credential.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AdminSession::list_identities`].
    pub async fn list_teams(&self) -> Result<Vec<Team>, AccessError> {
        tracing::info!(scope = C::SCOPE, "retrieving teams");
        let teams: Vec<Team> = self.api().get_json(TEAMS_ENDPOINT, self.credential()).await?;
        tracing::info!(count = teams.len(), "retrieved teams");
        Ok(teams)
    }

    /// Members of the team with `uuid`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AdminSession::list_identities`].
    pub async fn list_team_members(&self, uuid: &str) -> Result<Vec<Identity>, AccessError> {
        let endpoint = format!("/v1/team/{}/membership", urlencoding::encode(uuid));
        tracing::info!(team_uuid = uuid, "retrieving team membership");
        self.api().get_json(&endpoint, self.credential()).await
    }

    /// Resolve `team_name` and list its members.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::TeamNotFound` if no team matches, otherwise the
    /// failure modes of [`Self::list_team_members`].
    pub async fn team_members(&self, team_name: &str) -> Result<(Team, Vec<Identity>), AccessError> {
        let team = self.find_team(team_name).await?;
        let members = self.list_team_members(&team.uuid).await?;
        tracing::info!(team = %team.name, count = members.len(), "retrieved team members");
        Ok((team, members))
    }
}
