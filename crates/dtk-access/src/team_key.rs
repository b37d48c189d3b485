//! Team API key issuance.
//!
//! `PUT /v1/team/{uuid}/key` replaces the team's key: every call returns a
//! new key and invalidates the previous one. The returned key cannot be read
//! back later, so callers must persist it immediately.
//!
//! Not safe to retry blindly. After a timeout the server may already have
//! rotated the key, so a retry would invalidate a key nobody received.
//! Concurrent calls for the same team race; the last writer wins.

use std::fmt;

use reqwest::Method;
use serde_json::Value;

use dtk_core::{KeyIssueResponse, Team};

use crate::credentials::{ApiKey, Credential};
use crate::error::AccessError;
use crate::session::Session;

/// A freshly issued team key.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedKey {
    pub team_uuid: String,
    pub team_name: String,
    key: String,
}

impl IssuedKey {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.key
    }

    /// Use the issued key as an `X-API-Key` credential.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::MissingCredential` if the key is blank, which
    /// issuance already rules out.
    pub fn to_api_key(&self) -> Result<ApiKey, AccessError> {
        ApiKey::new(self.key.clone())
    }

    #[must_use]
    pub fn into_response(self) -> KeyIssueResponse {
        KeyIssueResponse::Issued { api_key: self.key }
    }
}

impl fmt::Debug for IssuedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedKey")
            .field("team_uuid", &self.team_uuid)
            .field("team_name", &self.team_name)
            .field("key", &"***")
            .finish()
    }
}

/// First team whose name matches case-insensitively, in list order.
#[must_use]
pub fn find_team<'a>(teams: &'a [Team], name: &str) -> Option<&'a Team> {
    teams.iter().find(|team| team.name_matches(name))
}

/// Team names that contain, or are contained in, `name` (case-insensitive).
/// Only a hint for a failed lookup.
#[must_use]
pub fn near_matches(teams: &[Team], name: &str) -> Vec<String> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return Vec::new();
    }
    teams
        .iter()
        .filter(|team| {
            let candidate = team.name.to_lowercase();
            !candidate.is_empty() && (candidate.contains(&wanted) || wanted.contains(&candidate))
        })
        .map(|team| team.name.clone())
        .collect()
}

/// Extract the key from a rotation response: `{"key": "..."}`, or a bare
/// JSON string from older servers.
pub(crate) fn parse_issued_key(body: &str) -> Result<String, String> {
    let body = body.trim();
    if body.is_empty() {
        return Err("No API key returned in response".into());
    }
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("response is not JSON: {e}"))?;
    let key = match &value {
        Value::Object(map) => map.get("key").and_then(Value::as_str),
        Value::String(key) => Some(key.as_str()),
        _ => None,
    };
    match key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err("response has no usable 'key' field".into()),
    }
}

impl<C: Credential> Session<C> {
    /// Find a team by name.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::TeamNotFound` (with near matches) if no team
    /// matches. Directory failures are propagated unchanged.
    pub async fn find_team(&self, name: &str) -> Result<Team, AccessError> {
        let teams = self.list_teams().await?;
        if let Some(team) = find_team(&teams, name) {
            tracing::info!(team = %team.name, uuid = %team.uuid, permissions = team.permissions.len(), "found team");
            return Ok(team.clone());
        }
        let near_matches = near_matches(&teams, name);
        tracing::warn!(team = name, ?near_matches, "team not found");
        Err(AccessError::TeamNotFound {
            name: name.to_string(),
            near_matches,
        })
    }

    /// Resolve `team_name` and rotate its key.
    ///
    /// # Errors
    ///
    /// `TeamNotFound`, `Issuance`, or any transport/HTTP error. See the module
    /// docs before retrying a `Transport` error.
    pub async fn issue_team_key(&self, team_name: &str) -> Result<IssuedKey, AccessError> {
        let team = self.find_team(team_name).await?;
        self.rotate_team_key(&team).await
    }

    /// Rotate the key of an already-resolved team.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Issuance` if the response carries no usable key,
    /// or any transport/HTTP error.
    pub async fn rotate_team_key(&self, team: &Team) -> Result<IssuedKey, AccessError> {
        let endpoint = format!("/v1/team/{}/key", urlencoding::encode(&team.uuid));
        tracing::warn!(team = %team.name, uuid = %team.uuid, "generating API key; any existing key for this team is invalidated");

        let body = self
            .api()
            .call(Method::PUT, &endpoint, self.credential())
            .await?;
        let key = parse_issued_key(&body).map_err(|reason| AccessError::Issuance {
            team: team.name.clone(),
            reason,
        })?;

        tracing::info!(team = %team.name, "API key generated successfully");
        Ok(IssuedKey {
            team_uuid: team.uuid.clone(),
            team_name: team.name.clone(),
            key,
        })
    }
}
