use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::permission::Permission;

/// A managed user account as returned by `GET /v1/user/managed` or
/// `GET /v1/team/{uuid}/membership`.
///
/// `username` is the unique natural key. `email` may be empty; lookups treat
/// it as unique anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, rename = "fullname", deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<Timestamp>,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub force_password_change: bool,
    #[serde(default)]
    pub non_expiry_password: bool,
    /// Names of the teams the identity belongs to, in service order.
    #[serde(default, rename = "teams", deserialize_with = "team_names")]
    pub team_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<Permission>,
}

impl Identity {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.suspended
    }

    /// Compare the username against an already-normalized (trimmed,
    /// lowercased) identifier.
    #[must_use]
    pub fn username_matches(&self, normalized: &str) -> bool {
        !self.username.is_empty() && self.username.to_lowercase() == normalized
    }

    /// Compare the e-mail against an already-normalized identifier.
    #[must_use]
    pub fn email_matches(&self, normalized: &str) -> bool {
        !self.email.is_empty() && self.email.to_lowercase() == normalized
    }

    /// Last login rendered for display, `"Never"` when absent.
    #[must_use]
    pub fn last_login_display(&self) -> String {
        self.last_login
            .as_ref()
            .map_or_else(|| "Never".to_string(), ToString::to_string)
    }
}

/// A service timestamp. Newer servers send epoch milliseconds, older ones an
/// ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millis(ms) => match DateTime::from_timestamp_millis(*ms) {
                Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
                None => write!(f, "{ms}"),
            },
            Self::Text(text) => f.write_str(text),
        }
    }
}

pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Teams arrive as full team objects on `/user/managed` and sometimes as plain
/// names; only the name is kept.
fn team_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TeamRef {
        Name(String),
        Object {
            #[serde(default)]
            name: Option<String>,
        },
    }

    let refs = Option::<Vec<TeamRef>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(refs
        .into_iter()
        .filter_map(|team| match team {
            TeamRef::Name(name) => Some(name),
            TeamRef::Object { name } => name,
        })
        .filter(|name| !name.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const MANAGED_USER: &str = r#"{
        "username": "jdoe",
        "email": "Jane@X.com",
        "fullname": "Jane Doe",
        "lastLogin": 1717171717000,
        "suspended": false,
        "forcePasswordChange": true,
        "nonExpiryPassword": false,
        "teams": [
            {"uuid": "u1", "name": "Security", "permissions": []},
            {"uuid": "u2", "name": "Platform"}
        ],
        "permissions": [{"name": "VIEW_PORTFOLIO"}]
    }"#;

    #[test]
    fn parses_managed_user_payload() {
        let identity: Identity = serde_json::from_str(MANAGED_USER).unwrap();

        assert_eq!(identity.username, "jdoe");
        assert_eq!(identity.full_name, "Jane Doe");
        assert_eq!(identity.team_names, vec!["Security", "Platform"]);
        assert_eq!(identity.last_login, Some(Timestamp::Millis(1_717_171_717_000)));
        assert!(identity.force_password_change);
        assert!(identity.is_active());
        assert_eq!(identity.permissions[0].name(), "VIEW_PORTFOLIO");
    }

    #[test]
    fn tolerates_nulls_and_missing_fields() {
        let identity: Identity =
            serde_json::from_str(r#"{"username": "svc", "email": null, "teams": null}"#).unwrap();

        assert_eq!(identity.email, "");
        assert!(identity.team_names.is_empty());
        assert!(identity.permissions.is_empty());
        assert_eq!(identity.last_login_display(), "Never");
    }

    #[test]
    fn accepts_plain_team_names() {
        let identity: Identity =
            serde_json::from_str(r#"{"username": "a", "teams": ["Ops", "Dev"]}"#).unwrap();
        assert_eq!(identity.team_names, vec!["Ops", "Dev"]);
    }

    #[test]
    fn matching_uses_lowercase_and_skips_empty_email() {
        let identity: Identity = serde_json::from_str(MANAGED_USER).unwrap();
        assert!(identity.username_matches("jdoe"));
        assert!(identity.email_matches("jane@x.com"));

        let no_email = Identity {
            email: String::new(),
            ..identity
        };
        assert!(!no_email.email_matches(""));
    }

    #[test]
    fn text_timestamp_displays_verbatim() {
        let ts = Timestamp::Text("2024-05-31T12:00:00Z".into());
        assert_eq!(ts.to_string(), "2024-05-31T12:00:00Z");
    }
}
