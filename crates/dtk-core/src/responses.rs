//! Consumer-facing response shapes.
//!
//! These are the stable JSON documents `dtk` prints, so a caller (a web
//! front-end, a script) can branch on success or error without parsing
//! free-form messages.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Which field of the identity matched the lookup identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoundBy {
    Username,
    Email,
}

/// Response from `dtk user find`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityLookup {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub teams: Vec<String>,
    pub found_by: FoundBy,
}

impl IdentityLookup {
    #[must_use]
    pub fn new(identity: &Identity, found_by: FoundBy) -> Self {
        Self {
            username: identity.username.clone(),
            email: identity.email.clone(),
            fullname: identity.full_name.clone(),
            teams: identity.team_names.clone(),
            found_by,
        }
    }
}

/// Response from `dtk team key`: exactly one of `api_key` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyIssueResponse {
    Issued { api_key: String },
    Failed { error: String },
}

/// Response from `dtk user login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated_as: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl LoginResponse {
    /// `identifier` is what the caller typed; `authenticated_as` is the
    /// username the token was issued to.
    #[must_use]
    pub fn succeeded(
        identifier: &str,
        authenticated_as: impl Into<String>,
        expires_at: Option<String>,
    ) -> Self {
        Self {
            success: true,
            message: format!("User '{identifier}' logged in"),
            authenticated_as: Some(authenticated_as.into()),
            expires_at,
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            authenticated_as: None,
            expires_at: None,
        }
    }
}

/// Response from `dtk user check`: authenticate, then confirm the identity
/// exists in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckUserResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    /// Username the bearer token was issued to; differs from the input when
    /// an e-mail was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated_as: Option<String>,
}

impl CheckUserResponse {
    #[must_use]
    pub fn found(identity: &Identity, authenticated_as: impl Into<String>) -> Self {
        Self {
            success: true,
            message: format!("User '{}' found", identity.username),
            username: Some(identity.username.clone()),
            email: Some(identity.email.clone()),
            fullname: Some(identity.full_name.clone()),
            authenticated_as: Some(authenticated_as.into()),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            username: None,
            email: None,
            fullname: None,
            authenticated_as: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn jdoe() -> Identity {
        serde_json::from_value(json!({
            "username": "jdoe",
            "email": "jane@x.com",
            "fullname": "Jane Doe",
            "teams": [{"name": "Security"}]
        }))
        .unwrap()
    }

    #[test]
    fn identity_lookup_shape() {
        let value = serde_json::to_value(IdentityLookup::new(&jdoe(), FoundBy::Email)).unwrap();
        assert_eq!(
            value,
            json!({
                "username": "jdoe",
                "email": "jane@x.com",
                "fullname": "Jane Doe",
                "teams": ["Security"],
                "found_by": "email"
            })
        );
    }

    #[test]
    fn key_issue_response_is_untagged() {
        let issued = serde_json::to_value(KeyIssueResponse::Issued {
            api_key: "odt_abc".into(),
        })
        .unwrap();
        assert_eq!(issued, json!({"api_key": "odt_abc"}));

        let failed = serde_json::to_value(KeyIssueResponse::Failed {
            error: "Team 'x' not found.".into(),
        })
        .unwrap();
        assert_eq!(failed, json!({"error": "Team 'x' not found."}));
    }

    #[test]
    fn login_success_names_identifier_and_account() {
        let value =
            serde_json::to_value(LoginResponse::succeeded("jane@x.com", "jdoe", None)).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "User 'jane@x.com' logged in",
                "authenticated_as": "jdoe"
            })
        );
    }

    #[test]
    fn check_user_failure_omits_identity_fields() {
        let value = serde_json::to_value(CheckUserResponse::failed("nope")).unwrap();
        assert_eq!(value, json!({"success": false, "message": "nope"}));
    }

    #[test]
    fn check_user_found_reports_authenticated_username() {
        let response = CheckUserResponse::found(&jdoe(), "jdoe");
        assert!(response.success);
        assert_eq!(response.message, "User 'jdoe' found");
        assert_eq!(response.authenticated_as.as_deref(), Some("jdoe"));
    }
}
