//! Identity resolution by username or e-mail.

use dtk_core::{FoundBy, Identity, IdentityLookup};

use crate::error::AccessError;
use crate::session::AdminSession;

/// A resolved identity and the field that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub identity: Identity,
    pub found_by: FoundBy,
}

impl Resolution {
    #[must_use]
    pub fn lookup(&self) -> IdentityLookup {
        IdentityLookup::new(&self.identity, self.found_by)
    }
}

/// Lowercase and trim an identifier for comparison.
#[must_use]
pub fn normalize(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// Find `identifier` in `identities`.
///
/// A username match anywhere in the list wins over an e-mail match, even one
/// that appears earlier. Within each pass the first match in list order wins.
#[must_use]
pub fn resolve_in<'a>(identities: &'a [Identity], identifier: &str) -> Option<(&'a Identity, FoundBy)> {
    let wanted = normalize(identifier);
    if wanted.is_empty() {
        return None;
    }

    identities
        .iter()
        .find(|identity| identity.username_matches(&wanted))
        .map(|identity| (identity, FoundBy::Username))
        .or_else(|| {
            identities
                .iter()
                .find(|identity| identity.email_matches(&wanted))
                .map(|identity| (identity, FoundBy::Email))
        })
}

impl AdminSession {
    /// Resolve a free-form identifier (username or e-mail) against the full
    /// managed-user list.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::IdentityNotFound` if nothing matches. Directory
    /// failures are propagated unchanged.
    pub async fn resolve(&self, identifier: &str) -> Result<Resolution, AccessError> {
        tracing::info!(identifier, "searching for user");
        let identities = self.list_identities().await?;

        match resolve_in(&identities, identifier) {
            Some((identity, found_by)) => {
                tracing::info!(username = %identity.username, ?found_by, "found user");
                Ok(Resolution {
                    identity: identity.clone(),
                    found_by,
                })
            }
            None => {
                tracing::warn!(identifier, "no user found with username or email");
                Err(AccessError::IdentityNotFound {
                    identifier: identifier.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn identities() -> Vec<Identity> {
        serde_json::from_value(json!([
            {"username": "alice", "email": "alice@corp.example"},
            {"username": "carol", "email": "bob"},
            {"username": "bob", "email": "robert@corp.example"},
            {"username": "jdoe", "email": "jane@x.com"},
            {"username": "svc", "email": ""}
        ]))
        .unwrap()
    }

    #[rstest]
    #[case("alice")]
    #[case("Alice")]
    #[case("ALICE")]
    #[case("  alice\t")]
    fn resolution_is_case_insensitive(#[case] identifier: &str) {
        let list = identities();
        let (identity, found_by) = resolve_in(&list, identifier).unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(found_by, FoundBy::Username);
    }

    #[test]
    fn username_match_beats_earlier_email_match() {
        let list = identities();
        let (identity, found_by) = resolve_in(&list, "bob").unwrap();
        assert_eq!(identity.username, "bob");
        assert_eq!(found_by, FoundBy::Username);
    }

    #[test]
    fn email_match_reports_found_by_email() {
        let list = identities();
        let (identity, found_by) = resolve_in(&list, "JANE@X.COM").unwrap();
        assert_eq!(identity.username, "jdoe");
        assert_eq!(found_by, FoundBy::Email);
    }

    #[test]
    fn first_match_in_list_order_wins() {
        let list: Vec<Identity> = serde_json::from_value(json!([
            {"username": "first", "email": "shared@x.com"},
            {"username": "second", "email": "SHARED@x.com"}
        ]))
        .unwrap();
        let (identity, _) = resolve_in(&list, "shared@x.com").unwrap();
        assert_eq!(identity.username, "first");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("nobody@corp.example")]
    fn unknown_or_blank_identifier_is_not_found(#[case] identifier: &str) {
        assert!(resolve_in(&identities(), identifier).is_none());
    }

    #[test]
    fn resolution_lookup_shape() {
        let list = identities();
        let (identity, found_by) = resolve_in(&list, "jane@x.com").unwrap();
        let resolution = Resolution {
            identity: identity.clone(),
            found_by,
        };
        let lookup = resolution.lookup();
        assert_eq!(lookup.username, "jdoe");
        assert_eq!(lookup.found_by, FoundBy::Email);
    }
}
