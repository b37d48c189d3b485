use serde::{Deserialize, Serialize};

use crate::identity::{null_as_default, null_as_empty};
use crate::permission::Permission;

/// A team as returned by `GET /v1/team`.
///
/// `uuid` is the unique key. `name` is the human lookup key and is matched
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<Permission>,
}

impl Team {
    /// Case-insensitive comparison against a requested team name.
    #[must_use]
    pub fn name_matches(&self, wanted: &str) -> bool {
        !self.name.is_empty() && self.name.to_lowercase() == wanted.trim().to_lowercase()
    }

    #[must_use]
    pub fn permission_names(&self) -> Vec<&str> {
        self.permissions.iter().map(Permission::name).collect()
    }
}
