use serde::{Deserialize, Serialize};

/// A permission descriptor attached to an identity or team.
///
/// The service returns either bare permission names or objects with a
/// `name` and optional `description`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Permission {
    Named(String),
    Structured {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl Permission {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) | Self::Structured { name, .. } => name,
        }
    }
}
