//! General application configuration.

use serde::{Deserialize, Serialize};

const fn default_confirm_key_rotation() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Ask for confirmation before rotating a team key (the previous key is
    /// invalidated immediately).
    #[serde(default = "default_confirm_key_rotation")]
    pub confirm_key_rotation: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            confirm_key_rotation: default_confirm_key_rotation(),
        }
    }
}
