use anyhow::Context;

use dtk_access::AdminSession;
use dtk_config::DtkConfig;

/// Load `.env` from the current directory, then the layered configuration.
pub fn load_config() -> anyhow::Result<DtkConfig> {
    DtkConfig::load_with_dotenv().context("failed to load dtk configuration")
}

/// Validate the server section and open an administrative session.
pub fn admin_session(config: &DtkConfig) -> anyhow::Result<AdminSession> {
    config.server.validate()?;
    if !config.server.has_admin_key() {
        anyhow::bail!(
            "no administrative API key configured; set DTK_SERVER__ADMIN_API_KEY or DEPENDENCY_TRACK_ADMIN_API_KEY"
        );
    }
    Ok(dtk_access::admin_session(&config.server)?)
}

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &DtkConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &DtkConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.server.is_configured() && has_env_prefix(&env_keys, "DTK_SERVER") {
        warnings.push(
            "Server config appears default while DTK_SERVER* env vars exist. Use double underscores (example: DTK_SERVER__URL)."
                .to_string(),
        );
    }

    if !config.server.has_admin_key()
        && env_keys
            .iter()
            .any(|key| key.starts_with("DTK_SERVER") && key.ends_with("API_KEY"))
    {
        warnings.push(
            "Admin API key is empty while a DTK_SERVER*API_KEY env var exists. Use DTK_SERVER__ADMIN_API_KEY."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use dtk_config::{DtkConfig, ServerConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_single_underscore_env_keys() {
        let config = DtkConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("DTK_SERVER_URL".to_string(), "https://dt.example".to_string()),
                ("DTK_SERVER_ADMIN_API_KEY".to_string(), "odt_x".to_string()),
            ],
        );

        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn does_not_warn_when_server_is_configured() {
        let config = DtkConfig {
            server: ServerConfig {
                url: "https://dt.example".to_string(),
                admin_api_key: "odt_x".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("DTK_SERVER__URL".to_string(), "https://dt.example".to_string()),
                ("DTK_SERVER__ADMIN_API_KEY".to_string(), "odt_x".to_string()),
            ],
        );

        assert!(warnings.is_empty());
    }
}
