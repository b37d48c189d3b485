use figment::Jail;
use dtk_config::DtkConfig;

#[test]
fn legacy_variables_fill_server_section() {
    Jail::expect_with(|jail| {
        jail.set_env("DEPENDENCY_TRACK_URL", "https://legacy.example.com");
        jail.set_env("DEPENDENCY_TRACK_API_KEY", "odt_legacy");

        let config: DtkConfig = DtkConfig::figment().extract()?;
        assert_eq!(config.server.url, "https://legacy.example.com");
        assert_eq!(config.server.admin_api_key, "odt_legacy");
        Ok(())
    });
}

#[test]
fn admin_legacy_variable_beats_plain_api_key() {
    Jail::expect_with(|jail| {
        jail.set_env("DEPENDENCY_TRACK_API_KEY", "odt_plain");
        jail.set_env("DEPENDENCY_TRACK_ADMIN_API_KEY", "odt_admin");

        let config: DtkConfig = DtkConfig::figment().extract()?;
        assert_eq!(config.server.admin_api_key, "odt_admin");
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_legacy_variables() {
    Jail::expect_with(|jail| {
        jail.set_env("DEPENDENCY_TRACK_URL", "https://legacy.example.com");
        jail.set_env("DTK_SERVER__URL", "https://dtk.example.com");
        jail.set_env("DTK_SERVER__TIMEOUT_SECS", "5");

        let config: DtkConfig = DtkConfig::figment().extract()?;
        assert_eq!(config.server.url, "https://dtk.example.com");
        assert_eq!(config.server.timeout_secs, 5);
        Ok(())
    });
}

#[test]
fn project_local_toml_is_picked_up() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".dtk")).expect("mkdir .dtk");
        jail.create_file(
            ".dtk/config.toml",
            r#"
[server]
url = "https://local.example.com"
"#,
        )?;

        let config: DtkConfig = DtkConfig::figment().extract()?;
        assert_eq!(config.server.url, "https://local.example.com");
        Ok(())
    });
}
