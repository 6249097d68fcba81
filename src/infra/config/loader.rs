use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    domain::pagination::normalized_page_size,
    infra::{
        config::{file_config::FileConfig, AppConfig},
        error::AppError,
    },
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const API_URL_ENV: &str = "CREDIBOT_API_URL";

/// Values given on the command line, applied after the file and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
}

pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<AppConfig, AppError> {
    let mut config = load_file(path)?;

    if let Some(api_url) = env::var(API_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
    {
        config.api.base_url = api_url;
    }

    if let Some(api_url) = &overrides.api_url {
        config.api.base_url = api_url.clone();
    }

    normalize(&mut config)?;
    Ok(config)
}

fn load_file(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = AppConfig::default();

    if !config_path.exists() {
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    Ok(config)
}

fn normalize(config: &mut AppConfig) -> Result<(), AppError> {
    let base_url = config.api.base_url.trim().trim_end_matches('/');
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(AppError::ConfigInvalid {
            field: "api.base_url",
            details: format!("expected an http(s) URL, got {:?}", config.api.base_url),
        });
    }
    config.api.base_url = base_url.to_owned();

    config.list.per_page = normalized_page_size(config.list.per_page);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{infra::config::ChatMode, test_support::env_lock};

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().expect("must create temp config");
        fs::write(file.path(), contents).expect("must write test config");
        file
    }

    #[test]
    fn returns_defaults_when_file_is_missing() {
        let _guard = env_lock();
        env::remove_var(API_URL_ENV);

        let config = load(
            Some(Path::new("./missing-config.toml")),
            &ConfigOverrides::default(),
        )
        .expect("config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn merges_file_values_over_defaults() {
        let _guard = env_lock();
        env::remove_var(API_URL_ENV);
        let file = write_config(
            r#"[logging]
level = "debug"

[api]
base_url = "https://credibot.example.com/api/v1/"
request_timeout_ms = 0

[list]
per_page = 500
search_debounce_ms = 250

[chat]
mode = "plain"
model = "gpt-4o-mini"
"#,
        );

        let config = load(Some(file.path()), &ConfigOverrides::default()).expect("config must load");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.api.base_url, "https://credibot.example.com/api/v1");
        assert_eq!(config.api.request_timeout(), None);
        assert_eq!(config.list.per_page, 100);
        assert_eq!(config.list.search_debounce_ms, 250);
        assert_eq!(config.chat.mode, ChatMode::Plain);
        assert_eq!(config.chat.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.chat.max_tokens, None);
    }

    #[test]
    fn env_overrides_file_and_cli_overrides_env() {
        let _guard = env_lock();
        let file = write_config("[api]\nbase_url = \"http://file.local/api\"\n");
        env::set_var(API_URL_ENV, "http://env.local/api");

        let from_env =
            load(Some(file.path()), &ConfigOverrides::default()).expect("config must load");
        let from_cli = load(
            Some(file.path()),
            &ConfigOverrides {
                api_url: Some("http://cli.local/api".to_owned()),
            },
        )
        .expect("config must load");
        env::remove_var(API_URL_ENV);

        assert_eq!(from_env.api.base_url, "http://env.local/api");
        assert_eq!(from_cli.api.base_url, "http://cli.local/api");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let _guard = env_lock();
        env::remove_var(API_URL_ENV);

        let error = load(
            None,
            &ConfigOverrides {
                api_url: Some("localhost:3000".to_owned()),
            },
        )
        .expect_err("must reject");

        assert!(matches!(
            error,
            AppError::ConfigInvalid {
                field: "api.base_url",
                ..
            }
        ));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let _guard = env_lock();
        let file = write_config("[list]\nper_page = \"many\"\n");

        let error = load(Some(file.path()), &ConfigOverrides::default()).expect_err("must fail");

        assert!(matches!(error, AppError::ConfigParse { .. }));
    }
}
