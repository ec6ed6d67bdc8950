use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use super::provider::{ProviderConfig, DEFAULT_API_BASE_URL, DEFAULT_AUTH_BASE_URL};
use crate::error::{GitHubError, GitHubResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub github: GitHubSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GitHubSettings {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
    pub auth_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("github.client_id", "")?
            .set_default("github.client_secret", "")?
            .set_default("github.base_url", DEFAULT_API_BASE_URL)?
            .set_default("github.auth_url", DEFAULT_AUTH_BASE_URL)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Variáveis de ambiente
        let overrides = [
            ("GITHUB_CLIENT_ID", "github.client_id"),
            ("GITHUB_CLIENT_SECRET", "github.client_secret"),
            ("GITHUB_BASE_URL", "github.base_url"),
            ("GITHUB_AUTH_URL", "github.auth_url"),
            ("SERVER_HOST", "server.host"),
            ("PORT", "server.port"),
        ];
        for (var, key) in overrides {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Carrega as configurações e já devolve o `ProviderConfig` validado
    pub fn provider_config(&self) -> GitHubResult<ProviderConfig> {
        ProviderConfig::try_from(self.github.clone())
    }
}

impl TryFrom<GitHubSettings> for ProviderConfig {
    type Error = GitHubError;

    fn try_from(settings: GitHubSettings) -> GitHubResult<Self> {
        let config = ProviderConfig::new(settings.client_id, settings.client_secret)
            .with_api_base_url(&settings.base_url)
            .with_auth_base_url(&settings.auth_url);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "GITHUB_CLIENT_ID",
        "GITHUB_CLIENT_SECRET",
        "GITHUB_BASE_URL",
        "GITHUB_AUTH_URL",
        "SERVER_HOST",
        "PORT",
        "RUN_MODE",
    ];

    fn with_clean_env<F: FnOnce()>(vars: Vec<(&str, Option<&str>)>, f: F) {
        let mut all: Vec<(&str, Option<&str>)> = VARS
            .iter()
            .copied()
            .filter(|name| !vars.iter().any(|(k, _)| k == name))
            .map(|name| (name, None))
            .collect();
        all.extend(vars);
        temp_env::with_vars(all, f);
    }

    #[test]
    fn test_settings_from_env() {
        with_clean_env(
            vec![
                ("GITHUB_CLIENT_ID", Some("test_client_id")),
                ("GITHUB_CLIENT_SECRET", Some("test_client_secret")),
                ("PORT", Some("8080")),
            ],
            || {
                let settings = Settings::new().unwrap();
                assert_eq!(settings.github.client_id, "test_client_id");
                assert_eq!(settings.github.client_secret, "test_client_secret");
                assert_eq!(settings.github.base_url, DEFAULT_API_BASE_URL);
                assert_eq!(settings.github.auth_url, DEFAULT_AUTH_BASE_URL);
                assert_eq!(settings.server.port, 8080);

                let provider = settings.provider_config().unwrap();
                assert_eq!(provider.client_id(), "test_client_id");
            },
        );
    }

    #[test]
    fn test_settings_custom_urls_are_normalized() {
        with_clean_env(
            vec![
                ("GITHUB_CLIENT_ID", Some("id")),
                ("GITHUB_CLIENT_SECRET", Some("secret")),
                ("GITHUB_BASE_URL", Some("https://github.example.com/api/v3")),
                ("GITHUB_AUTH_URL", Some("https://github.example.com/login/oauth")),
            ],
            || {
                let provider = Settings::new().unwrap().provider_config().unwrap();
                assert_eq!(provider.api_base_url(), "https://github.example.com/api/v3/");
                assert_eq!(provider.auth_base_url(), "https://github.example.com/login/oauth/");
            },
        );
    }

    #[test]
    fn test_settings_missing_credentials() {
        with_clean_env(vec![], || {
            let settings = Settings::new().unwrap();
            let result = settings.provider_config();
            assert!(matches!(result, Err(GitHubError::Config(_))));
        });
    }
}
