//! Configuração do provedor OAuth2 (GitHub)
//!
//! Imutável depois de construída; fornecida uma única vez na criação do cliente.

use std::fmt;
use url::Url;

use crate::error::{GitHubError, GitHubResult};

/// URL base padrão da API REST do GitHub
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com/";

/// URL base padrão do OAuth2 do GitHub
pub const DEFAULT_AUTH_BASE_URL: &str = "https://github.com/login/oauth/";

#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    client_id: String,
    client_secret: String,
    api_base_url: String,
    auth_base_url: String,
}

impl ProviderConfig {
    /// Cria a configuração com as URLs padrão do GitHub
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
        }
    }

    /// Sobrescreve a URL base da API (ex.: GitHub Enterprise ou mock em testes)
    pub fn with_api_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.api_base_url = normalize_base_url(url.as_ref());
        self
    }

    /// Sobrescreve a URL base do OAuth2
    pub fn with_auth_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.auth_base_url = normalize_base_url(url.as_ref());
        self
    }

    /// Valida se todas as configurações obrigatórias estão presentes
    pub fn validate(&self) -> GitHubResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(GitHubError::config_error("GITHUB_CLIENT_ID is required"));
        }

        if self.client_secret.trim().is_empty() {
            return Err(GitHubError::config_error("GITHUB_CLIENT_SECRET is required"));
        }

        validate_http_url("GITHUB_BASE_URL", &self.api_base_url)?;
        validate_http_url("GITHUB_AUTH_URL", &self.auth_base_url)?;

        Ok(())
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Sempre termina com exatamente uma `/`
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Sempre termina com exatamente uma `/`
    pub fn auth_base_url(&self) -> &str {
        &self.auth_base_url
    }

    pub(crate) fn authorize_endpoint(&self) -> String {
        format!("{}authorize", self.auth_base_url)
    }

    pub(crate) fn access_token_endpoint(&self) -> String {
        format!("{}access_token", self.auth_base_url)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("api_base_url", &self.api_base_url)
            .field("auth_base_url", &self.auth_base_url)
            .finish()
    }
}

fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}

fn validate_http_url(name: &str, value: &str) -> GitHubResult<()> {
    let parsed = Url::parse(value)
        .map_err(|e| GitHubError::config_error(format!("{} is not a valid URL: {}", name, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(GitHubError::config_error(format!(
            "{} must use http or https, got {}",
            name, scheme
        ))),
    }
}
