//! Fluxo OAuth2 authorization-code do GitHub
//!
//! - `authorize`: monta a URL de autorização para redirecionar o usuário
//! - `exchange_code`: troca o code recebido no callback por um access token

use reqwest::header::{HeaderValue, ACCEPT};
use std::collections::HashMap;
use std::sync::Arc;
use url::form_urlencoded;

use super::callback::CallbackParams;
use super::token::AccessToken;
use crate::client::response::{is_json_response, is_valid_response};
use crate::client::transport::Transport;
use crate::config::ProviderConfig;
use crate::error::GitHubResult;
use crate::utils::redact;

/// Parâmetros opcionais da URL de autorização
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub scope: Vec<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
}

impl AuthorizationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Token anti-CSRF; a validação no retorno é responsabilidade de quem chama
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationFlow {
    config: Arc<ProviderConfig>,
    transport: Transport,
}

impl AuthorizationFlow {
    pub fn new(config: Arc<ProviderConfig>, transport: Transport) -> Self {
        Self { config, transport }
    }

    /// URL de autorização: `{auth_base_url}authorize?client_id=...[&scope][&redirect_uri][&state]`
    ///
    /// Função pura; emitir o redirect fica por conta de quem chama.
    pub fn authorize(&self, request: &AuthorizationRequest) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("client_id", self.config.client_id());

        if !request.scope.is_empty() {
            query.append_pair("scope", &request.scope.join(","));
        }
        if let Some(redirect_uri) = &request.redirect_uri {
            query.append_pair("redirect_uri", redirect_uri);
        }
        if let Some(state) = &request.state {
            query.append_pair("state", state);
        }

        format!("{}?{}", self.config.authorize_endpoint(), query.finish())
    }

    /// Troca o authorization code por um access token
    ///
    /// # Retorno
    /// - `Ok(Some(token))`: troca bem-sucedida
    /// - `Ok(None)`: o provedor não devolveu token (code inválido/expirado, acesso negado)
    /// - `Err`: falha de rede
    pub async fn exchange_code(&self, code: &str) -> GitHubResult<Option<AccessToken>> {
        let url = self.config.access_token_endpoint();
        tracing::info!(
            "🔐 [OAuth2] Trocando authorization code por access token (code: {})",
            redact(code)
        );

        let client = self.transport.client()?;
        let response = client
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("application/x-www-form-urlencoded"))
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id()),
                ("client_secret", self.config.client_secret()),
            ])
            .send()
            .await?;

        let status = response.status();
        let json = is_json_response(response.headers());
        let body = response.bytes().await?;

        if !is_valid_response(status) {
            tracing::warn!("⚠️ [OAuth2] Endpoint de token respondeu {}", status);
        }

        let fields = parse_token_response(&body, json);

        match fields.get("access_token").filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::info!("✅ [OAuth2] Access token obtido: {}", redact(token));
                Ok(Some(AccessToken::new(token.as_str())))
            }
            None => {
                tracing::warn!(
                    "❌ [OAuth2] Nenhum access token na resposta: {} - {}",
                    fields.get("error").map_or("sem erro", String::as_str),
                    fields
                        .get("error_description")
                        .map_or("sem descrição", String::as_str)
                );
                Ok(None)
            }
        }
    }

    /// Resolve o token a partir dos parâmetros do callback
    ///
    /// Sem `code` não há troca e o resultado é `None`. Um `code=` presente mas vazio
    /// também conta como ausente: nenhuma requisição é feita ao endpoint de token,
    /// em vez de trocar o valor vazio. Para quem chama o resultado é o mesmo (`None`).
    pub async fn resolve_callback(
        &self,
        params: &CallbackParams,
    ) -> GitHubResult<Option<AccessToken>> {
        match params.code.as_deref().filter(|c| !c.is_empty()) {
            Some(code) => self.exchange_code(code).await,
            None => {
                tracing::warn!(
                    "🚫 [OAuth2] Callback sem code: {}",
                    params.error.as_deref().unwrap_or("parâmetro ausente")
                );
                Ok(None)
            }
        }
    }
}

/// Corpo do endpoint de token: form-urlencoded por padrão, JSON se anunciado
fn parse_token_response(body: &[u8], json: bool) -> HashMap<String, String> {
    if json {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(body) {
            return map
                .into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect();
        }
    }

    form_urlencoded::parse(body).into_owned().collect()
}
