use std::sync::Arc;

use crate::auth::callback::{AuthorizedHandler, CallbackParams};
use crate::auth::flow::{AuthorizationFlow, AuthorizationRequest};
use crate::auth::token::{AccessToken, TokenSource};
use crate::client::api::ApiClient;
use crate::client::transport::Transport;
use crate::config::{ProviderConfig, Settings};
use crate::error::GitHubResult;

/// Ponto de entrada do crate
///
/// Dono do transporte HTTP compartilhado pelo fluxo OAuth2 e pelo cliente da API.
/// Clones de [`AuthorizationFlow`] e [`ApiClient`] obtidos daqui são visões do mesmo
/// transporte: depois de [`GitHub::close`] (ou do drop do `GitHub`) todas as chamadas
/// falham com [`GitHubError::TransportClosed`](crate::error::GitHubError::TransportClosed).
#[derive(Debug)]
pub struct GitHub {
    config: Arc<ProviderConfig>,
    transport: Transport,
    flow: AuthorizationFlow,
    api: ApiClient,
}

impl GitHub {
    pub fn new(config: ProviderConfig) -> GitHubResult<Self> {
        let transport = Transport::new()?;
        Self::build(config, transport)
    }

    /// Usa um `reqwest::Client` próprio (proxy, timeouts, TLS customizado)
    pub fn with_http_client(config: ProviderConfig, client: reqwest::Client) -> GitHubResult<Self> {
        Self::build(config, Transport::with_client(client))
    }

    /// Monta a partir das configurações carregadas por [`Settings::new`]
    pub fn from_settings(settings: &Settings) -> GitHubResult<Self> {
        Self::new(settings.provider_config()?)
    }

    fn build(config: ProviderConfig, transport: Transport) -> GitHubResult<Self> {
        config.validate()?;
        let config = Arc::new(config);

        tracing::info!(
            "🐙 [GitHub] Cliente configurado (api: {}, auth: {})",
            config.api_base_url(),
            config.auth_base_url()
        );

        Ok(Self {
            flow: AuthorizationFlow::new(config.clone(), transport.clone()),
            api: ApiClient::new(config.clone(), transport.clone()),
            config,
            transport,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn authorization(&self) -> &AuthorizationFlow {
        &self.flow
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Registra a fonte de token usada pelas chamadas sem token explícito
    pub fn set_token_source<S: TokenSource + 'static>(&mut self, source: S) {
        self.api.set_token_source(source);
    }

    pub fn with_token_source<S: TokenSource + 'static>(mut self, source: S) -> Self {
        self.set_token_source(source);
        self
    }

    pub fn authorize(&self, request: &AuthorizationRequest) -> String {
        self.flow.authorize(request)
    }

    pub async fn exchange_code(&self, code: &str) -> GitHubResult<Option<AccessToken>> {
        self.flow.exchange_code(code).await
    }

    pub async fn resolve_callback(
        &self,
        params: &CallbackParams,
    ) -> GitHubResult<Option<AccessToken>> {
        self.flow.resolve_callback(params).await
    }

    /// Envolve `continuation` no tratamento do callback OAuth2
    pub fn authorized_handler<H>(&self, continuation: H) -> AuthorizedHandler<H> {
        AuthorizedHandler::new(self.flow.clone(), continuation)
    }

    /// Fecha o transporte atual e passa a usar `client`
    pub fn replace_http_client(&self, client: reqwest::Client) -> bool {
        self.transport.replace(client)
    }

    /// Fecha o transporte. Idempotente: só a primeira chamada retorna `true`.
    pub fn close(&self) -> bool {
        let closed = self.transport.close();
        if closed {
            tracing::info!("👋 [GitHub] Cliente encerrado");
        }
        closed
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }
}

impl Drop for GitHub {
    fn drop(&mut self) {
        self.transport.close();
    }
}
