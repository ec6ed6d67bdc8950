//! Transporte HTTP compartilhado
//!
//! Uma única instância de `reqwest::Client` atende todas as chamadas durante a vida
//! do cliente. `close()` libera o handle exatamente uma vez; requisições em voo já
//! seguram o seu próprio clone do client e terminam normalmente.

use reqwest::Client;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{GitHubError, GitHubResult};

/// User-Agent enviado em todas as chamadas (o GitHub rejeita requisições sem ele)
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client padrão: sem timeout (quem chama impõe prazos), redirects seguidos automaticamente
pub fn default_http_client() -> GitHubResult<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(GitHubError::from)
}

#[derive(Debug, Clone)]
pub struct Transport {
    inner: Arc<RwLock<Option<Client>>>,
}

impl Transport {
    pub fn new() -> GitHubResult<Self> {
        Ok(Self::with_client(default_http_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(client))),
        }
    }

    /// Handle para uma chamada. O lock é liberado antes de qualquer I/O.
    pub fn client(&self) -> GitHubResult<Client> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(GitHubError::TransportClosed)
    }

    /// Fecha o transporte atual e instala `client` no lugar.
    ///
    /// Retorna `true` se havia um transporte aberto que foi fechado.
    pub fn replace(&self, client: Client) -> bool {
        let previous = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(client);

        if previous.is_some() {
            tracing::debug!("🔌 [GitHub] Transporte HTTP anterior fechado");
        }
        previous.is_some()
    }

    /// Idempotente: só a primeira chamada fecha; as seguintes retornam `false`.
    pub fn close(&self) -> bool {
        let previous = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if previous.is_some() {
            tracing::debug!("🔌 [GitHub] Transporte HTTP fechado");
        }
        previous.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
