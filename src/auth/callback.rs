use serde::Deserialize;
use std::future::Future;
use url::form_urlencoded;

use super::flow::AuthorizationFlow;
use super::token::AccessToken;
use crate::error::GitHubResult;

/// Parâmetros do redirect de volta do GitHub (`?code=...&state=...` ou `?error=...`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Lê os parâmetros de uma query string (com ou sem `?` inicial)
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }

        params
    }

    pub fn has_code(&self) -> bool {
        self.code.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Envolve o handler do callback OAuth2
///
/// Se houver `code`, troca pelo token; senão o token é `None` e nenhuma troca
/// é feita. Em ambos os casos a continuação recebe o resultado junto com os
/// parâmetros originais (para validar `state`, exibir `error`, etc).
#[derive(Clone)]
pub struct AuthorizedHandler<H> {
    flow: AuthorizationFlow,
    continuation: H,
}

impl<H> AuthorizedHandler<H> {
    pub fn new(flow: AuthorizationFlow, continuation: H) -> Self {
        Self { flow, continuation }
    }

    pub async fn call<Fut, R>(&self, params: CallbackParams) -> GitHubResult<R>
    where
        H: Fn(Option<AccessToken>, CallbackParams) -> Fut,
        Fut: Future<Output = R>,
    {
        tracing::info!("📥 [OAuth2] Callback recebido");

        let token = self.flow.resolve_callback(&params).await?;
        Ok((self.continuation)(token, params).await)
    }
}
