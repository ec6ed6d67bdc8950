use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::pagination::PagedResult;
use super::response::{error_from_response, is_json_response, is_valid_response, next_page_link};
use super::transport::Transport;
use crate::auth::token::{AccessToken, TokenSource};
use crate::config::ProviderConfig;
use crate::error::{GitHubError, GitHubResult};
use crate::utils::logging::{log_request_sent, log_response_received};

/// Parâmetros extras de uma chamada
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    access_token: Option<AccessToken>,
    authorization: Option<HeaderValue>,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    all_pages: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token explícito; a fonte de token registrada não é consultada
    pub fn access_token(mut self, token: impl Into<AccessToken>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sobrescreve o header `Authorization` inteiro. Headers comuns nunca o substituem.
    pub fn authorization(mut self, value: HeaderValue) -> Self {
        self.authorization = Some(value);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Parâmetro de query string da primeira requisição
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializa `data` como JSON e define `Content-Type: application/json` se ausente
    pub fn json<T: Serialize + ?Sized>(mut self, data: &T) -> GitHubResult<Self> {
        self.body = Some(serde_json::to_vec(data)?);
        self.headers
            .entry(CONTENT_TYPE)
            .or_insert_with(|| HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Segue os links `next` e agrega todas as páginas JSON
    pub fn all_pages(mut self, all_pages: bool) -> Self {
        self.all_pages = all_pages;
        self
    }
}

/// Resposta não-JSON devolvida sem decodificação
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    async fn read(response: Response) -> GitHubResult<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self { status, headers, body })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Resultado de `request`: JSON decodificado ou resposta bruta
#[derive(Debug, Clone)]
pub enum ApiResult {
    Json(Value),
    Raw(RawResponse),
}

impl ApiResult {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<RawResponse> {
        match self {
            Self::Json(_) => None,
            Self::Raw(raw) => Some(raw),
        }
    }
}

/// Cliente HTTP autenticado para a API REST do GitHub
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ProviderConfig>,
    transport: Transport,
    token_source: Option<Arc<dyn TokenSource>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base_url", &self.config.api_base_url())
            .field("has_token_source", &self.token_source.is_some())
            .field("closed", &self.transport.is_closed())
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: Arc<ProviderConfig>, transport: Transport) -> Self {
        Self {
            config,
            transport,
            token_source: None,
        }
    }

    /// Registra a fonte de token; substitui a anterior
    pub fn set_token_source<S: TokenSource + 'static>(&mut self, source: S) {
        if self.token_source.is_some() {
            tracing::debug!("🔁 [GitHub] Fonte de token substituída");
        }
        self.token_source = Some(Arc::new(source));
    }

    pub fn with_token_source<S: TokenSource + 'static>(mut self, source: S) -> Self {
        self.set_token_source(source);
        self
    }

    pub fn has_token_source(&self) -> bool {
        self.token_source.is_some()
    }

    /// URL absoluta de um recurso
    ///
    /// - absoluta (`http://` / `https://`): usada como está
    /// - começando com `/`: concatenada na base sem barra dupla
    /// - demais: concatenada direto na base
    pub fn resource_url(&self, resource: &str) -> String {
        let base = self.config.api_base_url();

        if resource.starts_with("http://") || resource.starts_with("https://") {
            resource.to_string()
        } else if let Some(relative) = resource.strip_prefix('/') {
            format!("{}{}", base, relative)
        } else {
            format!("{}{}", base, resource)
        }
    }

    /// Resolve o token: explícito primeiro, senão a fonte registrada
    async fn resolve_access_token(
        &self,
        explicit: Option<&AccessToken>,
    ) -> GitHubResult<Option<AccessToken>> {
        if let Some(token) = explicit {
            return Ok(Some(token.clone()));
        }

        let source = self
            .token_source
            .as_ref()
            .ok_or(GitHubError::TokenSourceUnconfigured)?;

        let token = source.resolve_token().await;
        if token.is_none() {
            tracing::debug!("👤 [GitHub] Fonte de token não retornou token, chamada anônima");
        }
        Ok(token)
    }

    async fn authorization_header(
        &self,
        options: &RequestOptions,
    ) -> GitHubResult<Option<HeaderValue>> {
        if let Some(value) = &options.authorization {
            return Ok(Some(value.clone()));
        }

        let Some(token) = self
            .resolve_access_token(options.access_token.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let mut value = HeaderValue::from_str(&token.authorization_value()).map_err(|_| {
            GitHubError::invalid_header("access token contains characters not allowed in a header")
        })?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        options: &RequestOptions,
        authorization: Option<&HeaderValue>,
        with_query: bool,
    ) -> GitHubResult<Response> {
        let client = self.transport.client()?;

        let mut headers = options.headers.clone();
        headers.remove(AUTHORIZATION);
        if let Some(value) = authorization {
            headers.insert(AUTHORIZATION, value.clone());
        }

        let mut builder = client.request(method.clone(), url).headers(headers);
        if with_query && !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(body.clone());
        }

        log_request_sent(method.as_str(), url);
        let response = builder.send().await?;
        log_response_received(method.as_str(), url, response.status().as_u16());

        Ok(response)
    }

    /// Executa a requisição e devolve a resposta HTTP sem classificação
    pub async fn raw_request(
        &self,
        method: Method,
        resource: &str,
        options: &RequestOptions,
    ) -> GitHubResult<Response> {
        let authorization = self.authorization_header(options).await?;
        let url = self.resource_url(resource);
        self.send(&method, &url, options, authorization.as_ref(), true)
            .await
    }

    /// Executa a requisição e classifica a resposta
    ///
    /// Status fora de 2xx vira [`GitHubError::InvalidResponse`]. Respostas JSON são
    /// decodificadas; com `all_pages`, os links `next` são seguidos em sequência e as
    /// páginas agregadas. O token é resolvido uma única vez e reutilizado em todas as
    /// páginas. Demais respostas voltam como [`ApiResult::Raw`].
    pub async fn request(
        &self,
        method: Method,
        resource: &str,
        options: &RequestOptions,
    ) -> GitHubResult<ApiResult> {
        let authorization = self.authorization_header(options).await?;
        let url = self.resource_url(resource);

        let response = self
            .send(&method, &url, options, authorization.as_ref(), true)
            .await?;

        if !is_valid_response(response.status()) {
            return Err(error_from_response(response).await);
        }

        if !is_json_response(response.headers()) {
            return Ok(ApiResult::Raw(RawResponse::read(response).await?));
        }

        let status = response.status().as_u16();
        let mut next = if options.all_pages {
            next_page_link(response.headers())
        } else {
            None
        };

        let raw = RawResponse::read(response).await?;
        if raw.body.is_empty() {
            // HEAD / 204 com Content-Type JSON: nada para decodificar
            return Ok(ApiResult::Raw(raw));
        }
        let first: Value = serde_json::from_slice(&raw.body)?;

        if next.is_none() {
            return Ok(ApiResult::Json(first));
        }

        let mut pages = PagedResult::start(first)
            .map_err(|_| GitHubError::MalformedPagination { status })?;

        while let Some(link) = next.take() {
            // Links relativos são resolvidos sobre a base da API
            let page_url = self.resource_url(&link);
            tracing::debug!("📄 [GitHub] Próxima página ({} itens até agora)", pages.len());

            let response = self
                .send(&method, &page_url, options, authorization.as_ref(), false)
                .await?;

            if !is_valid_response(response.status()) || !is_json_response(response.headers()) {
                return Err(error_from_response(response).await);
            }

            let status = response.status().as_u16();
            next = next_page_link(response.headers());
            let page: Value = serde_json::from_slice(&response.bytes().await?)?;

            pages
                .merge(page)
                .map_err(|_| GitHubError::MalformedPagination { status })?;
        }

        tracing::debug!("✅ [GitHub] Paginação concluída: {} itens", pages.len());
        Ok(ApiResult::Json(pages.into_value()))
    }

    /// Atalho para `request(GET, ...)`
    pub async fn get(&self, resource: &str, options: RequestOptions) -> GitHubResult<ApiResult> {
        self.request(Method::GET, resource, &options).await
    }

    /// Atalho para `request(HEAD, ...)`
    pub async fn head(&self, resource: &str, options: RequestOptions) -> GitHubResult<ApiResult> {
        self.request(Method::HEAD, resource, &options).await
    }

    /// Atalho para `request(DELETE, ...)`
    pub async fn delete(&self, resource: &str, options: RequestOptions) -> GitHubResult<ApiResult> {
        self.request(Method::DELETE, resource, &options).await
    }

    /// `request(POST, ...)` com `data` codificado em JSON
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        data: &T,
        options: RequestOptions,
    ) -> GitHubResult<ApiResult> {
        self.request(Method::POST, resource, &options.json(data)?)
            .await
    }

    /// `request(PUT, ...)` com `data` codificado em JSON
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        data: &T,
        options: RequestOptions,
    ) -> GitHubResult<ApiResult> {
        self.request(Method::PUT, resource, &options.json(data)?)
            .await
    }

    /// `request(PATCH, ...)` com `data` codificado em JSON
    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        data: &T,
        options: RequestOptions,
    ) -> GitHubResult<ApiResult> {
        self.request(Method::PATCH, resource, &options.json(data)?)
            .await
    }
}
