//! Classificação de respostas HTTP

use reqwest::header::{HeaderMap, CONTENT_TYPE, LINK};
use reqwest::{Response, StatusCode};

use crate::error::GitHubError;

/// `true` se o status está em 200..=299
pub fn is_valid_response(status: StatusCode) -> bool {
    (200..=299).contains(&status.as_u16())
}

/// `true` se o `Content-Type` é `application/json` (com ou sem parâmetros)
pub fn is_json_response(headers: &HeaderMap) -> bool {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    content_type == "application/json" || content_type.starts_with("application/json;")
}

/// URL da relação `next` do header `Link`, se houver
pub fn next_page_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(parse_link_header)
        .find(|link| link.has_rel("next"))
        .map(|link| link.url)
}

/// Campo `message` de um corpo de erro JSON
pub fn provider_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Consome a resposta e monta o `InvalidResponse` correspondente
pub(crate) async fn error_from_response(response: Response) -> GitHubError {
    let status = response.status().as_u16();
    let body = response.bytes().await.unwrap_or_default();
    let message = provider_message(&body);

    tracing::warn!(
        "❌ [GitHub] Resposta inválida: {} - {}",
        status,
        message.as_deref().unwrap_or("sem mensagem")
    );

    GitHubError::invalid_response(status, message)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LinkValue {
    pub url: String,
    pub rels: Vec<String>,
}

impl LinkValue {
    fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// `<url>; rel="next", <url>; rel="last"` -> lista de links
pub(crate) fn parse_link_header(value: &str) -> Vec<LinkValue> {
    let mut links = Vec::new();
    let mut rest = value;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };

        let url = after[..end].trim().to_string();
        let tail = &after[end + 1..];
        let params_end = tail.find('<').unwrap_or(tail.len());

        let rels = tail[..params_end]
            .split([';', ','])
            .filter_map(|param| param.split_once('='))
            .filter(|(key, _)| key.trim().eq_ignore_ascii_case("rel"))
            .flat_map(|(_, value)| {
                value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();

        links.push(LinkValue { url, rels });
        rest = &tail[params_end..];
    }

    links
}
