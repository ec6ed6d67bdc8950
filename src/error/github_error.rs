use thiserror::Error;

/// Erros do cliente GitHub
///
/// Nenhum erro é tratado internamente: todos sobem para quem chamou, que decide
/// a política de retry.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Status HTTP fora de 200..=299 (primeira página ou páginas seguintes)
    #[error("{status}: {}", .message.as_deref().unwrap_or("None"))]
    InvalidResponse { status: u16, message: Option<String> },

    /// Página com formato incompatível com o acumulado (nem array, nem objeto com `items`)
    #[error("{status}: malformed pagination")]
    MalformedPagination { status: u16 },

    /// Nenhuma fonte de token registrada e nenhum token explícito na chamada
    #[error("unimplemented token source: register one or pass an access token explicitly")]
    TokenSourceUnconfigured,

    /// Chamada feita depois de `close()`
    #[error("HTTP transport already closed")]
    TransportClosed,

    /// Erro de rede / requisição HTTP
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Erro de serialização / parsing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Valor que não pode ser usado como header HTTP
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// Configuração ausente ou inválida
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GitHubError {
    pub fn invalid_response(status: u16, message: Option<String>) -> Self {
        Self::InvalidResponse { status, message }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }

    /// Status HTTP de origem, quando o erro veio de uma resposta do provedor
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidResponse { status, .. } | Self::MalformedPagination { status } => {
                Some(*status)
            }
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Mensagem enviada pelo provedor no corpo do erro (campo `message`)
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::InvalidResponse { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// `true` para os erros classificados a partir de uma resposta HTTP
    pub fn is_invalid_response(&self) -> bool {
        matches!(
            self,
            Self::InvalidResponse { .. } | Self::MalformedPagination { .. }
        )
    }
}

/// Tipo de resultado padrão do crate
pub type GitHubResult<T> = Result<T, GitHubError>;
