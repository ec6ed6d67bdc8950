use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

use crate::utils::redact;

/// Token de acesso OAuth2
///
/// Opaco: nenhuma estrutura é assumida além de "utilizável como credencial bearer".
/// Validade e armazenamento ficam inteiramente por conta de quem chama.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn into_secret(self) -> String {
        self.0
    }

    /// Valor do header `Authorization` no formato aceito pelo GitHub
    pub fn authorization_value(&self) -> String {
        format!("token {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&redact(&self.0)).finish()
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Fonte do token do usuário atual
///
/// Chamada sempre que uma requisição precisa de credencial e nenhum token foi
/// passado explicitamente. `None` significa "sem usuário autenticado".
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn resolve_token(&self) -> Option<AccessToken>;
}

/// Adapta uma closure síncrona em [`TokenSource`]
pub struct FnTokenSource<F>(F);

/// Adapta uma closure que devolve uma future em [`TokenSource`]
pub struct AsyncFnTokenSource<F>(F);

pub fn token_source_fn<F>(f: F) -> FnTokenSource<F>
where
    F: Fn() -> Option<AccessToken> + Send + Sync,
{
    FnTokenSource(f)
}

pub fn async_token_source_fn<F, Fut>(f: F) -> AsyncFnTokenSource<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<AccessToken>> + Send,
{
    AsyncFnTokenSource(f)
}

#[async_trait]
impl<F> TokenSource for FnTokenSource<F>
where
    F: Fn() -> Option<AccessToken> + Send + Sync,
{
    async fn resolve_token(&self) -> Option<AccessToken> {
        (self.0)()
    }
}

#[async_trait]
impl<F, Fut> TokenSource for AsyncFnTokenSource<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<AccessToken>> + Send,
{
    async fn resolve_token(&self) -> Option<AccessToken> {
        (self.0)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_authorization_value() {
        let token = AccessToken::new("TOK123");
        assert_eq!(token.authorization_value(), "token TOK123");
        assert_eq!(token.secret(), "TOK123");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = AccessToken::new("gho_abcdefghijklmnopqrstuvwxyz");
        let debug_str = format!("{:?}", token);
        assert!(!debug_str.contains("abcdefghijklmnop"));
        assert!(debug_str.contains("gho_ab..."));
    }

    #[test]
    fn test_serde_transparent() {
        let token: AccessToken = serde_json::from_str("\"TOK\"").unwrap();
        assert_eq!(token, AccessToken::from("TOK"));
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"TOK\"");
    }

    #[tokio::test]
    async fn test_sync_token_source() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let source = token_source_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(AccessToken::from("sync-token"))
        });

        assert_eq!(source.resolve_token().await, Some(AccessToken::from("sync-token")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_async_token_source() {
        let source = async_token_source_fn(|| async {
            tokio::task::yield_now().await;
            Some(AccessToken::from("async-token"))
        });
        assert_eq!(source.resolve_token().await, Some(AccessToken::from("async-token")));

        let anonymous = async_token_source_fn(|| async { None });
        assert_eq!(anonymous.resolve_token().await, None);
    }
}
