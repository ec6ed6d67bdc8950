//! Aplicação de demonstração: login com GitHub
//!
//! Rotas:
//! - `/`                -> status da sessão
//! - `/login`           -> redireciona para a autorização do GitHub
//! - `/github-callback` -> troca o code pelo token (via `AuthorizedHandler`)
//! - `/user`            -> `GET /user` autenticado
//! - `/repos`           -> `GET /user/repos` com todas as páginas
//! - `/logout`          -> descarta o token
//!
//! O token fica num slot único em memória, exposto ao cliente como `TokenSource`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use github_oauth::utils::{init_tracing, redact};
use github_oauth::{
    token_source_fn, AccessToken, ApiResult, AuthorizationRequest, CallbackParams, GitHub,
    GitHubError, RequestOptions, Settings,
};

/// Slot único com o token do usuário logado
#[derive(Clone, Default)]
struct TokenStore(Arc<RwLock<Option<AccessToken>>>);

impl TokenStore {
    fn get(&self) -> Option<AccessToken> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, token: Option<AccessToken>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

#[derive(Clone)]
struct AppState {
    github: Arc<GitHub>,
    tokens: TokenStore,
    pending_state: Arc<RwLock<Option<String>>>,
    callback_url: String,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error("state mismatch in OAuth2 callback")]
    InvalidState,
}

impl IntoResponse for DemoError {
    fn into_response(self) -> Response {
        let status = match &self {
            DemoError::InvalidState => StatusCode::BAD_REQUEST,
            DemoError::GitHub(err) => match err.status() {
                Some(401) => StatusCode::UNAUTHORIZED,
                Some(404) => StatusCode::NOT_FOUND,
                Some(_) => StatusCode::BAD_GATEWAY,
                None if matches!(err, GitHubError::Http(_)) => StatusCode::BAD_GATEWAY,
                None => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        tracing::error!("❌ [Demo] {} - {}", status, self);

        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

type DemoResult<T> = Result<T, DemoError>;

/// Estado anti-CSRF derivado do relógio
fn generate_state() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    format!("{:x}", nanos)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    match state.tokens.get() {
        Some(token) => Html(format!(
            "<p>Logado ({}). <a href=\"/user\">/user</a> · <a href=\"/repos\">/repos</a> · \
             <a href=\"/logout\">sair</a></p>",
            redact(token.secret())
        )),
        None => Html("<p><a href=\"/login\">Entrar com GitHub</a></p>".to_string()),
    }
}

async fn login(State(state): State<AppState>) -> Redirect {
    let csrf = generate_state();
    *state
        .pending_state
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(csrf.clone());

    let url = state.github.authorize(
        &AuthorizationRequest::new()
            .scope(["read:user", "repo"])
            .redirect_uri(state.callback_url.clone())
            .state(csrf),
    );

    tracing::info!("↗️  [OAuth2] Redirecionando para: {}", url);
    Redirect::to(&url)
}

async fn github_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> DemoResult<Response> {
    let expected = state
        .pending_state
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();

    let tokens = &state.tokens;
    let handler = state.github.authorized_handler(|token: Option<AccessToken>, params: CallbackParams| {
        let tokens = tokens.clone();
        let expected = expected.clone();
        async move {
            if expected.is_none() || params.state != expected {
                return Err(DemoError::InvalidState);
            }

            match token {
                Some(token) => {
                    tracing::info!("✅ [OAuth2] Usuário autenticado");
                    tokens.set(Some(token));
                    Ok(Redirect::to("/").into_response())
                }
                None => {
                    let reason = params
                        .error_description
                        .or(params.error)
                        .unwrap_or_else(|| "authorization failed".to_string());
                    tracing::warn!("🚫 [OAuth2] Login não concluído: {}", reason);
                    Ok((StatusCode::UNAUTHORIZED, Html(format!("<p>Login falhou: {}</p>", reason)))
                        .into_response())
                }
            }
        }
    });

    handler.call(params).await?
}

async fn user(State(state): State<AppState>) -> DemoResult<Response> {
    let result = state.github.api().get("user", RequestOptions::new()).await?;
    Ok(into_response(result))
}

async fn repos(State(state): State<AppState>) -> DemoResult<Response> {
    let result = state
        .github
        .api()
        .get("user/repos", RequestOptions::new().all_pages(true))
        .await?;

    if let Some(list) = result.as_json().and_then(|v| v.as_array()) {
        tracing::info!("📚 [Demo] {} repositórios", list.len());
    }
    Ok(into_response(result))
}

async fn logout(State(state): State<AppState>) -> Redirect {
    state.tokens.set(None);
    Redirect::to("/")
}

fn into_response(result: ApiResult) -> Response {
    match result {
        ApiResult::Json(value) => Json(value).into_response(),
        ApiResult::Raw(raw) => {
            let status = StatusCode::from_u16(raw.status.as_u16()).unwrap_or(StatusCode::OK);
            (status, raw.text()).into_response()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenvy::dotenv().is_err() {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    init_tracing();

    let settings = Settings::new()?;
    let tokens = TokenStore::default();

    let store = tokens.clone();
    let github = GitHub::from_settings(&settings)?
        .with_token_source(token_source_fn(move || store.get()));
    let github = Arc::new(github);

    let callback_url = format!(
        "http://{}:{}/github-callback",
        settings.server.host, settings.server.port
    );

    let state = AppState {
        github: github.clone(),
        tokens,
        pending_state: Arc::new(RwLock::new(None)),
        callback_url,
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/login", get(login))
        .route("/github-callback", get(github_callback))
        .route("/user", get(user))
        .route("/repos", get(repos))
        .route("/logout", get(logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 [Demo] Servidor ouvindo em http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    github.close();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Falha ao instalar handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Falha ao instalar handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
