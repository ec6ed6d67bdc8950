//! # github_oauth
//!
//! Cliente OAuth2 do GitHub:
//! - fluxo authorization-code (`authorize` + `exchange_code`)
//! - wrapper do callback OAuth2 (`AuthorizedHandler`)
//! - chamadas REST autenticadas com token resolvido por requisição e paginação
//!   automática via header `Link`
//!
//! ```no_run
//! use github_oauth::{token_source_fn, AccessToken, GitHub, ProviderConfig, RequestOptions};
//!
//! # async fn run() -> github_oauth::GitHubResult<()> {
//! let github = GitHub::new(ProviderConfig::new("client-id", "client-secret"))?
//!     .with_token_source(token_source_fn(|| Some(AccessToken::from("gho_..."))));
//!
//! let repos = github
//!     .api()
//!     .get("user/repos", RequestOptions::new().all_pages(true))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod github;
pub mod utils;

pub use auth::{
    async_token_source_fn, token_source_fn, AccessToken, AuthorizationFlow, AuthorizationRequest,
    AuthorizedHandler, CallbackParams, TokenSource,
};
pub use client::{ApiClient, ApiResult, PagedResult, RawResponse, RequestOptions};
pub use config::{ProviderConfig, Settings};
pub use error::{GitHubError, GitHubResult};
pub use github::GitHub;
