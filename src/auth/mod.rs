//! # Autenticação OAuth2 com GitHub
//!
//! ## Estrutura:
//! - `token.rs`: `AccessToken` e a capacidade `TokenSource`
//! - `flow.rs`: URL de autorização e troca de code por token
//! - `callback.rs`: parâmetros do callback e o wrapper `AuthorizedHandler`

pub mod callback;
pub mod flow;
pub mod token;

pub use callback::{AuthorizedHandler, CallbackParams};
pub use flow::{AuthorizationFlow, AuthorizationRequest};
pub use token::{async_token_source_fn, token_source_fn, AccessToken, TokenSource};
