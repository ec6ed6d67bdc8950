pub mod provider;
pub mod settings;

pub use provider::{ProviderConfig, DEFAULT_API_BASE_URL, DEFAULT_AUTH_BASE_URL};
pub use settings::{GitHubSettings, ServerSettings, Settings};
