pub mod github_error;

pub use github_error::{GitHubError, GitHubResult};
