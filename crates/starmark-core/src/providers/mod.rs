// Provider implementations backing the SearchProvider trait
pub mod github;

pub use github::GitHubProvider;
