//! Proxy name matchers.

mod name;

pub use name::NameMatcherImpl;

/// Trait for matching proxy names.
pub trait Matcher: Send + Sync {
    /// Check if this matcher matches the given name.
    fn matches(&self, name: &str) -> bool;

    /// Get the matcher name for debugging.
    fn name(&self) -> &'static str;
}

/// Errors that can occur during matcher compilation.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(#[from] glob::PatternError),
}
