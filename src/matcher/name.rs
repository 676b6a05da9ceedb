//! Name matching implementation.

use super::{Matcher, MatcherError};
use crate::config::{ExcludeStep, MatchType};
use glob::Pattern as GlobPattern;
use regex::{Regex, RegexBuilder};

/// Compiled proxy name matcher.
#[derive(Debug)]
pub enum NameMatcherImpl {
    /// Case-sensitive substring
    Substring(String),
    /// Case-insensitive substring, compiled to an escaped `(?i)` regex
    CaseInsensitive(Regex),
    /// Regex search
    Regex(Regex),
    /// Glob pattern match
    Glob(GlobPattern),
}

impl NameMatcherImpl {
    /// Compile a name matcher from a pattern and match type.
    pub fn compile(pattern: &str, match_type: MatchType) -> Result<Self, MatcherError> {
        match match_type {
            MatchType::Substring => Ok(Self::Substring(pattern.to_string())),
            MatchType::CaseInsensitive => {
                let regex = RegexBuilder::new(&regex::escape(pattern))
                    .case_insensitive(true)
                    .build()?;
                Ok(Self::CaseInsensitive(regex))
            }
            MatchType::Regex => {
                let regex = Regex::new(pattern)?;
                Ok(Self::Regex(regex))
            }
            MatchType::Glob => {
                let pattern = GlobPattern::new(pattern)?;
                Ok(Self::Glob(pattern))
            }
        }
    }

    /// Compile the matcher configured for the exclusion step.
    pub fn from_step(step: &ExcludeStep) -> Result<Self, MatcherError> {
        Self::compile(&step.pattern, step.match_type)
    }
}

impl Matcher for NameMatcherImpl {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Substring(pattern) => name.contains(pattern.as_str()),
            Self::CaseInsensitive(regex) | Self::Regex(regex) => regex.is_match(name),
            Self::Glob(pattern) => pattern.matches(name),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Substring(_) => "substring_matcher",
            Self::CaseInsensitive(_) => "case_insensitive_matcher",
            Self::Regex(_) => "regex_matcher",
            Self::Glob(_) => "glob_matcher",
        }
    }
}
