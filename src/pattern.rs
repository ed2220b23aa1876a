use regex::Regex;
use std::cell::OnceCell;

use crate::error::{IncludeVarsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    /// Match anywhere in the filename.
    Search,
    /// Match must end at the end of the filename.
    Suffix,
}

/// A regular expression applied to bare filenames.
///
/// Compilation is deferred to the first match, so a malformed pattern is only
/// reported once a filename actually reaches it.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    mode: MatchMode,
    compiled: OnceCell<std::result::Result<Regex, regex::Error>>,
}

impl Pattern {
    /// Name filter: unanchored search.
    pub fn search(source: impl Into<String>) -> Self {
        Self::with_mode(source.into(), MatchMode::Search)
    }

    /// Ignore filter: the pattern text with `$` appended, searched.
    pub fn suffix(source: impl Into<String>) -> Self {
        Self::with_mode(source.into(), MatchMode::Suffix)
    }

    fn with_mode(source: String, mode: MatchMode) -> Self {
        Self {
            source,
            mode,
            compiled: OnceCell::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, filename: &str) -> Result<bool> {
        let compiled = self.compiled.get_or_init(|| match self.mode {
            MatchMode::Search => Regex::new(&self.source),
            MatchMode::Suffix => Regex::new(&format!("{}$", self.source)),
        });

        match compiled {
            Ok(re) => Ok(re.is_match(filename)),
            Err(err) => Err(IncludeVarsError::InvalidPattern {
                pattern: self.source.clone(),
                source: err.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_unanchored() {
        let pattern = Pattern::search("webapp");
        assert!(pattern.is_match("webapp.yml").unwrap());
        assert!(pattern.is_match("my_webapp_vars.yml").unwrap());
        assert!(!pattern.is_match("database.yml").unwrap());
    }

    #[test]
    fn suffix_is_end_anchored() {
        let pattern = Pattern::suffix("secret.yml");
        assert!(pattern.is_match("secret.yml").unwrap());
        assert!(pattern.is_match("top_secret.yml").unwrap());
        assert!(!pattern.is_match("secret.yml.bak").unwrap());
    }

    #[test]
    fn default_markdown_pattern() {
        let pattern = Pattern::suffix(".*.md");
        assert!(pattern.is_match("README.md").unwrap());
        assert!(!pattern.is_match("main.yml").unwrap());
    }

    #[test]
    fn suffix_anchor_binds_to_last_alternative() {
        let pattern = Pattern::suffix("foo|bar");
        assert!(pattern.is_match("foo.yml").unwrap());
        assert!(!pattern.is_match("bar.yml").unwrap());
    }

    #[test]
    fn invalid_pattern_fails_on_first_match() {
        let pattern = Pattern::suffix("[unclosed");
        let err = pattern.is_match("a.yml").unwrap_err();
        assert!(matches!(err, IncludeVarsError::InvalidPattern { .. }));
        assert_eq!(err.to_string(), "Invalid regular expression: [unclosed");

        // Still an error on later matches.
        assert!(pattern.is_match("b.yml").is_err());
    }
}
