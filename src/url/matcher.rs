use crate::{CheckerError, UrlError, UrlResult};
use regex::{Regex, RegexSet};
use std::path::Path;

/// Compiled set of ignore patterns
///
/// A URL matching any pattern is never dispatched.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    set: RegexSet,
}

impl IgnoreRules {
    /// Compiles rules from text with one regular expression per line
    ///
    /// Blank lines and lines starting with `#` are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_url_checker::url::IgnoreRules;
    ///
    /// let rules = IgnoreRules::from_lines("# assets\n\\.(png|jpg)$\n").unwrap();
    /// assert!(rules.is_match("https://example.com/logo.png"));
    /// assert!(!rules.is_match("https://example.com/about"));
    /// ```
    pub fn from_lines(content: &str) -> UrlResult<Self> {
        let mut patterns = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let pattern = line.trim();
            if pattern.is_empty() || pattern.starts_with('#') {
                continue;
            }

            // Compile one by one so a bad pattern can be reported with its line
            Regex::new(pattern).map_err(|source| UrlError::InvalidPattern {
                line: index + 1,
                source,
            })?;
            patterns.push(pattern);
        }

        let set = RegexSet::new(patterns)?;
        Ok(Self { set })
    }

    /// Loads rules from a file
    pub fn load(path: &Path) -> Result<Self, CheckerError> {
        let content = std::fs::read_to_string(path)?;
        let rules = Self::from_lines(&content)?;
        tracing::info!(
            "Loaded {} ignore pattern(s) from {}",
            rules.len(),
            path.display()
        );
        Ok(rules)
    }

    /// Returns true if any pattern matches the URL
    pub fn is_match(&self, url: &str) -> bool {
        self.set.is_match(url)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
