//! Exclusion rules read from `.ufazienignore`.
//!
//! A path is excluded when any pattern is a substring of it, a suffix of it,
//! or (for patterns ending in `/`) a prefix of it. There is no negation and no
//! precedence: the rules are a plain OR.
//!
//! The substring rule is broad: `data` excludes `src/database.php`. Existing
//! projects rely on the current behaviour, so it is kept as is.

use std::fs;
use std::path::Path;

/// Content written to `.ufazienignore` for new non-build projects.
pub const DEFAULT_IGNORE: &str = "# Files and directories to exclude from deployment
.git/
.gitignore
.ufazien.json
*.log
*.tmp
.DS_Store
Thumbs.db
desktop.ini
.vscode/
.idea/
node_modules/
__pycache__/
*.pyc
*.pyo
*.pyd
.Python
venv/
env/
ENV/

# For build projects (Vite/React/etc.):
# Uncomment the lines below to deploy only the build output
# src/
# public/
# package.json
# package-lock.json
# tsconfig.json
# vite.config.js
# vite.config.ts
";

/// Ordered set of exclusion patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionMatcher {
    patterns: Vec<String>,
}

impl ExclusionMatcher {
    /// Builds a matcher from ignore-file content.
    pub fn parse(content: &str) -> Self {
        let patterns = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();

        Self { patterns }
    }

    /// Loads the ignore file. A missing or unreadable file excludes nothing.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    /// Patterns in file order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if the `/`-separated relative path is excluded.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            path.contains(pattern.as_str())
                || path.ends_with(pattern.as_str())
                || (pattern.ends_with('/') && path.starts_with(pattern.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let matcher = ExclusionMatcher::parse("# comment\n\n  dist/  \nsecret.txt\n   # indented\n");
        assert_eq!(matcher.patterns(), &["dist/".to_string(), "secret.txt".to_string()]);
    }

    #[test]
    fn test_directory_prefix_pattern() {
        let matcher = ExclusionMatcher::parse("dist/");
        assert!(matcher.is_excluded("dist/app.js"));
        assert!(matcher.is_excluded("dist/assets/logo.svg"));
        assert!(!matcher.is_excluded("distribution.txt"));
    }

    #[test]
    fn test_suffix_pattern() {
        let matcher = ExclusionMatcher::parse("secret.txt");
        assert!(matcher.is_excluded("config/secret.txt"));
        assert!(matcher.is_excluded("secret.txt"));
        assert!(!matcher.is_excluded("config/public.txt"));
    }

    #[test]
    fn test_substring_rule_is_broad() {
        let matcher = ExclusionMatcher::parse("data");
        assert!(matcher.is_excluded("src/database.php"));
    }

    #[test]
    fn test_nested_directory_pattern_matches_anywhere() {
        let matcher = ExclusionMatcher::parse("node_modules/");
        assert!(matcher.is_excluded("frontend/node_modules/react/index.js"));
    }

    #[test]
    fn test_glob_characters_are_literal() {
        let matcher = ExclusionMatcher::parse("*.log");
        assert!(!matcher.is_excluded("logs/error.log"));
        assert!(matcher.is_excluded("weird/*.log"));
    }

    #[test]
    fn test_missing_file_excludes_nothing() {
        let matcher = ExclusionMatcher::load(Path::new("/nonexistent/.ufazienignore"));
        assert!(matcher.patterns().is_empty());
        assert!(!matcher.is_excluded("anything"));
    }

    #[test]
    fn test_default_ignore_excludes_vcs_and_manifest() {
        let matcher = ExclusionMatcher::parse(DEFAULT_IGNORE);
        assert!(matcher.is_excluded(".git/HEAD"));
        assert!(matcher.is_excluded(".ufazien.json"));
        assert!(!matcher.is_excluded("index.php"));
    }
}
