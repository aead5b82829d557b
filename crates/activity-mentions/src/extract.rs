//! Mention extraction
//!
//! Content arrives either as editor HTML (profile links inside `href="..."`)
//! or as markdown-like text. The two formats delimit the username differently.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Literal that introduces a mention
pub const MENTION_PREFIX: &str = "user/";

/// Content with more prefix occurrences than this is not scanned
pub const DEFAULT_SCAN_LIMIT: usize = 1000;

/// HTML: name runs until a quote or slash
static HTML_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"user/([^"/]+)"#).expect("html mention pattern is valid"));

/// Plain text: ASCII word characters and hyphens
static TEXT_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"user/([A-Za-z0-9_-]+)").expect("text mention pattern is valid"));

/// Detected content flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Html,
    Text,
}

impl ContentFormat {
    /// Content containing a paragraph tag is treated as HTML
    #[inline]
    #[must_use]
    pub fn detect(content: &str) -> Self {
        if content.contains("<p") {
            Self::Html
        } else {
            Self::Text
        }
    }
}

/// Result of scanning content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Distinct usernames in first-mention order
    Names(Vec<String>),
    /// Too many prefix occurrences; nothing was scanned
    Skipped { occurrences: usize },
}

impl Extraction {
    /// Usernames found (empty when skipped)
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self {
            Self::Names(names) => names,
            Self::Skipped { .. } => &[],
        }
    }

    #[inline]
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Finds `user/<name>` references
#[derive(Debug, Clone, Copy)]
pub struct MentionExtractor {
    scan_limit: usize,
}

impl MentionExtractor {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_scan_limit(DEFAULT_SCAN_LIMIT)
    }

    /// Extractor that skips content with more than `scan_limit` prefix occurrences
    #[inline]
    #[must_use]
    pub fn with_scan_limit(scan_limit: usize) -> Self {
        Self { scan_limit }
    }

    #[inline]
    #[must_use]
    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }

    /// Count occurrences of the literal prefix (not of valid mentions)
    #[inline]
    #[must_use]
    pub fn prefix_occurrences(content: &str) -> usize {
        content.matches(MENTION_PREFIX).count()
    }

    /// Scan content for mentioned usernames
    #[must_use]
    pub fn extract(&self, content: &str) -> Extraction {
        let occurrences = Self::prefix_occurrences(content);
        if occurrences > self.scan_limit {
            return Extraction::Skipped { occurrences };
        }
        if occurrences == 0 {
            return Extraction::Names(Vec::new());
        }

        let pattern: &Regex = match ContentFormat::detect(content) {
            ContentFormat::Html => &*HTML_MENTION,
            ContentFormat::Text => &*TEXT_MENTION,
        };

        let names: IndexSet<String> = pattern
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        Extraction::Names(names.into_iter().collect())
    }
}

impl Default for MentionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn names(content: &str) -> Vec<String> {
        MentionExtractor::new().extract(content).names().to_vec()
    }

    #[test]
    fn text_mentions_stop_at_non_word() {
        assert_eq!(
            names("hey user/alice, and user/bob-smith! also user/carol_1."),
            vec!["alice", "bob-smith", "carol_1"]
        );
    }

    #[test]
    fn text_mentions_are_ascii_only() {
        assert_eq!(names("user/zoë"), vec!["zo"]);
    }

    #[test]
    fn html_mentions_stop_at_quote_or_slash() {
        let html = r#"<p>cc <a href="https://polkadot.example/user/alice.eth">@alice</a> and <a href="/user/bob/">bob</a></p>"#;
        assert_eq!(names(html), vec!["alice.eth", "bob"]);
    }

    #[test]
    fn repeated_mentions_collapse() {
        assert_eq!(names("user/alice user/bob user/alice"), vec!["alice", "bob"]);
    }

    #[test]
    fn no_prefix_means_no_names() {
        assert_eq!(
            MentionExtractor::new().extract("nothing to see"),
            Extraction::Names(vec![])
        );
    }

    #[test]
    fn guard_counts_prefix_not_matches() {
        // `user/` followed by nothing valid still counts toward the limit
        let content = "user/ ".repeat(3);
        let extraction = MentionExtractor::with_scan_limit(2).extract(&content);
        assert_eq!(extraction, Extraction::Skipped { occurrences: 3 });
    }

    #[test]
    fn exactly_at_limit_is_scanned() {
        let content = "user/alice ".repeat(DEFAULT_SCAN_LIMIT);
        assert_eq!(names(&content), vec!["alice"]);
    }

    #[test]
    fn over_limit_is_skipped() {
        let content = "user/alice ".repeat(DEFAULT_SCAN_LIMIT + 1);
        let extraction = MentionExtractor::new().extract(&content);
        assert!(extraction.is_skipped());
        assert!(extraction.names().is_empty());
    }

    #[test]
    fn format_detection() {
        assert_eq!(ContentFormat::detect("<p>hi</p>"), ContentFormat::Html);
        assert_eq!(ContentFormat::detect("**hi**"), ContentFormat::Text);
    }

    proptest! {
        #[test]
        fn prop_skip_iff_over_limit(limit in 0usize..20, count in 0usize..40) {
            let content = "user/x ".repeat(count);
            let extraction = MentionExtractor::with_scan_limit(limit).extract(&content);
            prop_assert_eq!(extraction.is_skipped(), count > limit);
        }

        #[test]
        fn prop_text_names_are_word_chars(content in "[a-z /_.-]{0,64}") {
            for name in MentionExtractor::new().extract(&content).names() {
                prop_assert!(!name.is_empty());
                prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
            }
        }
    }
}
