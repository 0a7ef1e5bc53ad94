//! Label patterns for the substring and regex search modes.
//!
//! Both modes match the *whole* label. A wildcard pattern `an` therefore
//! becomes `^.*an.*$` (case-insensitive) and a regex pattern `A.*` becomes
//! `^(?:A.*)$` (case-sensitive).

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Errors produced while compiling a label pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern is not a valid regular expression. Users compose regexes
    /// one key at a time, so this is expected while typing.
    #[error("invalid regular expression `{pattern}`: {message}")]
    InvalidRegex {
        /// The pattern as typed.
        pattern: String,
        /// The compiler's message.
        message: String,
    },
}

impl PatternError {
    fn invalid_regex(pattern: &str, err: &regex::Error) -> Self {
        Self::InvalidRegex {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }
}

/// A compiled full-label matcher.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    source: String,
    compiled: Regex,
}

impl LabelPattern {
    /// Compiles a case-sensitive regular expression that must match the
    /// entire label.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidRegex`] if `pattern` does not compile.
    ///
    /// ```
    /// use bubbletea_combo::combo::LabelPattern;
    ///
    /// let p = LabelPattern::regex("A.*o").unwrap();
    /// assert!(p.is_match("Avocado"));
    /// assert!(!p.is_match("avocado"));
    /// assert!(!p.is_match("Avocados"));
    /// assert!(LabelPattern::regex("(unclosed").is_err());
    /// ```
    pub fn regex(pattern: &str) -> Result<Self, PatternError> {
        let anchored = format!("^(?:{pattern})$");
        Regex::new(&anchored)
            .map(|compiled| Self {
                source: pattern.to_string(),
                compiled,
            })
            .map_err(|e| PatternError::invalid_regex(pattern, &e))
    }

    /// Compiles a case-insensitive wildcard pattern. `*` matches any run of
    /// characters, everything else is literal, and the pattern may occur
    /// anywhere in the label.
    ///
    /// Regex syntax has no meaning here: `a.c` matches `"xa.c"` but not
    /// `"abc"`, and `c++` matches a literal `"C++"`. Use the regex form for
    /// anything beyond `*`.
    ///
    /// # Errors
    ///
    /// Wildcard patterns are escaped before compilation, so the only possible
    /// failure is a pattern that exceeds the regex size limit.
    ///
    /// ```
    /// use bubbletea_combo::combo::LabelPattern;
    ///
    /// let p = LabelPattern::wildcard("b*na").unwrap();
    /// assert!(p.is_match("Banana"));
    /// assert!(!p.is_match("Apple"));
    ///
    /// let dotted = LabelPattern::wildcard("a.c").unwrap();
    /// assert!(dotted.is_match("XA.C"));
    /// assert!(!dotted.is_match("abc"));
    /// ```
    pub fn wildcard(pattern: &str) -> Result<Self, PatternError> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let anchored = format!("^.*{body}.*$");
        RegexBuilder::new(&anchored)
            .case_insensitive(true)
            .build()
            .map(|compiled| Self {
                source: pattern.to_string(),
                compiled,
            })
            .map_err(|e| PatternError::invalid_regex(pattern, &e))
    }

    /// Returns true if the whole label matches.
    pub fn is_match(&self, label: &str) -> bool {
        self.compiled.is_match(label)
    }

    /// The pattern as typed, without anchors.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The regular expression actually used for matching.
    pub fn as_regex(&self) -> &Regex {
        &self.compiled
    }
}
