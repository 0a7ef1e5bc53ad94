//! Core types shared by the combo engine, controller and component.

use std::fmt;

/// Trait for values that can be offered by a combo.
///
/// The label is what users see in the dropdown and what every search mode
/// matches against. Two items may share a label; searches always pick the
/// first one in list order.
///
/// ```
/// use bubbletea_combo::combo::Item;
///
/// #[derive(Clone, PartialEq)]
/// struct Country {
///     code: &'static str,
///     name: &'static str,
/// }
///
/// impl Item for Country {
///     fn label(&self) -> String {
///         format!("{} ({})", self.name, self.code)
///     }
/// }
/// ```
pub trait Item: Clone {
    /// Returns the display label of this item.
    fn label(&self) -> String;
}

impl Item for String {
    fn label(&self) -> String {
        self.clone()
    }
}

impl Item for &'static str {
    fn label(&self) -> String {
        (*self).to_string()
    }
}

/// An item paired with the label computed for it when the input was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<I> {
    /// Display label.
    pub label: String,
    /// The item itself.
    pub item: I,
}

/// How the current key sequence is interpreted.
///
/// The mode is never stored; it is derived from the leading escape characters
/// of the key sequence every time it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// No escape character. Moves the selection to the first label starting
    /// with the sequence (case-insensitive) and filters nothing.
    Prefix,
    /// One escape character. Case-insensitive wildcard filter where `*`
    /// matches any run of characters.
    Substring,
    /// Two escape characters. Case-sensitive regular expression filter.
    Regex,
}

impl SearchMode {
    /// Derives the mode from a key sequence.
    ///
    /// ```
    /// use bubbletea_combo::combo::SearchMode;
    ///
    /// assert_eq!(SearchMode::classify("av", ':'), SearchMode::Prefix);
    /// assert_eq!(SearchMode::classify(":an", ':'), SearchMode::Substring);
    /// assert_eq!(SearchMode::classify("::^A", ':'), SearchMode::Regex);
    /// ```
    pub fn classify(sequence: &str, escape: char) -> Self {
        let mut chars = sequence.chars();
        match (chars.next(), chars.next()) {
            (Some(a), Some(b)) if a == escape && b == escape => Self::Regex,
            (Some(a), _) if a == escape => Self::Substring,
            _ => Self::Prefix,
        }
    }

    /// Number of leading escape characters this mode consumes.
    pub fn escape_len(self) -> usize {
        match self {
            Self::Prefix => 0,
            Self::Substring => 1,
            Self::Regex => 2,
        }
    }

    /// Returns true for the modes that narrow the visible list.
    pub fn is_filter(self) -> bool {
        !matches!(self, Self::Prefix)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix => write!(f, "prefix"),
            Self::Substring => write!(f, "substring"),
            Self::Regex => write!(f, "regex"),
        }
    }
}

/// Immutable construction-time settings of a combo.
///
/// ```
/// use bubbletea_combo::combo::ComboConfig;
///
/// let config = ComboConfig::new(true).with_escape_char('/');
/// assert!(config.allow_empty_selection());
/// assert_eq!(config.escape_char(), '/');
/// assert!(config.sorted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboConfig {
    allow_empty_selection: bool,
    escape_char: char,
    sorted: bool,
}

impl ComboConfig {
    /// Escape character used unless configured otherwise.
    pub const DEFAULT_ESCAPE_CHAR: char = ':';

    /// Creates a config. When `allow_empty_selection` is false an item is
    /// always selected whenever the list is non-empty.
    pub fn new(allow_empty_selection: bool) -> Self {
        Self {
            allow_empty_selection,
            escape_char: Self::DEFAULT_ESCAPE_CHAR,
            sorted: true,
        }
    }

    /// Sets the escape character that switches to substring/regex search.
    pub fn with_escape_char(mut self, escape: char) -> Self {
        self.escape_char = escape;
        self
    }

    /// Enables or disables sorting items by label.
    pub fn with_sorting(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Whether the selection may be empty.
    pub fn allow_empty_selection(&self) -> bool {
        self.allow_empty_selection
    }

    /// The escape character.
    pub fn escape_char(&self) -> char {
        self.escape_char
    }

    /// Whether items are sorted by label.
    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Describes the search syntax for help popups.
    pub fn usage(&self) -> String {
        let e = self.escape_char;
        format!(
            "Type to search...\n\
             \n\
             - Use '{e}' to enable substring filtering:\n    \
             Case-insensitive.\n    \
             '*' can be used as a wildcard.\n\
             - Use '{e}{e}' to enable regex filtering:\n    \
             Case-sensitive.\n\
             - Press 'Del' to reset input."
        )
    }
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self::new(false)
    }
}

/// A single key press as seen by the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// An accepted character.
    Char(char),
    /// Remove the last character.
    Backspace,
}

/// Outcome of a filter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStatus {
    /// Prefix search. `selected` is the 1-based position of the matched item,
    /// or `None` when no label starts with the sequence.
    Prefix {
        /// 1-based position of the matched item.
        selected: Option<usize>,
        /// Number of visible items.
        total: usize,
    },
    /// A filter matched `shown` of `total` items.
    Filtered {
        /// Items left visible.
        shown: usize,
        /// Items in the full list.
        total: usize,
    },
    /// A filter matched nothing and was not applied.
    NoMatches {
        /// Items in the full list, all of which stay visible.
        total: usize,
    },
}

/// What the engine decided after a key was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The mode the sequence was interpreted in.
    pub mode: SearchMode,
    /// Visible index that should become the selection, if any.
    pub selection: Option<usize>,
    /// Match counts.
    pub status: FilterStatus,
}

/// Result of [`FilterEngine::accept`](super::FilterEngine::accept).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Backspace on an empty sequence. Nothing changed.
    Ignored,
    /// The sequence became empty. Filters are cleared and the full list is
    /// visible again.
    Reset,
    /// The sequence was searched.
    Searched(SearchResult),
}

/// Human-readable live feedback for the current search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// The key sequence the status describes.
    pub sequence: String,
    /// The mode the sequence was interpreted in.
    pub mode: SearchMode,
    /// Match counts.
    pub filter: FilterStatus,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({} search - ", self.sequence, self.mode)?;
        match self.filter {
            FilterStatus::Prefix {
                selected: Some(n),
                total,
            } => write!(f, "item {n} of {total} selected)"),
            FilterStatus::Prefix {
                selected: None,
                total,
            } => write!(f, "no match among {total} items)"),
            FilterStatus::Filtered { shown, total } => {
                write!(f, "showing {shown} of {total} items)")
            }
            FilterStatus::NoMatches { total } => {
                write!(f, "no results, filter disabled, showing {total} items)")
            }
        }
    }
}
