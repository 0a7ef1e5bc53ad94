//! The incremental search state machine behind the combo.
//!
//! The engine owns the key sequence typed since the last reset and the list
//! of entries, and decides which entries are visible and which one should be
//! selected next. It performs no rendering and holds no selection of its own;
//! callers apply its decisions to whatever displays the list.
//!
//! # Search modes
//!
//! The leading characters of the key sequence pick the mode (see
//! [`SearchMode`]):
//!
//! - `av` selects the first label starting with "av" (case-insensitive)
//! - `:an` shows only labels containing "an" (case-insensitive, `*` wildcard)
//! - `::A.*o` shows only labels fully matching the regex `A.*o`
//!
//! A filter that matches nothing is not applied: the full list stays visible
//! so the dropdown is never empty while the user is still typing.
//!
//! ```
//! use bubbletea_combo::combo::{ComboConfig, EngineEvent, FilterEngine, KeyInput};
//!
//! let mut engine = FilterEngine::new(ComboConfig::new(false));
//! engine.set_input(vec!["Apple", "Banana", "Avocado"]);
//! assert_eq!(engine.visible_labels(), vec!["Apple", "Avocado", "Banana"]);
//!
//! for c in ":an".chars() {
//!     engine.accept(KeyInput::Char(c));
//! }
//! assert_eq!(engine.visible_labels(), vec!["Banana"]);
//!
//! for _ in 0..2 {
//!     engine.accept(KeyInput::Backspace);
//! }
//! assert_eq!(engine.accept(KeyInput::Backspace), EngineEvent::Reset);
//! assert_eq!(engine.visible_len(), 3);
//! ```

use super::pattern::LabelPattern;
use super::types::{
    ComboConfig, EngineEvent, Entry, FilterStatus, Item, KeyInput, SearchMode, SearchResult,
    Status,
};

/// Pure search and filter logic for one combo.
#[derive(Debug, Clone)]
pub struct FilterEngine<I> {
    config: ComboConfig,
    entries: Vec<Entry<I>>,
    /// Indices into `entries`, in list order.
    visible: Vec<usize>,
    key_sequence: String,
    status: Option<Status>,
}

impl<I> FilterEngine<I> {
    /// Creates an engine with no items.
    pub fn new(config: ComboConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            visible: Vec::new(),
            key_sequence: String::new(),
            status: None,
        }
    }

    /// Replaces the items, computing each label with `label_of`.
    ///
    /// Entries are sorted by label when the config asks for it. Any active
    /// search is reset. Returns the visible index that should be selected:
    /// `Some(0)` unless empty selections are allowed or there are no items.
    pub fn set_input_with<F>(&mut self, items: Vec<I>, label_of: F) -> Option<usize>
    where
        F: Fn(&I) -> String,
    {
        self.entries = items
            .into_iter()
            .map(|item| Entry {
                label: label_of(&item),
                item,
            })
            .collect();
        if self.config.sorted() {
            // Stable, so equal labels keep their input order.
            self.entries.sort_by(|a, b| a.label.cmp(&b.label));
        }
        self.reset();

        tracing::trace!(
            target: "bubbletea_combo::engine",
            items = self.entries.len(),
            "input changed"
        );

        if self.config.allow_empty_selection() || self.entries.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    /// Replaces the items, labelling them with [`Item::label`].
    pub fn set_input(&mut self, items: Vec<I>) -> Option<usize>
    where
        I: Item,
    {
        self.set_input_with(items, I::label)
    }

    /// Clears the key sequence and any filter. Calling it twice is the same
    /// as calling it once.
    pub fn reset(&mut self) {
        self.key_sequence.clear();
        self.status = None;
        self.show_all();
    }

    /// Feeds one accepted key into the search.
    pub fn accept(&mut self, input: KeyInput) -> EngineEvent {
        match input {
            KeyInput::Backspace if self.key_sequence.is_empty() => EngineEvent::Ignored,
            KeyInput::Backspace => {
                self.key_sequence.pop();
                if self.key_sequence.is_empty() {
                    self.reset();
                    return EngineEvent::Reset;
                }
                EngineEvent::Searched(self.search())
            }
            KeyInput::Char(c) => {
                self.key_sequence.push(c);
                EngineEvent::Searched(self.search())
            }
        }
    }

    fn search(&mut self) -> SearchResult {
        let mode = self.mode();
        let result = match mode {
            SearchMode::Prefix => self.prefix_search(),
            SearchMode::Substring | SearchMode::Regex => self.filter(mode),
        };

        tracing::trace!(
            target: "bubbletea_combo::engine",
            sequence = %self.key_sequence,
            %mode,
            visible = self.visible.len(),
            selection = ?result.selection,
            "searched"
        );

        self.status = Some(Status {
            sequence: self.key_sequence.clone(),
            mode,
            filter: result.status,
        });
        result
    }

    fn prefix_search(&self) -> SearchResult {
        let needle = self.key_sequence.to_lowercase();
        let selection = self
            .visible
            .iter()
            .position(|&i| self.entries[i].label.to_lowercase().starts_with(&needle));
        SearchResult {
            mode: SearchMode::Prefix,
            selection,
            status: FilterStatus::Prefix {
                selected: selection.map(|i| i + 1),
                total: self.visible.len(),
            },
        }
    }

    fn filter(&mut self, mode: SearchMode) -> SearchResult {
        let remainder: String = self.key_sequence.chars().skip(mode.escape_len()).collect();
        let compiled = match mode {
            SearchMode::Regex => LabelPattern::regex(&remainder),
            _ => LabelPattern::wildcard(&remainder),
        };

        let matching: Vec<usize> = match compiled {
            Ok(pattern) => (0..self.entries.len())
                .filter(|&i| pattern.is_match(&self.entries[i].label))
                .collect(),
            Err(err) => {
                tracing::trace!(target: "bubbletea_combo::engine", %err, "pattern rejected");
                Vec::new()
            }
        };

        let total = self.entries.len();
        let status = if matching.is_empty() {
            self.show_all();
            FilterStatus::NoMatches { total }
        } else {
            self.visible = matching;
            FilterStatus::Filtered {
                shown: self.visible.len(),
                total,
            }
        };

        SearchResult {
            mode,
            selection: Some(0),
            status,
        }
    }

    fn show_all(&mut self) {
        self.visible = (0..self.entries.len()).collect();
    }

    /// The key sequence typed since the last reset.
    pub fn key_sequence(&self) -> &str {
        &self.key_sequence
    }

    /// The mode the current key sequence is interpreted in.
    pub fn mode(&self) -> SearchMode {
        SearchMode::classify(&self.key_sequence, self.config.escape_char())
    }

    /// Feedback for the last search, or `None` after a reset.
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// The configuration the engine was created with.
    pub fn config(&self) -> &ComboConfig {
        &self.config
    }

    /// Returns true when a filter currently hides some entries.
    pub fn is_filtered(&self) -> bool {
        self.visible.len() != self.entries.len()
    }

    /// Number of entries in the full list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of visible entries.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Entry by index into the full list.
    pub fn entry(&self, index: usize) -> Option<&Entry<I>> {
        self.entries.get(index)
    }

    /// Entry by visible position.
    pub fn visible_entry(&self, index: usize) -> Option<&Entry<I>> {
        self.visible_to_entry(index).map(|i| &self.entries[i])
    }

    /// Visible entries in order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &Entry<I>> + '_ {
        self.visible.iter().map(move |&i| &self.entries[i])
    }

    /// Visible labels in order.
    pub fn visible_labels(&self) -> Vec<&str> {
        self.visible_entries().map(|e| e.label.as_str()).collect()
    }

    /// Maps a visible position to an index into the full list.
    pub fn visible_to_entry(&self, index: usize) -> Option<usize> {
        self.visible.get(index).copied()
    }

    /// Maps an index into the full list to its visible position, if shown.
    pub fn visible_position(&self, entry: usize) -> Option<usize> {
        self.visible.iter().position(|&i| i == entry)
    }

    /// Visible position of the first entry satisfying `pred`.
    pub fn find_visible<P>(&self, mut pred: P) -> Option<usize>
    where
        P: FnMut(&Entry<I>) -> bool,
    {
        self.visible.iter().position(|&i| pred(&self.entries[i]))
    }
}
