//! Key bindings for the combo component.
//!
//! ## Search keys
//!
//! - **Characters**: letters, digits, space and `, ; . : - _ + *` extend the
//!   search (see [`is_search_char`]); in regex mode any printable character
//!   does
//! - **Backspace**: remove the last search character
//! - **Delete**: reset the search and close the list
//!
//! ## Dropdown keys
//!
//! Keys the search does not consume behave like in a plain dropdown:
//!
//! - **Selection**: `↑` (previous), `↓` (next)
//! - **List**: `alt+↓/f4` (toggle), `enter/esc` (close)
//! - **Clear selection**: `ctrl+x`, only for combos that allow an empty selection

use super::types::SearchMode;
use crate::key::{self, Binding, KeyPress};
use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// Punctuation accepted as search input in addition to letters and digits.
pub const SEARCH_PUNCTUATION: &str = ",;.:-_+* ";

/// Returns true if `c` may be typed into the search.
pub fn is_search_char(c: char) -> bool {
    c.is_alphanumeric() || SEARCH_PUNCTUATION.contains(c)
}

/// Key bindings for the combo.
#[derive(Debug, Clone)]
pub struct ComboKeyMap {
    /// Reset the search, clear filters and close the list.
    pub reset_search: Binding,
    /// Remove the last search character.
    pub backspace: Binding,
    /// Select the previous visible item.
    pub select_prev: Binding,
    /// Select the next visible item.
    pub select_next: Binding,
    /// Open or close the list.
    pub toggle_list: Binding,
    /// Close the list.
    pub close_list: Binding,
    /// Clear the selection.
    pub clear_selection: Binding,
}

impl Default for ComboKeyMap {
    fn default() -> Self {
        Self {
            reset_search: Binding::new(vec![KeyCode::Delete]).with_help("del", "reset search"),
            backspace: Binding::new(vec![KeyCode::Backspace]).with_help("⌫", "delete char"),
            select_prev: Binding::new(vec![KeyCode::Up]).with_help("↑", "previous"),
            select_next: Binding::new(vec![KeyCode::Down]).with_help("↓", "next"),
            toggle_list: Binding::new(vec![
                KeyPress::new(KeyCode::Down, KeyModifiers::ALT),
                KeyPress::new(KeyCode::F(4), KeyModifiers::NONE),
            ])
            .with_help("alt+↓/f4", "open list"),
            close_list: Binding::new(vec![KeyCode::Enter, KeyCode::Esc])
                .with_help("enter/esc", "close list"),
            clear_selection: Binding::new(vec![(KeyCode::Char('x'), KeyModifiers::CONTROL)])
                .with_help("ctrl+x", "clear selection"),
        }
    }
}

impl ComboKeyMap {
    /// Returns the search character carried by `msg`, if it is one.
    ///
    /// Chords with ctrl or alt are never search input. `escape` is accepted
    /// even when it is not part of the default allow-set. Once the sequence is
    /// in regex mode every printable character is accepted, so that anchors,
    /// groups and alternations can be typed.
    pub fn search_char(&self, msg: &KeyMsg, escape: char, mode: SearchMode) -> Option<char> {
        if msg
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        match msg.key {
            KeyCode::Char(c) if is_search_char(c) || c == escape => Some(c),
            KeyCode::Char(c) if mode == SearchMode::Regex && !c.is_control() => Some(c),
            _ => None,
        }
    }
}

fn enabled<'a>(bindings: impl IntoIterator<Item = &'a Binding>) -> Vec<&'a Binding> {
    bindings.into_iter().filter(|b| b.enabled()).collect()
}

/// Disabled bindings are left out of both help views.
impl key::KeyMap for ComboKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        enabled([&self.reset_search, &self.toggle_list, &self.clear_selection])
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        [
            enabled([&self.backspace, &self.reset_search]),
            enabled([
                &self.select_prev,
                &self.select_next,
                &self.toggle_list,
                &self.close_list,
            ]),
            enabled([&self.clear_selection]),
        ]
        .into_iter()
        .filter(|column| !column.is_empty())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(key: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg { key, modifiers }
    }

    #[test]
    fn test_allow_set() {
        for c in ['a', 'Z', '7', 'ä', ',', ';', '.', ':', '-', '_', '+', '*', ' '] {
            assert!(is_search_char(c), "{c:?} should be accepted");
        }
        for c in ['/', '?', '(', '^', '$', '\t'] {
            assert!(!is_search_char(c), "{c:?} should be rejected");
        }
    }

    #[test]
    fn test_search_char_ignores_chords() {
        let keys = ComboKeyMap::default();
        assert_eq!(
            keys.search_char(&msg(KeyCode::Char('A'), KeyModifiers::SHIFT), ':', SearchMode::Prefix),
            Some('A')
        );
        assert_eq!(
            keys.search_char(&msg(KeyCode::Char('x'), KeyModifiers::CONTROL), ':', SearchMode::Regex),
            None
        );
        assert_eq!(
            keys.search_char(&msg(KeyCode::Up, KeyModifiers::NONE), ':', SearchMode::Regex),
            None
        );
    }

    #[test]
    fn test_custom_escape_is_accepted() {
        let keys = ComboKeyMap::default();
        assert_eq!(
            keys.search_char(&msg(KeyCode::Char('/'), KeyModifiers::NONE), '/', SearchMode::Prefix),
            Some('/')
        );
    }

    #[test]
    fn test_regex_mode_accepts_regex_syntax() {
        let keys = ComboKeyMap::default();
        for c in ['^', '$', '(', '|', '[', '\\'] {
            let m = msg(KeyCode::Char(c), KeyModifiers::NONE);
            assert_eq!(keys.search_char(&m, ':', SearchMode::Regex), Some(c));
            assert_eq!(keys.search_char(&m, ':', SearchMode::Substring), None);
            assert_eq!(keys.search_char(&m, ':', SearchMode::Prefix), None);
        }
    }

    #[test]
    fn test_help_skips_disabled_bindings() {
        use crate::key::KeyMap;

        let mut keys = ComboKeyMap::default();
        assert_eq!(keys.short_help().len(), 3);
        assert_eq!(keys.full_help().len(), 3);

        keys.clear_selection.set_enabled(false);
        let short: Vec<&str> = keys
            .short_help()
            .into_iter()
            .map(|b| b.help().key.as_str())
            .collect();
        assert_eq!(short, vec!["del", "alt+↓/f4"]);
        assert_eq!(keys.full_help().len(), 2);
    }

    #[test]
    fn test_toggle_binding_requires_alt() {
        let keys = ComboKeyMap::default();
        assert!(keys.toggle_list.matches(&msg(KeyCode::Down, KeyModifiers::ALT)));
        assert!(keys.toggle_list.matches(&msg(KeyCode::F(4), KeyModifiers::NONE)));
        assert!(!keys.toggle_list.matches(&msg(KeyCode::Down, KeyModifiers::NONE)));
    }
}
