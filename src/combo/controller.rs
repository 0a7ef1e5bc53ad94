//! Key handling and selection management for a combo.
//!
//! [`InputController`] sits between raw key messages and the
//! [`FilterEngine`]. It decides which keys the search consumes, feeds them to
//! the engine, and applies the engine's decisions to a [`Surface`]. It also
//! owns the current selection, so every change (typed search, navigation or
//! programmatic) passes through [`InputController::select_visible`] and
//! reaches the registered listeners.

use super::engine::FilterEngine;
use super::keys::ComboKeyMap;
use super::surface::Surface;
use super::types::{ComboConfig, EngineEvent, Item, KeyInput, SearchResult};
use bubbletea_rs::KeyMsg;

/// Handle returned by [`InputController::on_selection_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Callback invoked with the newly selected item, or `None` when the
/// selection was cleared.
pub type SelectionListener<I> = Box<dyn FnMut(Option<&I>) + Send>;

/// Whether a key was handled by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The search used the key. It must not reach the dropdown's own
    /// handling.
    Consumed,
    /// The key is not for the search. The dropdown handles it as usual.
    PassThrough,
}

impl KeyDisposition {
    /// Returns true for [`KeyDisposition::Consumed`].
    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Drives a [`FilterEngine`] from key events and keeps a [`Surface`] and the
/// selection in sync with it.
///
/// ```
/// use bubbletea_combo::combo::{ComboConfig, Dropdown, InputController, KeyDisposition};
/// use bubbletea_rs::KeyMsg;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let mut dropdown: Dropdown<&str> = Dropdown::new();
/// let mut controller = InputController::new(ComboConfig::new(false));
/// controller.set_input(vec!["Apple", "Banana", "Avocado"], &mut dropdown);
/// assert_eq!(controller.selection(), Some(&"Apple"));
///
/// for c in ['a', 'v'] {
///     let key = KeyMsg { key: KeyCode::Char(c), modifiers: KeyModifiers::NONE };
///     assert_eq!(controller.handle_key(&key, &mut dropdown), KeyDisposition::Consumed);
/// }
/// assert_eq!(controller.selection(), Some(&"Avocado"));
/// assert!(dropdown.is_expanded());
/// ```
pub struct InputController<I> {
    engine: FilterEngine<I>,
    keymap: ComboKeyMap,
    /// Index into the engine's full entry list.
    selected: Option<usize>,
    listeners: Vec<(ListenerId, SelectionListener<I>)>,
    next_listener: usize,
    pending_change: Option<Option<I>>,
}

impl<I: Clone> InputController<I> {
    /// Creates a controller with no items and the default key map.
    pub fn new(config: ComboConfig) -> Self {
        let mut keymap = ComboKeyMap::default();
        keymap
            .clear_selection
            .set_enabled(config.allow_empty_selection());
        Self {
            engine: FilterEngine::new(config),
            keymap,
            selected: None,
            listeners: Vec::new(),
            next_listener: 0,
            pending_change: None,
        }
    }

    /// Replaces the key map.
    ///
    /// The clear-selection binding is disabled for combos that require a
    /// selection.
    pub fn with_keymap(mut self, mut keymap: ComboKeyMap) -> Self {
        keymap
            .clear_selection
            .set_enabled(self.engine.config().allow_empty_selection());
        self.keymap = keymap;
        self
    }

    /// The key map.
    pub fn keymap(&self) -> &ComboKeyMap {
        &self.keymap
    }

    /// Mutable access to the key map.
    pub fn keymap_mut(&mut self) -> &mut ComboKeyMap {
        &mut self.keymap
    }

    /// The underlying engine.
    pub fn engine(&self) -> &FilterEngine<I> {
        &self.engine
    }

    /// The configuration.
    pub fn config(&self) -> &ComboConfig {
        self.engine.config()
    }

    /// Handles one key press.
    ///
    /// The reset key, search characters and backspace are consumed. Every
    /// other key passes through untouched.
    pub fn handle_key(&mut self, msg: &KeyMsg, surface: &mut dyn Surface<I>) -> KeyDisposition {
        tracing::trace!(
            target: "bubbletea_combo::controller",
            key = ?msg.key,
            sequence = %self.engine.key_sequence(),
            "key pressed"
        );

        if self.keymap.reset_search.matches(msg) {
            tracing::trace!(target: "bubbletea_combo::controller", "search reset requested");
            self.reset(surface);
            return KeyDisposition::Consumed;
        }

        let input = if self.keymap.backspace.matches(msg) {
            KeyInput::Backspace
        } else if let Some(c) = self.keymap.search_char(
            msg,
            self.engine.config().escape_char(),
            self.engine.mode(),
        ) {
            KeyInput::Char(c)
        } else {
            return KeyDisposition::PassThrough;
        };

        self.accept(input, surface);
        KeyDisposition::Consumed
    }

    /// Feeds an accepted key to the engine and applies the outcome.
    pub fn accept(&mut self, input: KeyInput, surface: &mut dyn Surface<I>) {
        match self.engine.accept(input) {
            EngineEvent::Ignored => {}
            EngineEvent::Reset => {
                self.sync_visible(surface);
                surface.hide_status();
                surface.set_list_expanded(false);
            }
            EngineEvent::Searched(result) => self.apply_search(result, surface),
        }
    }

    fn apply_search(&mut self, result: SearchResult, surface: &mut dyn Surface<I>) {
        surface.set_list_expanded(true);
        self.sync_visible(surface);
        if let Some(status) = self.engine.status() {
            surface.show_status(&status.to_string());
        }
        if let Some(index) = result.selection {
            self.select_visible(index, surface);
        }
    }

    /// Clears the search and any filter, closes the list and hides the
    /// status. The selection is kept.
    pub fn reset(&mut self, surface: &mut dyn Surface<I>) {
        self.engine.reset();
        surface.set_list_expanded(false);
        self.sync_visible(surface);
        surface.hide_status();
    }

    /// Resets the search because the combo lost focus.
    pub fn focus_lost(&mut self, surface: &mut dyn Surface<I>) {
        tracing::trace!(
            target: "bubbletea_combo::controller",
            "focus lost, resetting key sequence, filter and status"
        );
        self.reset(surface);
    }

    /// Replaces the items, labelling them with `label_of`.
    ///
    /// The search is reset and the previous selection dropped. Unless empty
    /// selections are allowed, the first item is selected.
    pub fn set_input_with<F>(&mut self, items: Vec<I>, label_of: F, surface: &mut dyn Surface<I>)
    where
        F: Fn(&I) -> String,
    {
        let first = self.engine.set_input_with(items, label_of);
        let had_selection = self.selected.take().is_some();
        surface.set_list_expanded(false);
        surface.hide_status();
        self.sync_visible(surface);

        match first {
            Some(index) => {
                self.select_visible(index, surface);
            }
            None if had_selection => self.notify(),
            None => {}
        }
    }

    /// Replaces the items, labelling them with [`Item::label`].
    pub fn set_input(&mut self, items: Vec<I>, surface: &mut dyn Surface<I>)
    where
        I: Item,
    {
        self.set_input_with(items, I::label, surface);
    }

    /// Selects the item at `index` of the visible list.
    ///
    /// The index is checked against the current visible list; a stale index
    /// is dropped and `false` returned.
    pub fn select_visible(&mut self, index: usize, surface: &mut dyn Surface<I>) -> bool {
        let Some(entry) = self.engine.visible_to_entry(index) else {
            tracing::trace!(
                target: "bubbletea_combo::controller",
                index,
                visible = self.engine.visible_len(),
                "not updating selection, index out of range"
            );
            return false;
        };

        tracing::trace!(target: "bubbletea_combo::controller", index, "selecting item");
        self.selected = Some(entry);
        surface.set_selected_index(Some(index));
        self.notify();
        true
    }

    /// Moves the selection by `delta` visible rows, clamped to the list.
    ///
    /// With nothing selected, moving down selects the first item and moving
    /// up selects the last.
    pub fn select_relative(&mut self, delta: isize, surface: &mut dyn Surface<I>) -> bool {
        let len = self.engine.visible_len();
        if len == 0 {
            return false;
        }
        let target = match self.selected_visible_index() {
            Some(current) => current.saturating_add_signed(delta).min(len - 1),
            None if delta < 0 => len - 1,
            None => 0,
        };
        if Some(target) == self.selected_visible_index() {
            return false;
        }
        self.select_visible(target, surface)
    }

    /// Selects `item`, or clears the selection for `None`.
    ///
    /// `Some` selects the first visible item equal to `item`; items that are
    /// not visible are ignored. `None` is only honoured when empty selections
    /// are allowed. Returns true if the selection was applied.
    pub fn set_selection(&mut self, item: Option<&I>, surface: &mut dyn Surface<I>) -> bool
    where
        I: PartialEq,
    {
        match item {
            Some(item) => match self.engine.find_visible(|e| &e.item == item) {
                Some(index) => self.select_visible(index, surface),
                None => {
                    tracing::trace!(
                        target: "bubbletea_combo::controller",
                        "not updating selection, item is not visible"
                    );
                    false
                }
            },
            None => self.clear_selection(surface),
        }
    }

    /// Clears the selection. Only allowed when the combo accepts an empty
    /// selection.
    pub fn clear_selection(&mut self, surface: &mut dyn Surface<I>) -> bool {
        if !self.engine.config().allow_empty_selection() {
            tracing::trace!(
                target: "bubbletea_combo::controller",
                "not clearing selection, an item is required"
            );
            return false;
        }
        self.selected = None;
        surface.set_selected_index(None);
        self.notify();
        true
    }

    /// The selected item.
    pub fn selection(&self) -> Option<&I> {
        self.selected
            .and_then(|i| self.engine.entry(i))
            .map(|e| &e.item)
    }

    /// Label of the selected item.
    pub fn selected_label(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.engine.entry(i))
            .map(|e| e.label.as_str())
    }

    /// Position of the selected item in the visible list, if it is visible.
    pub fn selected_visible_index(&self) -> Option<usize> {
        self.selected
            .and_then(|i| self.engine.visible_position(i))
    }

    /// Registers a callback fired on every selection change.
    pub fn on_selection_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(Option<&I>) + Send + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregisters a callback. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Takes the last selection change since the previous call.
    pub fn take_selection_change(&mut self) -> Option<Option<I>> {
        self.pending_change.take()
    }

    fn notify(&mut self) {
        let item = self
            .selected
            .and_then(|i| self.engine.entry(i))
            .map(|e| &e.item);
        for (_, listener) in self.listeners.iter_mut() {
            listener(item);
        }
        self.pending_change = Some(item.cloned());
    }

    fn sync_visible(&self, surface: &mut dyn Surface<I>) {
        surface.set_visible_items(self.engine.visible_entries().cloned().collect());
        surface.set_selected_index(self.selected_visible_index());
    }
}

impl<I> std::fmt::Debug for InputController<I>
where
    I: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputController")
            .field("engine", &self.engine)
            .field("selected", &self.selected)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::types::Entry;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::{Arc, Mutex};

    /// Records every surface command in order.
    #[derive(Debug, Default)]
    struct Recorder {
        commands: Vec<Command>,
        visible: Vec<String>,
        selected: Option<usize>,
        expanded: bool,
        status: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Command {
        Items(Vec<String>),
        Select(Option<usize>),
        Expand(bool),
        Show(String),
        Hide,
    }

    impl<I> Surface<I> for Recorder {
        fn set_visible_items(&mut self, items: Vec<Entry<I>>) {
            self.visible = items.into_iter().map(|e| e.label).collect();
            self.commands.push(Command::Items(self.visible.clone()));
        }
        fn set_selected_index(&mut self, index: Option<usize>) {
            self.selected = index;
            self.commands.push(Command::Select(index));
        }
        fn set_list_expanded(&mut self, expanded: bool) {
            self.expanded = expanded;
            self.commands.push(Command::Expand(expanded));
        }
        fn show_status(&mut self, text: &str) {
            self.status = Some(text.to_string());
            self.commands.push(Command::Show(text.to_string()));
        }
        fn hide_status(&mut self) {
            self.status = None;
            self.commands.push(Command::Hide);
        }
    }

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn setup(allow_empty: bool) -> (InputController<&'static str>, Recorder) {
        let mut surface = Recorder::default();
        let mut controller = InputController::new(ComboConfig::new(allow_empty));
        controller.set_input(vec!["Apple", "Banana", "Avocado"], &mut surface);
        (controller, surface)
    }

    fn type_str(c: &mut InputController<&'static str>, s: &mut Recorder, text: &str) {
        for ch in text.chars() {
            assert_eq!(c.handle_key(&key(KeyCode::Char(ch)), s), KeyDisposition::Consumed);
        }
    }

    #[test]
    fn test_scenario_prefix_search() {
        let (mut c, mut s) = setup(false);
        assert_eq!(s.visible, vec!["Apple", "Avocado", "Banana"]);
        assert_eq!(c.selection(), Some(&"Apple"));

        type_str(&mut c, &mut s, "a");
        assert_eq!(c.selection(), Some(&"Apple"));
        type_str(&mut c, &mut s, "v");
        assert_eq!(c.selection(), Some(&"Avocado"));
        assert_eq!(s.selected, Some(1));
        assert_eq!(s.visible.len(), 3);
        assert!(s.expanded);
    }

    #[test]
    fn test_scenario_substring_filter() {
        let (mut c, mut s) = setup(false);
        type_str(&mut c, &mut s, ":an");
        assert_eq!(s.visible, vec!["Banana"]);
        assert_eq!(c.selection(), Some(&"Banana"));
        assert_eq!(s.selected, Some(0));
        assert!(s.status.as_deref().unwrap().contains("1 of 3"));
    }

    #[test]
    fn test_scenario_regex_without_matches() {
        let (mut c, mut s) = setup(false);
        type_str(&mut c, &mut s, "::^Z$");
        assert_eq!(c.engine().key_sequence(), "::^Z$");
        assert_eq!(s.visible, vec!["Apple", "Avocado", "Banana"]);
        assert_eq!(c.selection(), Some(&"Apple"));
        assert!(s
            .status
            .as_deref()
            .unwrap()
            .contains("no results, filter disabled, showing 3"));
    }

    #[test]
    fn test_scenario_clear_keeps_selection_empty() {
        let (mut c, mut s) = setup(true);
        assert_eq!(c.selection(), None);

        c.select_visible(2, &mut s);
        assert_eq!(c.selection(), Some(&"Banana"));
        assert!(c.clear_selection(&mut s));
        assert_eq!(c.selection(), None);

        c.reset(&mut s);
        assert_eq!(c.selection(), None);
        assert_eq!(s.selected, None);
    }

    #[test]
    fn test_scenario_backspace_to_empty_restores_list() {
        let (mut c, mut s) = setup(false);
        type_str(&mut c, &mut s, ":an");
        assert_eq!(s.visible.len(), 1);

        let backspace = key(KeyCode::Backspace);
        c.handle_key(&backspace, &mut s);
        c.handle_key(&backspace, &mut s);
        assert!(s.status.is_some());

        s.commands.clear();
        assert_eq!(c.handle_key(&backspace, &mut s), KeyDisposition::Consumed);
        assert_eq!(s.visible, vec!["Apple", "Avocado", "Banana"]);
        assert_eq!(s.status, None);
        assert!(s.commands.contains(&Command::Hide));
        assert_eq!(c.engine().key_sequence(), "");
        // ":a" and ":" re-selected the first item on the way back.
        assert_eq!(c.selection(), Some(&"Apple"));
        assert_eq!(s.selected, Some(0));
    }

    #[test]
    fn test_search_expands_before_applying_results() {
        let (mut c, mut s) = setup(false);
        s.commands.clear();
        type_str(&mut c, &mut s, ":");
        assert_eq!(s.commands.first(), Some(&Command::Expand(true)));
        assert!(matches!(s.commands.get(1), Some(Command::Items(_))));
    }

    #[test]
    fn test_reset_key_is_consumed_and_collapses() {
        let (mut c, mut s) = setup(false);
        type_str(&mut c, &mut s, ":an");
        assert_eq!(c.handle_key(&key(KeyCode::Delete), &mut s), KeyDisposition::Consumed);
        assert!(!s.expanded);
        assert_eq!(s.status, None);
        assert_eq!(s.visible.len(), 3);
        assert_eq!(c.engine().key_sequence(), "");
    }

    #[test]
    fn test_other_keys_pass_through() {
        let (mut c, mut s) = setup(false);
        for code in [KeyCode::Up, KeyCode::Down, KeyCode::Enter, KeyCode::F(4), KeyCode::Char('/')] {
            assert_eq!(c.handle_key(&key(code), &mut s), KeyDisposition::PassThrough);
        }
        let chord = KeyMsg {
            key: KeyCode::Char('a'),
            modifiers: KeyModifiers::CONTROL,
        };
        assert_eq!(c.handle_key(&chord, &mut s), KeyDisposition::PassThrough);
        assert_eq!(c.engine().key_sequence(), "");
    }

    #[test]
    fn test_backspace_on_empty_sequence_is_a_no_op() {
        let (mut c, mut s) = setup(false);
        s.commands.clear();
        assert!(c.handle_key(&key(KeyCode::Backspace), &mut s).is_consumed());
        assert!(s.commands.is_empty());
    }

    #[test]
    fn test_focus_lost_resets_everything() {
        let (mut c, mut s) = setup(false);
        type_str(&mut c, &mut s, "::B.*");
        assert_eq!(s.visible, vec!["Banana"]);
        c.focus_lost(&mut s);
        assert_eq!(c.engine().key_sequence(), "");
        assert_eq!(s.visible.len(), 3);
        assert!(!s.expanded);
        assert_eq!(s.status, None);
    }

    #[test]
    fn test_listeners_receive_items() {
        let (mut c, mut s) = setup(true);
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let id = c.on_selection_changed(move |item| {
            sink.lock().unwrap().push(item.map(|i| i.to_string()));
        });

        type_str(&mut c, &mut s, ":ban");
        assert!(c.set_selection(Some(&"Banana"), &mut s));
        assert!(c.set_selection(None, &mut s));

        // ":" matches everything, so the first item is selected before "b"
        // narrows the list; every later filter keystroke re-selects row 0.
        let expected: Vec<Option<String>> = vec![
            Some("Apple".into()),
            Some("Banana".into()),
            Some("Banana".into()),
            Some("Banana".into()),
            Some("Banana".into()),
            None,
        ];
        assert_eq!(*seen.lock().unwrap(), expected);

        assert!(c.remove_listener(id));
        assert!(!c.remove_listener(id));
        let count = seen.lock().unwrap().len();
        c.select_visible(0, &mut s);
        assert_eq!(seen.lock().unwrap().len(), count);
    }

    #[test]
    fn test_prefix_without_match_keeps_earlier_selection() {
        let (mut c, mut s) = setup(false);
        type_str(&mut c, &mut s, "av");
        assert_eq!(c.selection(), Some(&"Avocado"));
        assert_eq!(s.selected, Some(1));

        let commands = s.commands.len();
        type_str(&mut c, &mut s, "x");
        assert_eq!(c.engine().key_sequence(), "avx");
        assert_eq!(c.selection(), Some(&"Avocado"));
        assert_eq!(s.selected, Some(1));
        assert!(!s.commands[commands..]
            .iter()
            .any(|cmd| matches!(cmd, Command::Select(Some(i)) if *i != 1)));
        assert!(s.status.as_deref().unwrap().contains("no match"));
        assert!(c.take_selection_change().is_some());
        type_str(&mut c, &mut s, "y");
        assert!(c.take_selection_change().is_none());
    }

    #[test]
    fn test_clear_binding_follows_config() {
        let (required, _) = setup(false);
        assert!(!required.keymap().clear_selection.enabled());
        assert!(!crate::key::KeyMap::short_help(required.keymap())
            .iter()
            .any(|b| b.help().desc == "clear selection"));
        let (optional, _) = setup(true);
        assert!(optional.keymap().clear_selection.enabled());

        let custom = InputController::<&str>::new(ComboConfig::new(false))
            .with_keymap(ComboKeyMap::default());
        assert!(!custom.keymap().clear_selection.enabled());
    }

    #[test]
    fn test_set_selection_requires_visible_item() {
        let (mut c, mut s) = setup(false);
        type_str(&mut c, &mut s, ":an");
        assert!(!c.set_selection(Some(&"Apple"), &mut s));
        assert_eq!(c.selection(), Some(&"Banana"));
    }

    #[test]
    fn test_clear_selection_refused_when_required() {
        let (mut c, mut s) = setup(false);
        assert!(!c.set_selection(None, &mut s));
        assert_eq!(c.selection(), Some(&"Apple"));
    }

    #[test]
    fn test_stale_index_is_dropped() {
        let (mut c, mut s) = setup(false);
        type_str(&mut c, &mut s, ":an");
        c.take_selection_change();
        assert!(!c.select_visible(1, &mut s));
        assert_eq!(c.selection(), Some(&"Banana"));
        assert_eq!(c.take_selection_change(), None);
    }

    #[test]
    fn test_select_relative_clamps() {
        let (mut c, mut s) = setup(false);
        assert!(c.select_relative(1, &mut s));
        assert_eq!(c.selection(), Some(&"Avocado"));
        assert!(c.select_relative(5, &mut s));
        assert_eq!(c.selection(), Some(&"Banana"));
        assert!(!c.select_relative(1, &mut s));
        assert!(c.select_relative(-10, &mut s));
        assert_eq!(c.selection(), Some(&"Apple"));
    }

    #[test]
    fn test_set_input_round_trip() {
        let (mut c, mut s) = setup(false);
        type_str(&mut c, &mut s, ":an");
        c.set_input(vec!["Cherry", "Apple"], &mut s);
        c.reset(&mut s);
        assert_eq!(s.visible, vec!["Apple", "Cherry"]);
        assert_eq!(c.selection(), Some(&"Apple"));
        assert_eq!(s.selected, Some(0));

        let (mut c, mut s) = setup(true);
        c.set_input(vec!["Cherry", "Apple"], &mut s);
        c.reset(&mut s);
        assert_eq!(c.selection(), None);
        assert_eq!(s.selected, None);
    }

    #[test]
    fn test_set_input_with_closure_labels() {
        let mut s = Recorder::default();
        let mut c = InputController::new(ComboConfig::new(false));
        c.set_input_with(vec![3u32, 12, 7], |n| format!("#{n:02}"), &mut s);
        assert_eq!(s.visible, vec!["#03", "#07", "#12"]);
        assert_eq!(c.selection(), Some(&3));
        assert_eq!(c.selected_label(), Some("#03"));
    }
}
