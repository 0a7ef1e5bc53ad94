//! The combo component: a [`InputController`] plus the [`Dropdown`] it
//! renders, wired into the bubbletea-rs runtime.

use super::controller::{InputController, ListenerId};
use super::keys::ComboKeyMap;
use super::style::{ComboStyles, ARROW, ELLIPSIS, POINTER};
use super::surface::{Dropdown, Surface};
use super::types::{ComboConfig, Entry, Item, SearchMode};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Sent through the runtime whenever the selection of a combo changes.
///
/// `id` tells combos apart when an application shows more than one.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChangedMsg<I> {
    /// Id of the combo that changed, see [`Model::id`].
    pub id: i64,
    /// The new selection.
    pub item: Option<I>,
}

/// A searchable dropdown.
///
/// Typing searches the items (see the crate docs for the syntax), arrow keys
/// move the selection, `alt+↓`/`f4` opens the list, and `del` resets the
/// search. Keys are only handled while the combo is focused.
///
/// # Examples
///
/// ```
/// use bubbletea_combo::combo::{ComboConfig, Model};
/// use bubbletea_combo::Component;
/// use bubbletea_rs::{KeyMsg, Model as BubbleTeaModel};
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let mut combo = Model::with_items(ComboConfig::new(false), vec!["Apple", "Banana", "Avocado"]);
/// combo.focus();
///
/// for c in ":an".chars() {
///     let _ = combo.update(Box::new(KeyMsg { key: KeyCode::Char(c), modifiers: KeyModifiers::NONE }));
/// }
/// assert_eq!(combo.selection(), Some(&"Banana"));
/// assert_eq!(combo.visible_items().len(), 1);
/// ```
pub struct Model<I: Clone> {
    id: i64,
    controller: InputController<I>,
    dropdown: Dropdown<I>,
    /// Styles used by [`BubbleTeaModel::view`].
    pub styles: ComboStyles,
    /// Shown while nothing is selected.
    pub placeholder: String,
    width: usize,
    max_visible: usize,
    focused: bool,
}

impl<I: Clone + Send + 'static> Model<I> {
    /// Creates an empty, blurred combo.
    pub fn new(config: ComboConfig) -> Self {
        Self {
            id: next_id(),
            controller: InputController::new(config),
            dropdown: Dropdown::new(),
            styles: ComboStyles::default(),
            placeholder: "Select…".to_string(),
            width: 0,
            max_visible: 8,
            focused: false,
        }
    }

    /// Creates a combo holding `items`.
    pub fn with_items(config: ComboConfig, items: Vec<I>) -> Self
    where
        I: Item,
    {
        let mut model = Self::new(config);
        model.controller.set_input(items, &mut model.dropdown);
        // Nobody is listening for messages yet.
        model.controller.take_selection_change();
        model
    }

    /// Unique id of this combo.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Replaces the items. See [`InputController::set_input`].
    ///
    /// Returns a command carrying [`SelectionChangedMsg`] when the selection
    /// changed, which it does whenever the old or the new list selects
    /// something.
    pub fn set_input(&mut self, items: Vec<I>) -> Option<Cmd>
    where
        I: Item,
    {
        self.controller.set_input(items, &mut self.dropdown);
        self.selection_cmd()
    }

    /// Replaces the items, labelling them with `label_of`.
    pub fn set_input_with<F>(&mut self, items: Vec<I>, label_of: F) -> Option<Cmd>
    where
        F: Fn(&I) -> String,
    {
        self.controller
            .set_input_with(items, label_of, &mut self.dropdown);
        self.selection_cmd()
    }

    /// The selected item.
    pub fn selection(&self) -> Option<&I> {
        self.controller.selection()
    }

    /// Selects `item` or, for `None`, clears the selection when allowed.
    ///
    /// Listeners are called right away. The returned command delivers the
    /// same change as a [`SelectionChangedMsg`]; it is `None` when the
    /// selection was not applied.
    pub fn set_selection(&mut self, item: Option<&I>) -> Option<Cmd>
    where
        I: PartialEq,
    {
        self.controller.set_selection(item, &mut self.dropdown);
        self.selection_cmd()
    }

    /// Clears the selection when the combo allows an empty selection.
    pub fn clear_selection(&mut self) -> Option<Cmd> {
        self.controller.clear_selection(&mut self.dropdown);
        self.selection_cmd()
    }

    /// Registers a selection-changed callback.
    pub fn on_selection_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(Option<&I>) + Send + 'static,
    {
        self.controller.on_selection_changed(listener)
    }

    /// Unregisters a selection-changed callback.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.controller.remove_listener(id)
    }

    /// The key sequence typed since the last reset.
    pub fn key_sequence(&self) -> &str {
        self.controller.engine().key_sequence()
    }

    /// The mode the key sequence is interpreted in.
    pub fn search_mode(&self) -> SearchMode {
        self.controller.engine().mode()
    }

    /// The live search feedback, if shown.
    pub fn status(&self) -> Option<&str> {
        self.dropdown.status()
    }

    /// The items currently offered.
    pub fn visible_items(&self) -> &[Entry<I>] {
        self.dropdown.items()
    }

    /// Whether the list is open.
    pub fn is_expanded(&self) -> bool {
        self.dropdown.is_expanded()
    }

    /// Help text describing the search syntax.
    pub fn usage(&self) -> String {
        self.controller.config().usage()
    }

    /// The key bindings.
    pub fn keymap(&self) -> &ComboKeyMap {
        self.controller.keymap()
    }

    /// Mutable access to the key bindings.
    pub fn keymap_mut(&mut self) -> &mut ComboKeyMap {
        self.controller.keymap_mut()
    }

    /// The controller driving this combo.
    pub fn controller(&self) -> &InputController<I> {
        &self.controller
    }

    /// Sets the render width in columns. `0` disables truncation.
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Sets how many rows the open list shows at most.
    pub fn set_max_visible(&mut self, rows: usize) {
        self.max_visible = rows.max(1);
    }

    /// Handles a key press. Returns a command carrying
    /// [`SelectionChangedMsg`] when the selection changed.
    pub fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if !self.focused {
            return None;
        }
        if !self
            .controller
            .handle_key(key, &mut self.dropdown)
            .is_consumed()
        {
            self.handle_dropdown_key(key);
        }
        self.selection_cmd()
    }

    /// Plain dropdown behaviour for keys the search does not use.
    fn handle_dropdown_key(&mut self, key: &KeyMsg) {
        let keys = self.controller.keymap();
        if keys.select_prev.matches(key) {
            self.controller.select_relative(-1, &mut self.dropdown);
        } else if keys.select_next.matches(key) {
            self.controller.select_relative(1, &mut self.dropdown);
        } else if keys.toggle_list.matches(key) {
            let expanded = self.dropdown.is_expanded();
            self.dropdown.set_list_expanded(!expanded);
        } else if keys.close_list.matches(key) {
            self.dropdown.set_list_expanded(false);
        } else if keys.clear_selection.matches(key) {
            self.controller.clear_selection(&mut self.dropdown);
        }
    }

    fn selection_cmd(&mut self) -> Option<Cmd> {
        let item = self.controller.take_selection_change()?;
        let msg = SelectionChangedMsg { id: self.id, item };
        let cmd: Cmd = Box::pin(async move { Some(Box::new(msg) as Msg) });
        Some(cmd)
    }

    fn view_field(&self) -> String {
        let style = if self.focused {
            &self.styles.focused_field
        } else {
            &self.styles.blurred_field
        };
        match self.controller.selected_label() {
            Some(label) => style
                .clone()
                .render(&format!("{ARROW} {}", self.truncate(label, 2))),
            None => format!(
                "{} {}",
                style.clone().render(ARROW),
                self.styles
                    .placeholder
                    .clone()
                    .render(&self.truncate(&self.placeholder, 2))
            ),
        }
    }

    fn view_list(&self) -> String {
        let items = self.dropdown.items();
        if items.is_empty() {
            return self.styles.no_items.clone().render("No items.");
        }

        let rows = self.max_visible.min(items.len());
        let selected = self.dropdown.selected();
        let start = selected
            .map_or(0, |s| (s + 1).saturating_sub(rows))
            .min(items.len() - rows);

        items[start..start + rows]
            .iter()
            .enumerate()
            .map(|(offset, entry)| {
                if Some(start + offset) == selected {
                    let text = format!("{POINTER} {}", self.truncate(&entry.label, 3));
                    self.styles.selected_item.clone().render(&text)
                } else {
                    self.styles
                        .normal_item
                        .clone()
                        .render(&self.truncate(&entry.label, 2))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Cuts `text` so that it fits the width minus `reserved` columns.
    fn truncate(&self, text: &str, reserved: usize) -> String {
        if self.width == 0 {
            return text.to_string();
        }
        let limit = self.width.saturating_sub(reserved);
        if text.width() <= limit {
            return text.to_string();
        }

        let budget = limit.saturating_sub(ELLIPSIS.width());
        let mut out = String::new();
        let mut used = 0;
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                break;
            }
            used += w;
            out.push(c);
        }
        out.push_str(ELLIPSIS);
        out
    }
}

impl<I: Clone + Send + 'static> Component for Model<I> {
    fn focus(&mut self) -> Option<Cmd> {
        self.focused = true;
        None
    }

    /// Losing focus resets the search, closes the list and hides the status.
    fn blur(&mut self) {
        self.focused = false;
        self.controller.focus_lost(&mut self.dropdown);
    }

    fn focused(&self) -> bool {
        self.focused
    }
}

impl<I: Clone + Send + 'static> BubbleTeaModel for Model<I> {
    fn init() -> (Self, Option<Cmd>) {
        (Self::new(ComboConfig::default()), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let key = msg.downcast_ref::<KeyMsg>()?;
        self.handle_key(key)
    }

    /// Renders the field, the status line while searching and, when open,
    /// a window of the list around the selection.
    fn view(&self) -> String {
        let mut sections = vec![self.view_field()];
        if let Some(status) = self.dropdown.status() {
            sections.push(self.styles.status.clone().render(status));
        }
        if self.dropdown.is_expanded() {
            sections.push(self.view_list());
        }
        sections.join("\n")
    }
}

impl<I: Clone + std::fmt::Debug> std::fmt::Debug for Model<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("controller", &self.controller)
            .field("dropdown", &self.dropdown)
            .field("focused", &self.focused)
            .finish()
    }
}
