//! The display side of a combo.
//!
//! The controller never renders anything itself. It issues commands against a
//! [`Surface`], which may be a terminal view, a test recorder, or a bridge to
//! some other toolkit. [`Dropdown`] is the surface the bundled component
//! renders from.

use super::types::Entry;

/// Commands the controller issues to whatever displays the combo.
pub trait Surface<I> {
    /// Replaces the items shown in the list.
    fn set_visible_items(&mut self, items: Vec<Entry<I>>);

    /// Highlights the item at `index` of the visible items, or nothing.
    fn set_selected_index(&mut self, index: Option<usize>);

    /// Opens or closes the list.
    fn set_list_expanded(&mut self, expanded: bool);

    /// Shows live search feedback.
    fn show_status(&mut self, text: &str);

    /// Hides the search feedback.
    fn hide_status(&mut self);
}

/// Display state of a terminal dropdown.
#[derive(Debug, Clone)]
pub struct Dropdown<I> {
    items: Vec<Entry<I>>,
    selected: Option<usize>,
    expanded: bool,
    status: Option<String>,
}

impl<I> Default for Dropdown<I> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            expanded: false,
            status: None,
        }
    }
}

impl<I> Dropdown<I> {
    /// Creates an empty, collapsed dropdown.
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible items.
    pub fn items(&self) -> &[Entry<I>] {
        &self.items
    }

    /// Index of the highlighted item.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The highlighted entry.
    pub fn selected_entry(&self) -> Option<&Entry<I>> {
        self.selected.and_then(|i| self.items.get(i))
    }

    /// Whether the list is open.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// The status text, if shown.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

impl<I> Surface<I> for Dropdown<I> {
    fn set_visible_items(&mut self, items: Vec<Entry<I>>) {
        self.items = items;
        if self.selected.is_some_and(|i| i >= self.items.len()) {
            self.selected = None;
        }
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.items.len());
    }

    fn set_list_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    fn show_status(&mut self, text: &str) {
        self.status = Some(text.to_string());
    }

    fn hide_status(&mut self) {
        self.status = None;
    }
}
