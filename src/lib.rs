#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-combo/")]

//! # bubbletea-combo
//!
//! A searchable dropdown ("combo") component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications. Besides the usual arrow-key navigation, users pick an item by typing:
//!
//! - `av` selects the first item whose label starts with `av`
//! - `:an` narrows the list to labels containing `an` (`*` is a wildcard)
//! - `::A.*o` narrows the list to labels fully matching the regular expression `A.*o`
//!
//! `del` resets the search. Filters that would leave nothing to pick are not applied.
//!
//! ## Overview
//!
//! The search logic lives in [`combo::FilterEngine`], a plain state machine with no
//! terminal dependency. [`combo::InputController`] feeds key messages into it and
//! applies the outcome to a [`combo::Surface`]. [`combo::Model`] bundles both with a
//! rendered dropdown and implements the bubbletea-rs `Model` trait, following the
//! Elm Architecture with `init()`, `update()` and `view()`.
//!
//! ## Usage
//!
//! ```rust
//! use bubbletea_combo::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//!
//! struct App {
//!     fruit: Combo<&'static str>,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut fruit = Combo::with_items(
//!             ComboConfig::new(false),
//!             vec!["Cherry", "Apple", "Banana"],
//!         );
//!         let cmd = fruit.focus();
//!         (Self { fruit }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(changed) = msg.downcast_ref::<SelectionChangedMsg<&'static str>>() {
//!             let _ = changed.item;
//!             return None;
//!         }
//!         self.fruit.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("Fruit: {}", self.fruit.view())
//!     }
//! }
//! ```
//!
//! ## Key Bindings
//!
//! Bindings come from the `key` module and can be replaced through
//! [`combo::Model::keymap_mut`]:
//!
//! ```rust
//! use bubbletea_combo::combo::{ComboConfig, Model};
//! use bubbletea_combo::key::Binding;
//! use crossterm::event::KeyCode;
//!
//! let mut combo: Model<String> = Model::new(ComboConfig::default());
//! combo.keymap_mut().reset_search = Binding::new(vec![KeyCode::Esc]).with_help("esc", "reset search");
//! ```

pub mod combo;
pub mod key;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// Components that implement this trait can take part in focus cycling
/// between several widgets of an application.
///
/// ## Focus States
///
/// - **Focused**: The component receives keyboard input and shows its active style
/// - **Blurred**: The component ignores keyboard input and shows its inactive style
///
/// ## Examples
///
/// ```rust
/// use bubbletea_combo::prelude::*;
///
/// let mut combo = Combo::with_items(ComboConfig::default(), vec!["Apple", "Banana"]);
/// assert!(!combo.focused());
///
/// combo.focus();
/// assert!(combo.focused());
///
/// combo.blur();
/// assert!(!combo.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    ///
    /// # Returns
    ///
    /// An optional command to be executed by the bubbletea runtime.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred (unfocused) state.
    ///
    /// Implementations should drop transient input state here, the combo for
    /// instance resets its search.
    fn blur(&mut self);

    /// Returns `true` if the component currently receives keyboard input.
    fn focused(&self) -> bool;
}

pub use combo::Model as Combo;
pub use key::{Binding, Help as KeyHelp, KeyMap, KeyPress};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_combo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::combo::{
        ComboConfig, ComboKeyMap, ComboStyles, Dropdown, FilterEngine, InputController, Item,
        SearchMode, SelectionChangedMsg, Surface,
    };
    pub use crate::key::{Binding, KeyMap, KeyPress};
    pub use crate::{Combo, Component};
}
