//! Type-safe key bindings.
//!
//! A [`Binding`] groups one or more key presses (a key code plus modifiers)
//! under a single action together with the short help text shown to users.
//! Components expose their bindings through the [`KeyMap`] trait.
//!
//! ```rust
//! use bubbletea_combo::key::{Binding, KeyPress};
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let clear = Binding::new(vec![KeyCode::Delete]).with_help("del", "reset search");
//! let expand = Binding::new(vec![KeyPress::new(KeyCode::Down, KeyModifiers::ALT)])
//!     .with_help("alt+↓", "open list");
//!
//! let msg = KeyMsg { key: KeyCode::Delete, modifiers: KeyModifiers::NONE };
//! assert!(clear.matches(&msg));
//! assert!(!expand.matches(&msg));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: a key code and the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key code.
    pub code: KeyCode,
    /// Modifiers that must be held. `NONE` matches only unmodified presses,
    /// except that `SHIFT` is ignored for character keys.
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    /// Creates a key press from a code and modifiers.
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Returns true if `msg` is this key press.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        if self.code != msg.key {
            return false;
        }
        let mut held = msg.modifiers;
        if matches!(msg.key, KeyCode::Char(_)) {
            held.remove(KeyModifiers::SHIFT);
        }
        held == self.modifiers
    }
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self::new(code, modifiers)
    }
}

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Short key label, e.g. `"del"`.
    pub key: String,
    /// What the binding does.
    pub desc: String,
}

/// A named action bound to one or more key presses.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding from anything convertible to [`KeyPress`].
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Returns the bound key presses.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Returns the help text.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Enables or disables the binding. Disabled bindings never match.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Returns true if the binding is enabled and has at least one key.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Returns true if `msg` triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(msg))
    }
}

/// Implemented by components that publish their key bindings for help views.
pub trait KeyMap {
    /// Bindings shown in compact, single-line help.
    fn short_help(&self) -> Vec<&Binding>;

    /// Bindings shown in expanded help, grouped into columns.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}
