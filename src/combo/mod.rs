//! Searchable dropdown ("combo") component.
//!
//! The combo offers a sorted list of items and lets users pick one by typing.
//! What the typed characters mean depends on how the key sequence starts:
//!
//! | Sequence  | Mode        | Effect                                                      |
//! |-----------|-------------|-------------------------------------------------------------|
//! | `av`      | prefix      | selects the first label starting with `av`, ignoring case   |
//! | `:an`     | substring   | shows labels containing `an`, ignoring case, `*` = wildcard |
//! | `::A.*o`  | regex       | shows labels fully matching `A.*o`, case-sensitive          |
//!
//! The escape character (`:` by default) is configurable through
//! [`ComboConfig`]. Filters that match nothing are not applied, and after
//! every filter keystroke the first visible item becomes the selection.
//! `del` resets the search; losing focus does too.
//!
//! ## Architecture
//!
//! - [`FilterEngine`]: the key sequence and search state machine, no I/O
//! - [`InputController`]: turns key messages into engine calls and applies
//!   the results to a [`Surface`]; owns the selection and its listeners
//! - [`Dropdown`]: the surface [`Model`] renders from
//! - [`Model`]: the bubbletea-rs component tying it together
//!
//! Hosts that render the list themselves can skip [`Model`] and drive an
//! [`InputController`] against their own [`Surface`] implementation.
//!
//! ## Diagnostics
//!
//! Key events, search results and rejected selections are reported through
//! `tracing` at trace level under the `bubbletea_combo` target. Nothing is
//! printed unless the application installs a subscriber.

pub mod keys;
pub mod style;

mod controller;
mod engine;
mod model;
mod pattern;
mod surface;
mod types;


pub use controller::{InputController, KeyDisposition, ListenerId, SelectionListener};
pub use engine::FilterEngine;
pub use keys::{is_search_char, ComboKeyMap};
pub use model::{Model, SelectionChangedMsg};
pub use pattern::{LabelPattern, PatternError};
pub use style::ComboStyles;
pub use surface::{Dropdown, Surface};
pub use types::{
    ComboConfig, EngineEvent, Entry, FilterStatus, Item, KeyInput, SearchMode, SearchResult,
    Status,
};
