//! Styling for the combo component.
//!
//! Like the rest of the component family the defaults use `AdaptiveColor`, so
//! they read well on light and dark terminals. Every field is public and can
//! be replaced.
//!
//! ```rust
//! use bubbletea_combo::combo::ComboStyles;
//! use lipgloss_extras::prelude::*;
//!
//! let mut styles = ComboStyles::default();
//! styles.selected_item = Style::new().foreground(Color::from("#FF5F87")).bold(true);
//! ```

use lipgloss_extras::prelude::*;

/// Marker drawn in front of the closed combo.
pub const ARROW: &str = "▾";

/// Marker drawn in front of the highlighted row.
pub const POINTER: &str = "›";

/// Appended to labels cut to fit the width.
pub const ELLIPSIS: &str = "…";

/// Styles for every part of a rendered combo.
#[derive(Debug, Clone)]
pub struct ComboStyles {
    /// The closed field while focused.
    pub focused_field: Style,
    /// The closed field while blurred.
    pub blurred_field: Style,
    /// Text shown when nothing is selected.
    pub placeholder: Style,
    /// The search feedback line.
    pub status: Style,
    /// The highlighted row of the open list.
    pub selected_item: Style,
    /// Other rows of the open list.
    pub normal_item: Style,
    /// Shown in the open list when there is nothing to pick.
    pub no_items: Style,
}

impl Default for ComboStyles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };

        Self {
            focused_field: Style::new()
                .foreground(AdaptiveColor {
                    Light: "#1a1a1a",
                    Dark: "#dddddd",
                })
                .bold(true),
            blurred_field: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
            placeholder: Style::new().foreground(subdued.clone()),
            status: Style::new()
                .foreground(AdaptiveColor {
                    Light: "#04B575",
                    Dark: "#ECFD65",
                })
                .padding(0, 0, 0, 2),
            selected_item: Style::new()
                .foreground(Color::from("#EE6FF8"))
                .padding(0, 0, 0, 1),
            normal_item: Style::new()
                .foreground(AdaptiveColor {
                    Light: "#1a1a1a",
                    Dark: "#dddddd",
                })
                .padding(0, 0, 0, 2),
            no_items: Style::new().foreground(subdued).padding(0, 0, 0, 2),
        }
    }
}
