//! Popup keymap: terminal key events to semantic picker actions.
//!
//! The bindings mirror the two-handed layout the picker is built around:
//! the right hand rests on `j`/`k`/`l`/`;` and the left on `s`/`d`/`f`/`a`,
//! so every selection move and confirm is reachable from either home row
//! without looking down. Arrow keys, Tab, Enter, and Escape work as the
//! conventional equivalents.
//!
//! Shift is deliberately not part of binding identity: the router strips it
//! before lookup and interprets it as the keep-open flag on confirmation.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};

// ─── Semantic Actions ───────────────────────────────────────────────────────

/// Semantic action resolved from the popup key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerAction {
    /// Close the popup without inserting.
    Close,
    /// Step the focused section's selection toward the start.
    NavBack,
    /// Step the focused section's selection toward the end.
    NavForward,
    /// Toggle focus between the category grid and the recent strip.
    SwitchSection,
    /// Insert the selected emoticon.
    Confirm,
    /// Activate the previous category.
    CategoryBack,
    /// Activate the next category.
    CategoryForward,
    /// Reset all usage statistics.
    ClearUsage,
}

// ─── Keymap ─────────────────────────────────────────────────────────────────

/// Key bindings active only while the popup is open.
pub struct Keymap {
    bindings: HashMap<(KeyCode, KeyModifiers), PickerAction>,
}

impl Keymap {
    /// The popup's default bindings.
    #[must_use]
    pub fn popup_bindings() -> Self {
        let mut bindings = HashMap::new();

        // Close
        bindings.insert((KeyCode::Esc, KeyModifiers::NONE), PickerAction::Close);
        bindings.insert((KeyCode::Char('q'), KeyModifiers::NONE), PickerAction::Close);
        // Paste must reach the underlying field, so it closes first.
        bindings.insert((KeyCode::Char('v'), KeyModifiers::CONTROL), PickerAction::Close);

        // Selection within the focused section
        bindings.insert((KeyCode::Left, KeyModifiers::NONE), PickerAction::NavBack);
        bindings.insert((KeyCode::Right, KeyModifiers::NONE), PickerAction::NavForward);
        bindings.insert((KeyCode::Char('j'), KeyModifiers::NONE), PickerAction::NavBack);
        bindings.insert((KeyCode::Char('k'), KeyModifiers::NONE), PickerAction::NavForward);
        bindings.insert((KeyCode::Char('s'), KeyModifiers::NONE), PickerAction::NavBack);
        bindings.insert((KeyCode::Char('f'), KeyModifiers::NONE), PickerAction::NavForward);

        // Section toggle
        bindings.insert(
            (KeyCode::Char('d'), KeyModifiers::NONE),
            PickerAction::SwitchSection,
        );

        // Confirm
        bindings.insert((KeyCode::Enter, KeyModifiers::NONE), PickerAction::Confirm);
        bindings.insert((KeyCode::Char(';'), KeyModifiers::NONE), PickerAction::Confirm);
        bindings.insert((KeyCode::Char('a'), KeyModifiers::NONE), PickerAction::Confirm);

        // Category stepping (clamped, not wrapped)
        bindings.insert(
            (KeyCode::Char('h'), KeyModifiers::NONE),
            PickerAction::CategoryBack,
        );
        bindings.insert(
            (KeyCode::Char('w'), KeyModifiers::NONE),
            PickerAction::CategoryBack,
        );
        bindings.insert((KeyCode::BackTab, KeyModifiers::NONE), PickerAction::CategoryBack);
        bindings.insert(
            (KeyCode::Char('l'), KeyModifiers::NONE),
            PickerAction::CategoryForward,
        );
        bindings.insert(
            (KeyCode::Char('r'), KeyModifiers::NONE),
            PickerAction::CategoryForward,
        );
        bindings.insert((KeyCode::Tab, KeyModifiers::NONE), PickerAction::CategoryForward);

        // Usage statistics reset
        bindings.insert(
            (KeyCode::Char('u'), KeyModifiers::CONTROL),
            PickerAction::ClearUsage,
        );

        Self { bindings }
    }

    /// Resolve a key event to an action.
    ///
    /// Shift is stripped before lookup (shift only modifies what an action
    /// does, never which action fires), which also makes `BackTab` resolve
    /// regardless of whether the terminal reports its shift modifier.
    #[must_use]
    pub fn resolve(&self, key: KeyCode, modifiers: KeyModifiers) -> Option<PickerAction> {
        let modifiers = modifiers.difference(KeyModifiers::SHIFT);
        self.bindings.get(&(key, modifiers)).copied()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::popup_bindings()
    }
}
