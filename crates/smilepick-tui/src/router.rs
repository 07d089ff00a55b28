//! Input routing: raw terminal events in, semantic commands out.
//!
//! The router is a state machine over three pieces of input state:
//!
//! - the **repair chord** (double press of `q`), active only while the
//!   popup bindings are *not* acquired, so an open popup never fights the
//!   chord for the key;
//! - the **popup keymap**, active only while acquired, so a closed popup
//!   leaves every key free for ordinary typing;
//! - the **long-press tracker** for emoticon cells, which arbitrates
//!   click-versus-hold and suppresses the click after a completed hold.
//!
//! Acquisition is symmetric with the popup lifecycle: the popup controller
//! acquires on open and releases on every close path. The router itself
//! never touches session state; it emits [`Command`] values for the
//! application to apply.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyModifiers};
use smilepick_core::{Direction, FAVOURITES, PickerConfig, Section};
use tracing::trace;

use crate::chord::DoublePressTracker;
use crate::input::{Keymap, PickerAction};
use crate::pointer::{LongPressTracker, PressOutcome};

/// Key whose double press triggers the repeat-fix toggle.
const CHORD_KEY: KeyCode = KeyCode::Char('q');

// ─── Events and Commands ────────────────────────────────────────────────────

/// What a pointer event landed on, as resolved by the renderer's hit map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// An emoticon cell, in the grid or the recent strip.
    Emoticon {
        /// Emoticon id.
        id: String,
        /// Which section the cell belongs to.
        section: Section,
    },
    /// A category button.
    Category {
        /// Category name.
        name: String,
    },
    /// A recognized text field on the page.
    TextInput {
        /// The field's selector.
        selector: String,
    },
    /// Popup chrome with no interactive element under it.
    PopupBody,
    /// Anywhere outside the popup.
    Outside,
}

/// A raw input event, normalized by the terminal loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// Key press.
    Key {
        /// Key code.
        code: KeyCode,
        /// Modifier state.
        modifiers: KeyModifiers,
    },
    /// Pointer button pressed over `target`.
    PointerDown {
        /// Hit-map resolution of the press position.
        target: PointerTarget,
        /// Modifier state.
        modifiers: KeyModifiers,
    },
    /// Pointer button released over `target`.
    PointerUp {
        /// Hit-map resolution of the release position.
        target: PointerTarget,
        /// Modifier state.
        modifiers: KeyModifiers,
    },
    /// Pointer left the element it pressed on.
    PointerLeave,
    /// The gesture was cancelled by the platform.
    PointerCancel,
    /// A recognized text field gained focus.
    FocusInput {
        /// The field's selector.
        selector: String,
    },
    /// Periodic tick; drives hold-expiry delivery.
    Tick,
}

/// A semantic command for the application to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle the popup open or closed.
    TogglePopup,
    /// Close the popup.
    ClosePopup,
    /// Strip the duplicated trailing character from the focused field, then
    /// toggle the popup.
    RepeatFix,
    /// Step the focused section's selection.
    Navigate(Direction),
    /// Toggle focus between grid and recent strip.
    SwitchSection,
    /// Step to the adjacent category.
    SwitchCategory(Direction),
    /// Insert the keyboard-selected emoticon.
    Confirm {
        /// Keep the popup open after inserting.
        keep_open: bool,
    },
    /// Insert a specific emoticon (pointer click).
    Insert {
        /// Emoticon id.
        id: String,
        /// Keep the popup open after inserting.
        keep_open: bool,
    },
    /// Add or remove a favorite.
    ToggleFavorite {
        /// Emoticon id.
        id: String,
    },
    /// Drop an entry from the recency list.
    RemoveRecent {
        /// Emoticon id.
        id: String,
    },
    /// Make a category the active one.
    ActivateCategory {
        /// Category name.
        name: String,
    },
    /// Empty the favorites list and leave the Favourites view.
    ClearFavorites,
    /// Reset all usage statistics.
    ClearUsage,
    /// Record a text field as the insertion target.
    FocusInput {
        /// The field's selector.
        selector: String,
    },
}

// ─── Router ─────────────────────────────────────────────────────────────────

/// Stateful translator from [`RawEvent`] to [`Command`].
pub struct InputRouter {
    keymap: Keymap,
    bindings_active: bool,
    chord: DoublePressTracker<KeyCode>,
    // Double click on popup chrome closes; one tracker, any-press key.
    click_chord: DoublePressTracker<()>,
    presses: LongPressTracker<(String, Section)>,
}

impl InputRouter {
    /// Build a router with the config's timing thresholds.
    #[must_use]
    pub fn new(config: &PickerConfig) -> Self {
        Self {
            keymap: Keymap::popup_bindings(),
            bindings_active: false,
            chord: DoublePressTracker::new(CHORD_KEY, config.double_press_threshold()),
            click_chord: DoublePressTracker::new((), config.double_press_threshold()),
            presses: LongPressTracker::new(config.long_press_delay()),
        }
    }

    /// Activate the popup keymap. Disarms the repair chord so the press
    /// that opened the popup cannot complete a chord later.
    pub fn acquire_bindings(&mut self) {
        self.bindings_active = true;
        self.chord.reset();
        self.click_chord.reset();
    }

    /// Deactivate the popup keymap and abandon any in-flight press.
    pub fn release_bindings(&mut self) {
        self.bindings_active = false;
        self.presses.cancel();
        self.click_chord.reset();
    }

    /// Whether the popup keymap is currently active.
    #[must_use]
    pub const fn bindings_active(&self) -> bool {
        self.bindings_active
    }

    /// Translate one event into zero or more commands.
    pub fn route(&mut self, event: RawEvent, now: Instant) -> Vec<Command> {
        match event {
            RawEvent::Key { code, modifiers } => self.route_key(code, modifiers, now),
            RawEvent::PointerDown { target, .. } => {
                if let PointerTarget::Emoticon { id, section } = target {
                    self.presses.press((id, section), now);
                }
                Vec::new()
            }
            RawEvent::PointerUp { target, modifiers } => {
                self.route_pointer_up(target, modifiers, now)
            }
            RawEvent::PointerLeave | RawEvent::PointerCancel => {
                self.presses.cancel();
                Vec::new()
            }
            RawEvent::FocusInput { selector } => {
                vec![Command::FocusInput { selector }]
            }
            RawEvent::Tick => self
                .presses
                .fire_due(now)
                .map(long_press_command)
                .into_iter()
                .collect(),
        }
    }

    fn route_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) -> Vec<Command> {
        if self.bindings_active {
            let Some(action) = self.keymap.resolve(code, modifiers) else {
                return Vec::new();
            };
            trace!(?action, "popup key");
            let command = match action {
                PickerAction::Close => Command::ClosePopup,
                PickerAction::NavBack => Command::Navigate(Direction::Back),
                PickerAction::NavForward => Command::Navigate(Direction::Forward),
                PickerAction::SwitchSection => Command::SwitchSection,
                PickerAction::Confirm => Command::Confirm {
                    keep_open: modifiers.contains(KeyModifiers::SHIFT),
                },
                PickerAction::CategoryBack => Command::SwitchCategory(Direction::Back),
                PickerAction::CategoryForward => Command::SwitchCategory(Direction::Forward),
                PickerAction::ClearUsage => Command::ClearUsage,
            };
            return vec![command];
        }

        // Popup closed: the only key the picker owns is the repair chord.
        if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            self.chord.reset();
            return Vec::new();
        }
        if self.chord.observe(code, now) {
            trace!("repeat-fix chord fired");
            return vec![Command::RepeatFix];
        }
        Vec::new()
    }

    fn route_pointer_up(
        &mut self,
        target: PointerTarget,
        modifiers: KeyModifiers,
        now: Instant,
    ) -> Vec<Command> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let shift = modifiers.contains(KeyModifiers::SHIFT);

        match self.presses.release(now) {
            // Ctrl+click is the pointer shortcut for the hold action.
            PressOutcome::Click(pressed) if ctrl => return vec![long_press_command(pressed)],
            PressOutcome::Click((id, _)) => {
                return vec![Command::Insert {
                    id,
                    keep_open: shift,
                }];
            }
            PressOutcome::LongPress(pressed) => return vec![long_press_command(pressed)],
            PressOutcome::Suppressed => return Vec::new(),
            PressOutcome::Idle => {}
        }

        match target {
            // A release with no tracked press (the down event was missed)
            // still counts as a click.
            PointerTarget::Emoticon { id, section } if ctrl => {
                vec![long_press_command((id, section))]
            }
            PointerTarget::Emoticon { id, .. } => vec![Command::Insert {
                id,
                keep_open: shift,
            }],
            PointerTarget::Category { name } if ctrl && name == FAVOURITES => {
                vec![Command::ClearFavorites]
            }
            // Only a plain click switches; modified clicks on ordinary
            // category buttons are ignored.
            PointerTarget::Category { name } if !ctrl && !shift => {
                vec![Command::ActivateCategory { name }]
            }
            PointerTarget::Category { .. } => Vec::new(),
            PointerTarget::TextInput { selector } if ctrl => vec![
                Command::FocusInput { selector },
                Command::TogglePopup,
            ],
            PointerTarget::TextInput { selector } => vec![Command::FocusInput { selector }],
            PointerTarget::Outside if self.bindings_active => vec![Command::ClosePopup],
            PointerTarget::PopupBody if self.bindings_active => {
                if self.click_chord.observe((), now) {
                    vec![Command::ClosePopup]
                } else {
                    Vec::new()
                }
            }
            PointerTarget::Outside | PointerTarget::PopupBody => Vec::new(),
        }
    }
}

/// The action a completed hold maps to, by section.
fn long_press_command((id, section): (String, Section)) -> Command {
    match section {
        Section::Category => Command::ToggleFavorite { id },
        Section::Recent => Command::RemoveRecent { id },
    }
}
