//! Terminal front end for the smilepick emoticon picker.
//!
//! The crate is layered the same way the interaction works:
//!
//! ```text
//!   raw terminal events
//!          │
//!          ▼
//!   ┌─────────────┐   chord / long-press timing   ┌────────────┐
//!   │ InputRouter │ ────────────────────────────▶ │  Command   │
//!   └─────────────┘                               └────────────┘
//!          │                                            │
//!          │ bindings acquired/released                 ▼
//!          ▼                                     applied to the
//!   ┌─────────────────┐                          core session by
//!   │ PopupController │                          the application
//!   └─────────────────┘
//! ```
//!
//! [`InputRouter`] owns all timing-sensitive input interpretation (the
//! double-press repair chord, long presses, the popup-scoped keymap) and
//! emits plain [`Command`] values. [`PopupController`] owns the popup
//! lifecycle: mount debounce, grid sizing, and stale-render suppression.
//! Rendering is a pure function from core state to a ratatui frame plus a
//! [`HitMap`] for mouse resolution.

pub mod chord;
pub mod input;
pub mod pointer;
pub mod popup;
pub mod render;
pub mod router;

pub use chord::DoublePressTracker;
pub use input::{Keymap, PickerAction};
pub use pointer::{LongPressTracker, PressOutcome};
pub use popup::{GridLayout, ImageProber, MIN_CELL_PX, PopupController, measure_grid};
pub use render::{HitMap, draw_picker};
pub use router::{Command, InputRouter, PointerTarget, RawEvent};
