//! Core state machine for the smilepick emoticon picker.
//!
//! This crate owns everything that is independent of a concrete UI:
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  Product crates (smilepick binary, smilepick-tui)│
//! ├─────────────────────────────────────────────────┤
//! │  smilepick-core (this crate)                    │
//! │  ├─ catalog: category → emoticon-id mapping     │
//! │  ├─ store: durable key/value persistence        │
//! │  ├─ session: the single mutable session value   │
//! │  ├─ selection: pure navigation arithmetic       │
//! │  ├─ target: page contexts + caret insertion     │
//! │  └─ config: static tunables                     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The UI layer feeds semantic intents into [`SessionState`] and reflects
//! the resulting state; it never stores authoritative state of its own.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod selection;
pub mod session;
pub mod store;
pub mod target;

pub use catalog::{Catalog, FAVOURITES};
pub use config::PickerConfig;
pub use error::{PickerError, PickerResult};
pub use selection::Direction;
pub use session::{Section, SessionState};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreExt, keys};
pub use target::{
    FieldKind, InputBuffer, PageContext, TargetResolver, emoticon_code, insert_emoticon,
    resolve_target,
};
