//! Durable key/value persistence for picker state.
//!
//! The picker persists five small JSON values (active category, per-category
//! last-used ids, the recency list, favorites, and the usage-count table).
//! [`KeyValueStore`] is the seam: production uses [`JsonFileStore`] (one JSON
//! object file in the profile directory, write-through), tests use
//! [`MemoryStore`].
//!
//! Reads are infallible by design: a missing key, an unreadable file, or a
//! malformed value all decode to the type's default. Corrupt state costs the
//! user their rankings, never the picker.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Storage key constants shared by every component that touches the store.
pub mod keys {
    /// Currently active category name (string).
    pub const ACTIVE_CATEGORY: &str = "activeCategory";
    /// Map of category name → last chosen emoticon id.
    pub const LAST_USED_EMOTICONS: &str = "lastUsedEmoticons";
    /// Cross-category recency list, most recent first (list of ids).
    pub const RECENT_EMOTICONS: &str = "recentEmoticons";
    /// Favorites list (list of ids).
    pub const FAVORITE_EMOTICONS: &str = "favoriteEmoticons";
    /// Usage counts: category name → emoticon id → count.
    pub const EMOTICON_USAGE_DATA: &str = "emoticonUsageData";
}

// ─── Store Trait ────────────────────────────────────────────────────────────

/// Typed key/value access to durable per-profile storage.
///
/// Values are JSON text. Implementations must treat `set` and `remove` as
/// best-effort: a failed flush is logged, not propagated, so that ranking
/// bookkeeping can never break an insertion.
pub trait KeyValueStore {
    /// Read the raw JSON text stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store raw JSON text under `key`.
    fn set(&mut self, key: &str, value: String);

    /// Delete `key` if present.
    fn remove(&mut self, key: &str);
}

/// JSON-typed helpers layered over any [`KeyValueStore`].
pub trait StoreExt: KeyValueStore {
    /// Decode the value under `key`, falling back to `T::default()` when the
    /// key is missing or the stored text does not parse.
    fn get_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get(key) {
            None => T::default(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(key, %err, "malformed stored value, using default");
                T::default()
            }),
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    fn set_json<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, raw),
            Err(err) => warn!(key, %err, "failed to encode value, skipping flush"),
        }
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}

// ─── Memory Store ───────────────────────────────────────────────────────────

/// Ephemeral store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

// ─── JSON File Store ────────────────────────────────────────────────────────

/// Write-through store backed by a single JSON object file.
///
/// The whole map is rewritten on every mutation; the values are tiny and the
/// mutation rate is bounded by user input, so there is no batching layer.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// An unreadable or malformed file starts the store empty; the previous
    /// contents are overwritten on the next flush.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self { path, entries }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> BTreeMap<String, Value> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no store file yet, starting empty");
                return BTreeMap::new();
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "store unreadable, starting empty");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %path.display(), %err, "store corrupt, starting empty");
                BTreeMap::new()
            }
        }
    }

    fn flush(&self) {
        let raw = match serde_json::to_string_pretty(&self.entries) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "failed to encode store, skipping flush");
                return;
            }
        };
        if let Some(parent) = self.path.parent()
            && let Err(err) = fs::create_dir_all(parent)
        {
            warn!(path = %self.path.display(), %err, "cannot create store directory");
            return;
        }
        if let Err(err) = fs::write(&self.path, raw) {
            warn!(path = %self.path.display(), %err, "store flush failed");
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .and_then(|value| serde_json::to_string(value).ok())
    }

    fn set(&mut self, key: &str, value: String) {
        // `value` is JSON text produced by `set_json`; anything else is kept
        // verbatim as a JSON string so nothing is silently dropped.
        let parsed = serde_json::from_str(&value).unwrap_or(Value::String(value));
        self.entries.insert(key.to_owned(), parsed);
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }
}
