//! The single mutable session value behind the popup.
//!
//! [`SessionState`] is constructed once at startup, seeded from the
//! persistent store, and lives until process exit. It survives popup
//! open/close cycles; the popup-scoped fields (`focused_section`,
//! `selected_recent`) are re-armed on each mount. Every durable mutation is
//! flushed to the store in the same call — there is no separate save step.
//!
//! State is authoritative here and only here. The UI reflects it; nothing is
//! ever inferred back from the widget tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, FAVOURITES};
use crate::config::PickerConfig;
use crate::store::{KeyValueStore, StoreExt, keys};

/// Which navigable list receives directional input while the popup is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// The usage-sorted emoticon grid of the active category.
    Category,
    /// The cross-category recent-items strip.
    Recent,
}

/// Usage counts: category name → emoticon id → count.
pub type UsageTable = HashMap<String, HashMap<String, u64>>;

/// In-memory session state, seeded from and flushed to a [`KeyValueStore`].
pub struct SessionState {
    catalog: Catalog,
    config: PickerConfig,
    store: Box<dyn KeyValueStore>,

    active_category: String,
    category_history: Vec<String>,
    current_sorted: Vec<String>,
    last_used: HashMap<String, String>,
    recent: Vec<String>,
    favorites: Vec<String>,
    usage: UsageTable,

    focused_section: Section,
    selected_recent: Option<usize>,
    last_focused_input: Option<String>,
    popup_mounted: bool,
    latest_grid_request: u64,
}

impl SessionState {
    /// Seed a session from durable state, repairing anything stale.
    ///
    /// Repairs performed here (never fatal):
    /// - favorites referencing ids absent from every static category are dropped;
    /// - an active category that no longer resolves falls back to the first
    ///   static category (Favourites only counts when non-empty);
    /// - per-category last-used ids that left the catalog are replaced with
    ///   the category's first id;
    /// - the recency list is deduplicated and truncated to the configured cap.
    #[must_use]
    pub fn load(store: Box<dyn KeyValueStore>, catalog: Catalog, config: PickerConfig) -> Self {
        let mut favorites: Vec<String> = store.get_json(keys::FAVORITE_EMOTICONS);
        favorites.retain(|id| catalog.contains(id));

        let stored_active: String = store.get_json(keys::ACTIVE_CATEGORY);
        let active_category = if catalog.is_static_category(&stored_active)
            || (stored_active == FAVOURITES && !favorites.is_empty())
        {
            stored_active
        } else {
            if !stored_active.is_empty() {
                debug!(category = %stored_active, "stored active category no longer resolves");
            }
            catalog.first_category().to_owned()
        };

        let mut last_used: HashMap<String, String> = store.get_json(keys::LAST_USED_EMOTICONS);
        for name in catalog.category_names() {
            let Some(ids) = catalog.emoticons(name) else {
                continue;
            };
            let valid = last_used
                .get(name)
                .is_some_and(|id| ids.contains(&id.as_str()));
            if !valid {
                last_used.insert(name.to_owned(), (*ids.first().unwrap_or(&"")).to_owned());
            }
        }

        let stored_recent: Vec<String> = store.get_json(keys::RECENT_EMOTICONS);
        let mut recent = Vec::with_capacity(stored_recent.len());
        for id in stored_recent {
            if !recent.contains(&id) {
                recent.push(id);
            }
        }
        recent.truncate(config.max_recent);

        let usage: UsageTable = store.get_json(keys::EMOTICON_USAGE_DATA);

        let mut session = Self {
            catalog,
            config,
            store,
            active_category,
            category_history: Vec::new(),
            current_sorted: Vec::new(),
            last_used,
            recent,
            favorites,
            usage,
            focused_section: Section::Category,
            selected_recent: None,
            last_focused_input: None,
            popup_mounted: false,
            latest_grid_request: 0,
        };
        session.current_sorted = session.sorted_emoticons(&session.active_category.clone());
        session.store.set_json(keys::LAST_USED_EMOTICONS, &session.last_used);
        session
    }

    // ─── Read access ────────────────────────────────────────────────────────

    /// The active category name.
    #[must_use]
    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    /// Usage-sorted emoticons of the active category, as computed at its
    /// last activation.
    #[must_use]
    pub fn current_sorted(&self) -> &[String] {
        &self.current_sorted
    }

    /// The recency list, most recent first.
    #[must_use]
    pub fn recent(&self) -> &[String] {
        &self.recent
    }

    /// The favorites list in insertion order.
    #[must_use]
    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Which section receives directional input.
    #[must_use]
    pub const fn focused_section(&self) -> Section {
        self.focused_section
    }

    /// Selection index into the recent strip, if any.
    #[must_use]
    pub const fn selected_recent(&self) -> Option<usize> {
        self.selected_recent
    }

    /// Last chosen emoticon for `category`.
    #[must_use]
    pub fn last_used(&self, category: &str) -> Option<&str> {
        self.last_used.get(category).map(String::as_str)
    }

    /// Whether `id` is currently favorited.
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|fav| fav == id)
    }

    /// Selector of the last focused recognized text input.
    #[must_use]
    pub fn last_focused_input(&self) -> Option<&str> {
        self.last_focused_input.as_deref()
    }

    /// Whether the popup is currently mounted. Single source of truth.
    #[must_use]
    pub const fn popup_mounted(&self) -> bool {
        self.popup_mounted
    }

    /// The picker configuration.
    #[must_use]
    pub const fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// The static catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only view of the backing store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Tear down the session and hand the store back (used by tests that
    /// reload a fresh session from the same durable state).
    #[must_use]
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    /// Member ids of `category`: the favorites list for `Favourites`, the
    /// static list otherwise.
    #[must_use]
    pub fn emoticons_of(&self, category: &str) -> Vec<String> {
        if category == FAVOURITES {
            return self.favorites.clone();
        }
        self.catalog
            .emoticons(category)
            .map(|ids| ids.iter().map(|id| (*id).to_owned()).collect())
            .unwrap_or_default()
    }

    /// Member ids of `category` ordered by descending usage count.
    ///
    /// Unknown usage counts as zero; the sort is stable so ties keep the
    /// catalog's declared order.
    #[must_use]
    pub fn sorted_emoticons(&self, category: &str) -> Vec<String> {
        let counts = self.usage.get(category);
        let count_of =
            |id: &str| counts.and_then(|table| table.get(id)).copied().unwrap_or(0);
        let mut ids = self.emoticons_of(category);
        ids.sort_by_key(|id| std::cmp::Reverse(count_of(id.as_str())));
        ids
    }

    /// Categories reachable by prev/next switching: catalog order, with
    /// `Favourites` excluded while it is empty.
    #[must_use]
    pub fn navigable_categories(&self) -> Vec<String> {
        self.catalog
            .category_names()
            .into_iter()
            .filter(|name| *name != FAVOURITES || !self.favorites.is_empty())
            .map(str::to_owned)
            .collect()
    }

    // ─── Durable mutations ──────────────────────────────────────────────────

    /// Switch the active category.
    ///
    /// Returns `false` without mutating anything when `category` is the
    /// active one already, or is `Favourites` while empty. On success the
    /// previous category is pushed to history (unless it was `Favourites`),
    /// the usage-sorted order is recomputed, and the change is persisted.
    ///
    /// The sorted order is recomputed *only* here: usage recorded while a
    /// category stays on screen does not reorder the visible grid until the
    /// category is activated again.
    pub fn activate_category(&mut self, category: &str) -> bool {
        if category == self.active_category {
            return false;
        }
        if category == FAVOURITES && self.favorites.is_empty() {
            return false;
        }
        if !self.catalog.is_static_category(category) && category != FAVOURITES {
            return false;
        }
        if self.active_category != FAVOURITES {
            self.category_history.push(self.active_category.clone());
        }
        self.active_category = category.to_owned();
        self.current_sorted = self.sorted_emoticons(category);
        self.store
            .set_json(keys::ACTIVE_CATEGORY, &self.active_category);
        true
    }

    /// Record an insertion of `id`: bump its usage count for the active
    /// category, make it the category's last-used id, and push it onto the
    /// recency list. All three stores are flushed.
    pub fn record_usage(&mut self, id: &str) {
        let counts = self.usage.entry(self.active_category.clone()).or_default();
        *counts.entry(id.to_owned()).or_insert(0) += 1;
        self.store.set_json(keys::EMOTICON_USAGE_DATA, &self.usage);
        self.set_last_used(id);
        self.push_recent(id);
    }

    /// Make `id` the last-used emoticon of the active category and persist.
    pub fn set_last_used(&mut self, id: &str) {
        self.last_used
            .insert(self.active_category.clone(), id.to_owned());
        self.store
            .set_json(keys::LAST_USED_EMOTICONS, &self.last_used);
    }

    /// Move `id` to the front of the recency list, deduplicated and capped.
    pub fn push_recent(&mut self, id: &str) {
        self.recent.retain(|existing| existing != id);
        self.recent.insert(0, id.to_owned());
        self.recent.truncate(self.config.max_recent);
        self.clamp_selected_recent();
        self.store.set_json(keys::RECENT_EMOTICONS, &self.recent);
    }

    /// Drop `id` from the recency list (the strip's long-press action).
    pub fn remove_recent(&mut self, id: &str) {
        self.recent.retain(|existing| existing != id);
        self.clamp_selected_recent();
        self.store.set_json(keys::RECENT_EMOTICONS, &self.recent);
    }

    /// Toggle favorite membership of `id`. Returns the new membership.
    ///
    /// Only catalogued ids can be added. When the Favourites view is active
    /// its grid is recomputed immediately, since membership *is* the view.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let now_favorite = if let Some(pos) = self.favorites.iter().position(|fav| fav == id) {
            self.favorites.remove(pos);
            false
        } else if self.catalog.contains(id) {
            self.favorites.push(id.to_owned());
            true
        } else {
            return false;
        };
        self.store
            .set_json(keys::FAVORITE_EMOTICONS, &self.favorites);
        if self.active_category == FAVOURITES {
            self.current_sorted = self.sorted_emoticons(FAVOURITES);
        }
        now_favorite
    }

    /// Clear all favorites and return to the most recent history category,
    /// if there is one.
    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
        self.store.remove(keys::FAVORITE_EMOTICONS);
        if let Some(previous) = self.category_history.pop() {
            self.active_category = previous;
            self.store
                .set_json(keys::ACTIVE_CATEGORY, &self.active_category);
        }
        self.current_sorted = self.sorted_emoticons(&self.active_category.clone());
    }

    /// Wipe the usage-count table (the popup's "clear statistics" button).
    ///
    /// The visible order is untouched until the next category activation.
    pub fn clear_usage(&mut self) {
        self.usage.clear();
        self.store.remove(keys::EMOTICON_USAGE_DATA);
    }

    // ─── Transient mutations ────────────────────────────────────────────────

    /// Record the selector of a focused recognized text input.
    pub fn set_last_focused_input(&mut self, selector: impl Into<String>) {
        self.last_focused_input = Some(selector.into());
    }

    /// Flip the popup-mounted flag. Mounting re-arms the popup-scoped
    /// selection fields so each open starts from the category grid.
    pub fn set_popup_mounted(&mut self, mounted: bool) {
        self.popup_mounted = mounted;
        if mounted {
            self.focused_section = Section::Category;
            self.selected_recent = None;
        }
    }

    /// Stamp and return a new grid-request token. Any previously issued
    /// token becomes stale.
    pub fn begin_grid_request(&mut self) -> u64 {
        self.latest_grid_request += 1;
        self.latest_grid_request
    }

    /// Whether `token` is still the most recent grid request.
    #[must_use]
    pub const fn is_current_grid(&self, token: u64) -> bool {
        self.latest_grid_request == token
    }

    pub(crate) fn set_focused_section(&mut self, section: Section) {
        self.focused_section = section;
    }

    pub(crate) fn set_selected_recent(&mut self, index: Option<usize>) {
        self.selected_recent = index;
    }

    fn clamp_selected_recent(&mut self) {
        if self.recent.is_empty() {
            self.selected_recent = None;
            self.focused_section = Section::Category;
        } else if let Some(index) = self.selected_recent
            && index >= self.recent.len()
        {
            self.selected_recent = Some(self.recent.len() - 1);
        }
    }
}
