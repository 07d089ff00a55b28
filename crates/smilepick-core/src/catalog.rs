//! Static emoticon catalog: ordered categories of emoticon ids.
//!
//! Categories are fixed at build time; the `Favourites` pseudo-category is
//! the one dynamic entry and is backed by the persisted favorites list (the
//! session owns that list, the catalog only reserves the slot in category
//! order). Every non-Favourites category is non-empty by construction.

use std::collections::HashMap;

/// Name of the dynamic favorites pseudo-category.
pub const FAVOURITES: &str = "Favourites";

/// One static category definition.
#[derive(Debug, Clone)]
pub struct CategoryDef {
    /// Display name; also the key in every persisted map.
    pub name: &'static str,
    /// Single-glyph icon shown on the category button.
    pub icon: &'static str,
    /// Ordered emoticon ids. Order is the tie-break for usage sorting.
    pub emoticons: &'static [&'static str],
}

const BUILTIN: &[CategoryDef] = &[
    CategoryDef {
        name: "Boys",
        icon: "😀",
        emoticons: &[
            "boy", "ya", "rofl", "crazy", "dance", "gamer", "cool", "vampire", "tea", "facepalm",
        ],
    },
    CategoryDef {
        name: "Girls",
        icon: "👧",
        emoticons: &[
            "girl", "angel", "kiss", "flowers", "shy", "tender", "cry", "umbrella", "curtsey",
        ],
    },
    CategoryDef {
        name: "Love",
        icon: "❤",
        emoticons: &["heart", "love", "rose", "wedding", "cupid", "hug", "kissed"],
    },
    CategoryDef {
        name: "Animals",
        icon: "🐱",
        emoticons: &["cat", "dog", "owl", "pig", "horse", "penguin", "mouse"],
    },
    CategoryDef {
        name: "Holidays",
        icon: "🎉",
        emoticons: &["party", "cake", "gift", "fireworks", "santa", "snowman", "clink"],
    },
];

/// Immutable view over the built-in categories.
///
/// The navigable ordering is: all static categories in declaration order,
/// then `Favourites`. Callers that need the Favourites member list resolve
/// it through the session, which owns the persisted favorites.
#[derive(Debug, Clone)]
pub struct Catalog {
    defs: Vec<CategoryDef>,
    by_name: HashMap<&'static str, usize>,
}

impl Catalog {
    /// The built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_defs(BUILTIN.to_vec())
    }

    /// Build a catalog from explicit definitions (tests use small ones).
    #[must_use]
    pub fn from_defs(defs: Vec<CategoryDef>) -> Self {
        let by_name = defs
            .iter()
            .enumerate()
            .map(|(idx, def)| (def.name, idx))
            .collect();
        Self { defs, by_name }
    }

    /// All category names in navigable order, `Favourites` last.
    #[must_use]
    pub fn category_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.defs.iter().map(|def| def.name).collect();
        names.push(FAVOURITES);
        names
    }

    /// Whether `name` is a static (non-Favourites) category.
    #[must_use]
    pub fn is_static_category(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Ordered emoticon ids of a static category. `None` for `Favourites`
    /// and unknown names.
    #[must_use]
    pub fn emoticons(&self, name: &str) -> Option<&[&'static str]> {
        self.by_name.get(name).map(|&idx| self.defs[idx].emoticons)
    }

    /// Display icon for a category button.
    #[must_use]
    pub fn icon(&self, name: &str) -> &'static str {
        if name == FAVOURITES {
            return "⭐";
        }
        self.by_name
            .get(name)
            .map_or("😊", |&idx| self.defs[idx].icon)
    }

    /// Whether `id` appears in at least one static category.
    ///
    /// This is the membership invariant for favorites: only catalogued ids
    /// may be favorited.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.defs.iter().any(|def| def.emoticons.contains(&id))
    }

    /// First category name; the fallback whenever a persisted active
    /// category no longer resolves.
    #[must_use]
    pub fn first_category(&self) -> &'static str {
        self.defs.first().map_or(FAVOURITES, |def| def.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_categories_are_non_empty() {
        let catalog = Catalog::builtin();
        for name in catalog.category_names() {
            if name == FAVOURITES {
                continue;
            }
            let ids = catalog.emoticons(name).unwrap();
            assert!(!ids.is_empty(), "category {name} must not be empty");
        }
    }

    #[test]
    fn favourites_is_last_in_navigable_order() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.category_names().last(), Some(&FAVOURITES));
    }

    #[test]
    fn favourites_has_no_static_members() {
        let catalog = Catalog::builtin();
        assert!(catalog.emoticons(FAVOURITES).is_none());
        assert!(!catalog.is_static_category(FAVOURITES));
    }

    #[test]
    fn contains_checks_all_categories() {
        let catalog = Catalog::builtin();
        assert!(catalog.contains("rofl"));
        assert!(catalog.contains("penguin"));
        assert!(!catalog.contains("no-such-emoticon"));
    }

    #[test]
    fn unknown_category_gets_fallback_icon() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.icon("Nope"), "😊");
        assert_eq!(catalog.icon(FAVOURITES), "⭐");
    }

    #[test]
    fn first_category_is_boys() {
        assert_eq!(Catalog::builtin().first_category(), "Boys");
    }
}
