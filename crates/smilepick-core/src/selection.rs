//! Pure selection arithmetic over the session state.
//!
//! These operations are total: indices wrap (within a section) or clamp
//! (across categories), empty lists are no-ops, and nothing here can fail.
//! They mutate [`SessionState`] directly and persist the durable pieces
//! (last-used id, active category) as they go.

use crate::session::{Section, SessionState};

/// Direction of a one-step navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the start of the list (left).
    Back,
    /// Toward the end of the list (right).
    Forward,
}

impl Direction {
    /// Signed displacement.
    #[must_use]
    pub const fn offset(self) -> isize {
        match self {
            Self::Back => -1,
            Self::Forward => 1,
        }
    }
}

/// Wrap a possibly-negative index into `[0, len)`.
fn wrap_index(index: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    #[allow(clippy::cast_possible_wrap)]
    let len = len as isize;
    #[allow(clippy::cast_sign_loss)]
    {
        index.rem_euclid(len) as usize
    }
}

impl SessionState {
    /// Toggle the focused section between the category grid and the recent
    /// strip.
    ///
    /// Entering the recent strip requires it to be non-empty (no-op
    /// otherwise); entering it without a prior selection lands on index 0.
    pub fn switch_section(&mut self) {
        match self.focused_section() {
            Section::Category => {
                if self.recent().is_empty() {
                    return;
                }
                self.set_focused_section(Section::Recent);
                let out_of_range = self
                    .selected_recent()
                    .is_none_or(|index| index >= self.recent().len());
                if out_of_range {
                    self.set_selected_recent(Some(0));
                }
            }
            Section::Recent => self.set_focused_section(Section::Category),
        }
    }

    /// Step the selection of the focused section one place, wrapping at
    /// both ends.
    ///
    /// In the category grid the selection *is* the category's last-used id,
    /// so the result is persisted immediately. A missing selection counts
    /// as index 0 before the displacement is applied.
    pub fn navigate(&mut self, direction: Direction) {
        match self.focused_section() {
            Section::Category => {
                let len = self.current_sorted().len();
                if len == 0 {
                    return;
                }
                let base = self
                    .last_used(self.active_category())
                    .and_then(|id| self.current_sorted().iter().position(|e| e == id))
                    .unwrap_or(0);
                #[allow(clippy::cast_possible_wrap)]
                let index = wrap_index(base as isize + direction.offset(), len);
                let id = self.current_sorted()[index].clone();
                self.set_last_used(&id);
            }
            Section::Recent => {
                let len = self.recent().len();
                if len == 0 {
                    return;
                }
                let base = self.selected_recent().unwrap_or(0);
                #[allow(clippy::cast_possible_wrap)]
                let index = wrap_index(base as isize + direction.offset(), len);
                self.set_selected_recent(Some(index));
            }
        }
    }

    /// Step to the adjacent category in the navigable list.
    ///
    /// Unlike in-section navigation this clamps at the ends: repeated "next"
    /// on the last category is a no-op. Returns whether the active category
    /// changed.
    pub fn switch_category(&mut self, direction: Direction) -> bool {
        let navigable = self.navigable_categories();
        if navigable.is_empty() {
            return false;
        }
        let index = navigable
            .iter()
            .position(|name| name == self.active_category())
            .unwrap_or(0);
        let target = match direction {
            Direction::Forward if index + 1 < navigable.len() => index + 1,
            Direction::Back if index > 0 => index - 1,
            _ => return false,
        };
        self.activate_category(&navigable[target].clone())
    }

    /// Resolve the emoticon a confirm action refers to, if any.
    ///
    /// Category section: the active category's last-used id, provided it is
    /// still a member of the displayed grid. Recent section: the id under
    /// the strip selection.
    #[must_use]
    pub fn confirm_selection(&self) -> Option<String> {
        match self.focused_section() {
            Section::Category => {
                let id = self.last_used(self.active_category())?;
                self.current_sorted()
                    .iter()
                    .find(|candidate| candidate.as_str() == id)
                    .cloned()
            }
            Section::Recent => {
                let index = self.selected_recent()?;
                self.recent().get(index).cloned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, CategoryDef, FAVOURITES};
    use crate::config::PickerConfig;
    use crate::store::MemoryStore;

    use super::*;

    fn session_with(emoticons: &'static [&'static str]) -> SessionState {
        let catalog = Catalog::from_defs(vec![
            CategoryDef {
                name: "Boys",
                icon: "😀",
                emoticons,
            },
            CategoryDef {
                name: "Girls",
                icon: "👧",
                emoticons: &["x", "y"],
            },
        ]);
        SessionState::load(
            Box::new(MemoryStore::new()),
            catalog,
            PickerConfig::default(),
        )
    }

    #[test]
    fn navigate_wraps_both_directions() {
        let mut session = session_with(&["a", "b", "c"]);
        // Seeded at "a" (index 0); back wraps to the end.
        session.navigate(Direction::Back);
        assert_eq!(session.last_used("Boys"), Some("c"));
        // Forward from the end wraps to the start.
        session.navigate(Direction::Forward);
        assert_eq!(session.last_used("Boys"), Some("a"));
        session.navigate(Direction::Forward);
        assert_eq!(session.last_used("Boys"), Some("b"));
    }

    #[test]
    fn navigate_single_item_stays_put() {
        let mut session = session_with(&["only"]);
        session.navigate(Direction::Forward);
        assert_eq!(session.last_used("Boys"), Some("only"));
        session.navigate(Direction::Back);
        assert_eq!(session.last_used("Boys"), Some("only"));
    }

    #[test]
    fn navigate_recent_from_no_selection() {
        let mut session = session_with(&["a", "b", "c"]);
        session.push_recent("a");
        session.push_recent("b");
        session.push_recent("c");
        session.set_popup_mounted(true);
        session.switch_section();
        assert_eq!(session.selected_recent(), Some(0));

        // Sentinel-as-zero: after re-mount the selection resets, and a
        // backward step from "no selection" wraps to the end.
        session.set_popup_mounted(false);
        session.set_popup_mounted(true);
        session.switch_section();
        session.set_selected_recent(None);
        session.navigate(Direction::Back);
        assert_eq!(session.selected_recent(), Some(2));
    }

    #[test]
    fn switch_section_noop_with_empty_recents() {
        let mut session = session_with(&["a", "b"]);
        session.set_popup_mounted(true);
        session.switch_section();
        assert_eq!(session.focused_section(), Section::Category);
    }

    #[test]
    fn switch_section_roundtrip() {
        let mut session = session_with(&["a", "b"]);
        session.push_recent("a");
        session.set_popup_mounted(true);
        session.switch_section();
        assert_eq!(session.focused_section(), Section::Recent);
        session.switch_section();
        assert_eq!(session.focused_section(), Section::Category);
    }

    #[test]
    fn switch_category_clamps_at_ends() {
        let mut session = session_with(&["a"]);
        assert!(!session.switch_category(Direction::Back));
        assert_eq!(session.active_category(), "Boys");

        assert!(session.switch_category(Direction::Forward));
        assert_eq!(session.active_category(), "Girls");

        // Favourites is empty, so "Girls" is the last navigable category.
        assert!(!session.switch_category(Direction::Forward));
        assert_eq!(session.active_category(), "Girls");
    }

    #[test]
    fn switch_category_reaches_favourites_when_populated() {
        let mut session = session_with(&["a"]);
        session.toggle_favorite("a");
        assert!(session.switch_category(Direction::Forward));
        assert!(session.switch_category(Direction::Forward));
        assert_eq!(session.active_category(), FAVOURITES);
    }

    #[test]
    fn confirm_resolves_per_section() {
        let mut session = session_with(&["a", "b", "c"]);
        assert_eq!(session.confirm_selection().as_deref(), Some("a"));

        session.push_recent("c");
        session.push_recent("b");
        session.set_popup_mounted(true);
        session.switch_section();
        assert_eq!(session.confirm_selection().as_deref(), Some("b"));
        session.navigate(Direction::Forward);
        assert_eq!(session.confirm_selection().as_deref(), Some("c"));
    }

    #[test]
    fn confirm_none_when_recent_empty() {
        let mut session = session_with(&["a"]);
        session.set_popup_mounted(true);
        session.set_focused_section(Section::Recent);
        assert_eq!(session.confirm_selection(), None);
    }
}
