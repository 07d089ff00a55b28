//! Application wiring: router commands applied to the core session.
//!
//! [`App`] owns the four moving parts (session, router, popup controller,
//! composer set) and is the only place where commands mutate state. The
//! terminal loop stays thin: it normalizes crossterm events into
//! [`RawEvent`]s, calls [`App::handle_event`] and [`App::tick`], and draws.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::{Block, Paragraph};
use smilepick_core::target::{fallback_selector, selectors};
use smilepick_core::{
    FieldKind, InputBuffer, PageContext, SessionState, TargetResolver, insert_emoticon,
    resolve_target,
};
use smilepick_tui::{
    Command, HitMap, ImageProber, InputRouter, PointerTarget, PopupController, RawEvent,
    draw_picker, measure_grid,
};
use tracing::{debug, warn};

// ─── Composer Set ───────────────────────────────────────────────────────────

/// The recognized text fields of the simulated page.
///
/// Holds the context's fallback field plus the generic app chat input, and
/// tracks which one was focused last. This is the binary's implementation
/// of [`TargetResolver`].
pub struct ComposerSet {
    buffers: Vec<InputBuffer>,
    last_focused: Option<String>,
}

impl ComposerSet {
    /// Build the field set for a page context.
    #[must_use]
    pub fn for_context(context: &PageContext) -> Self {
        let selector = fallback_selector(context);
        let kind = if context.forum {
            FieldKind::MultiLine
        } else {
            FieldKind::SingleLine
        };
        let mut buffers = vec![InputBuffer::new(selector, kind)];
        if selector != selectors::APP_CHAT {
            buffers.push(InputBuffer::new(selectors::APP_CHAT, FieldKind::SingleLine));
        }
        Self {
            buffers,
            last_focused: None,
        }
    }

    /// Mark a field as focused. Unknown selectors are ignored.
    pub fn focus(&mut self, selector: &str) {
        let Some(index) = self
            .buffers
            .iter()
            .position(|buffer| buffer.selector == selector)
        else {
            return;
        };
        for buffer in &mut self.buffers {
            buffer.focused = false;
        }
        self.buffers[index].focused = true;
        self.last_focused = Some(selector.to_owned());
    }

    /// Content of a field, for display and tests.
    #[must_use]
    pub fn text_of(&self, selector: &str) -> Option<&str> {
        self.buffers
            .iter()
            .find(|buffer| buffer.selector == selector)
            .map(InputBuffer::text)
    }

    /// The field the UI should display: last focused, else the context's
    /// fallback, else the first field.
    #[must_use]
    pub fn display_buffer(&self, context: &PageContext) -> &InputBuffer {
        self.last_focused
            .as_deref()
            .and_then(|selector| self.buffers.iter().find(|b| b.selector == selector))
            .or_else(|| {
                let fallback = fallback_selector(context);
                self.buffers.iter().find(|b| b.selector == fallback)
            })
            .unwrap_or(&self.buffers[0])
    }
}

impl TargetResolver for ComposerSet {
    fn has_last_focused(&self) -> bool {
        self.last_focused
            .as_deref()
            .is_some_and(|selector| self.buffers.iter().any(|b| b.selector == selector))
    }

    fn last_focused(&mut self) -> Option<&mut InputBuffer> {
        let selector = self.last_focused.clone()?;
        self.buffers
            .iter_mut()
            .find(|buffer| buffer.selector == selector)
    }

    fn by_selector(&mut self, selector: &str) -> Option<&mut InputBuffer> {
        self.buffers
            .iter_mut()
            .find(|buffer| buffer.selector == selector)
    }
}

/// Terminal cells have no image assets to probe.
struct NoImages;

impl ImageProber for NoImages {
    fn probe(&self, _id: &str) -> Option<(u16, u16)> {
        None
    }
}

// ─── App ────────────────────────────────────────────────────────────────────

/// The assembled picker application.
pub struct App {
    session: SessionState,
    router: InputRouter,
    popup: PopupController,
    composers: ComposerSet,
    context: PageContext,
}

impl App {
    /// Wire the picker together for one page context.
    #[must_use]
    pub fn new(session: SessionState, context: PageContext) -> Self {
        let router = InputRouter::new(session.config());
        let popup = PopupController::new(session.config().popup_mount_delay());
        let composers = ComposerSet::for_context(&context);
        Self {
            session,
            router,
            popup,
            composers,
            context,
        }
    }

    /// Route one event and apply the resulting commands.
    pub fn handle_event(&mut self, event: RawEvent, now: Instant) {
        let commands = self.router.route(event, now);
        for command in commands {
            self.apply(command, now);
        }
    }

    /// Advance time: deliver due long presses and mature pending opens.
    pub fn tick(&mut self, now: Instant) {
        self.handle_event(RawEvent::Tick, now);
        if self.popup.poll(now) {
            self.session.set_popup_mounted(true);
            self.router.acquire_bindings();
            self.rebuild_grid();
        }
    }

    fn apply(&mut self, command: Command, now: Instant) {
        debug!(?command, "applying");
        match command {
            Command::TogglePopup => self.toggle_popup(now),
            Command::ClosePopup => self.close_popup(),
            Command::RepeatFix => {
                match resolve_target(&mut self.composers, &self.context) {
                    Ok(buffer) => buffer.strip_repeated_tail(),
                    Err(err) => debug!(%err, "repeat fix with no target"),
                }
                self.toggle_popup(now);
            }
            Command::Navigate(direction) => self.session.navigate(direction),
            Command::SwitchSection => self.session.switch_section(),
            Command::SwitchCategory(direction) => {
                if self.session.switch_category(direction) {
                    self.rebuild_grid();
                }
            }
            Command::Confirm { keep_open } => {
                if let Some(id) = self.session.confirm_selection() {
                    self.insert(&id, keep_open);
                }
            }
            Command::Insert { id, keep_open } => self.insert(&id, keep_open),
            Command::ToggleFavorite { id } => {
                self.session.toggle_favorite(&id);
                self.rebuild_grid();
            }
            Command::RemoveRecent { id } => self.session.remove_recent(&id),
            Command::ActivateCategory { name } => {
                if self.session.activate_category(&name) {
                    self.rebuild_grid();
                }
            }
            Command::ClearFavorites => {
                self.session.clear_favorites();
                self.rebuild_grid();
            }
            Command::ClearUsage => self.session.clear_usage(),
            Command::FocusInput { selector } => {
                self.composers.focus(&selector);
                self.session.set_last_focused_input(&selector);
            }
        }
    }

    fn toggle_popup(&mut self, now: Instant) {
        if self.popup.is_mounted() || self.popup.is_pending() {
            self.close_popup();
        } else {
            self.popup.request_open(now);
        }
    }

    fn close_popup(&mut self) {
        if self.popup.close() {
            self.session.set_popup_mounted(false);
            self.router.release_bindings();
            // Hand focus back to the field the popup was serving, caret at
            // the end.
            if let Some(selector) = self.session.last_focused_input().map(str::to_owned) {
                self.composers.focus(&selector);
                if let Some(buffer) = self.composers.by_selector(&selector) {
                    buffer.move_caret_to_end();
                }
            }
        }
    }

    /// Rebuild the displayed grid for the active category.
    ///
    /// Measurement is synchronous here, so the request token check always
    /// passes; it exists so an async prober slots in without changing the
    /// staleness rule.
    fn rebuild_grid(&mut self) {
        let token = self.session.begin_grid_request();
        let layout = measure_grid(
            self.session.active_category(),
            self.session.current_sorted().to_vec(),
            &NoImages,
        );
        let is_current = self.session.is_current_grid(token);
        self.popup.apply_grid(layout, is_current);
    }

    fn insert(&mut self, id: &str, keep_open: bool) {
        let image_base = self.session.config().forum_image_base.clone();
        let mobile = self.session.config().mobile;
        match insert_emoticon(&mut self.composers, &self.context, id, &image_base, mobile) {
            Ok(selector) => {
                self.composers.focus(&selector);
                self.session.set_last_focused_input(&selector);
                self.session.record_usage(id);
                if !(keep_open || mobile) {
                    self.close_popup();
                }
            }
            Err(err) => {
                // Failed insertion records nothing and keeps the popup open.
                warn!(%err, "insertion failed");
            }
        }
    }

    /// Draw the popup plus the composer line; returns the frame's hit map.
    pub fn draw(&self, frame: &mut Frame) -> HitMap {
        let [picker_area, composer_area] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).areas(frame.area());
        let mut hits = draw_picker(frame, picker_area, &self.session, &self.popup);

        let buffer = self.composers.display_buffer(&self.context);
        let block = Block::bordered().title(format!(" {} ", buffer.selector));
        frame.render_widget(
            Paragraph::new(buffer.text().to_owned()).block(block),
            composer_area,
        );
        hits.push(
            composer_area,
            PointerTarget::TextInput {
                selector: buffer.selector.clone(),
            },
        );
        hits
    }

    /// Core session state (read-only).
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    /// Popup controller (read-only).
    #[must_use]
    pub const fn popup(&self) -> &PopupController {
        &self.popup
    }

    /// Composer set (read-only).
    #[must_use]
    pub const fn composers(&self) -> &ComposerSet {
        &self.composers
    }

    /// Composer set (mutable); used to seed demo text into fields.
    pub const fn composers_mut(&mut self) -> &mut ComposerSet {
        &mut self.composers
    }

    /// Whether the popup keymap currently owns the keyboard.
    #[must_use]
    pub const fn bindings_active(&self) -> bool {
        self.router.bindings_active()
    }
}

#[cfg(test)]
mod tests {
    use smilepick_core::{Catalog, MemoryStore, PickerConfig};

    use super::*;

    fn app(page_forum: bool) -> App {
        let context = if page_forum {
            PageContext::classify("/forum/topic", "", "")
        } else {
            PageContext::classify("/gamelist/", "", "")
        };
        let session = SessionState::load(
            Box::new(MemoryStore::new()),
            Catalog::builtin(),
            PickerConfig::default(),
        );
        App::new(session, context)
    }

    #[test]
    fn composer_set_tracks_focus() {
        let context = PageContext::classify("/gamelist/", "", "");
        let mut composers = ComposerSet::for_context(&context);
        assert!(!composers.has_last_focused());

        composers.focus(selectors::GENERAL_CHAT);
        assert!(composers.has_last_focused());
        assert_eq!(
            composers.display_buffer(&context).selector,
            selectors::GENERAL_CHAT
        );

        // Unknown selector leaves focus untouched.
        composers.focus("#nope");
        assert!(composers.has_last_focused());
    }

    #[test]
    fn forum_context_gets_a_textarea() {
        let context = PageContext::classify("/forum/topic", "", "");
        let composers = ComposerSet::for_context(&context);
        assert_eq!(
            composers.display_buffer(&context).kind,
            FieldKind::MultiLine
        );
    }

    #[test]
    fn insert_records_usage_only_on_success() {
        let mut app = app(false);
        app.insert("boy", true);
        assert_eq!(app.session().recent(), ["boy".to_owned()]);
        assert!(
            app.composers()
                .text_of(selectors::GENERAL_CHAT)
                .is_some_and(|text| text.contains(":boy:"))
        );
    }

    #[test]
    fn insert_closes_unless_asked_to_stay() {
        let mut app = app(false);
        let now = Instant::now();
        app.handle_event(
            RawEvent::PointerUp {
                target: PointerTarget::TextInput {
                    selector: selectors::GENERAL_CHAT.to_owned(),
                },
                modifiers: crossterm::event::KeyModifiers::CONTROL,
            },
            now,
        );
        let later = now + app.session().config().popup_mount_delay();
        app.tick(later);
        assert!(app.popup().is_mounted());
        assert!(app.bindings_active());

        app.insert("boy", false);
        assert!(!app.popup().is_mounted());
        assert!(!app.bindings_active());
    }
}
