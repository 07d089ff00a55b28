//! End-to-end interaction flows through the assembled application.
//!
//! These tests drive [`App`] with the same normalized events the terminal
//! loop produces, and assert on the observable results: buffer contents,
//! popup state, keymap ownership, and persisted session lists.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyModifiers};
use smilepick::App;
use smilepick_core::target::selectors;
use smilepick_core::{
    Catalog, MemoryStore, PageContext, PickerConfig, Section, SessionState, TargetResolver,
};
use smilepick_tui::{PointerTarget, RawEvent};

fn gamelist_app() -> App {
    let session = SessionState::load(
        Box::new(MemoryStore::new()),
        Catalog::builtin(),
        PickerConfig::default(),
    );
    App::new(session, PageContext::classify("/gamelist/", "", ""))
}

fn at(base: Instant, ms: u64) -> Instant {
    base + Duration::from_millis(ms)
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> RawEvent {
    RawEvent::Key { code, modifiers }
}

fn text_input(selector: &str) -> PointerTarget {
    PointerTarget::TextInput {
        selector: selector.to_owned(),
    }
}

fn cell(id: &str, section: Section) -> PointerTarget {
    PointerTarget::Emoticon {
        id: id.to_owned(),
        section,
    }
}

/// Ctrl+click a field, then advance past the mount debounce.
fn open_popup(app: &mut App, base: Instant) {
    app.handle_event(
        RawEvent::PointerUp {
            target: text_input(selectors::GENERAL_CHAT),
            modifiers: KeyModifiers::CONTROL,
        },
        base,
    );
    assert!(app.popup().is_pending());
    app.tick(at(base, 20));
    assert!(app.popup().is_mounted());
    assert!(app.bindings_active());
}

#[test]
fn ctrl_click_navigate_confirm_inserts_and_closes() {
    let base = Instant::now();
    let mut app = gamelist_app();
    open_popup(&mut app, base);

    // Selection starts on the category's first emoticon; one step right.
    app.handle_event(key(KeyCode::Right, KeyModifiers::NONE), at(base, 100));
    app.handle_event(key(KeyCode::Enter, KeyModifiers::NONE), at(base, 200));

    let text = app
        .composers()
        .text_of(selectors::GENERAL_CHAT)
        .expect("general chat field exists");
    assert_eq!(text, ":ya: ");

    assert!(!app.popup().is_mounted());
    assert!(!app.bindings_active());
    assert_eq!(app.session().recent(), ["ya".to_owned()]);
    assert_eq!(app.session().last_used("Boys"), Some("ya"));
}

#[test]
fn shift_confirm_keeps_the_popup_open() {
    let base = Instant::now();
    let mut app = gamelist_app();
    open_popup(&mut app, base);

    app.handle_event(key(KeyCode::Enter, KeyModifiers::SHIFT), at(base, 100));
    assert!(app.popup().is_mounted());
    assert!(app.bindings_active());

    app.handle_event(key(KeyCode::Enter, KeyModifiers::NONE), at(base, 200));
    assert!(!app.popup().is_mounted());

    let text = app
        .composers()
        .text_of(selectors::GENERAL_CHAT)
        .expect("general chat field exists");
    assert_eq!(text, ":boy: :boy: ");
}

#[test]
fn double_press_repairs_the_field_and_opens() {
    let base = Instant::now();
    let mut app = gamelist_app();

    app.handle_event(
        RawEvent::FocusInput {
            selector: selectors::GENERAL_CHAT.to_owned(),
        },
        base,
    );
    app.composers_mut()
        .by_selector(selectors::GENERAL_CHAT)
        .expect("general chat field exists")
        .set_text("helloqq");

    app.handle_event(key(KeyCode::Char('q'), KeyModifiers::NONE), at(base, 10));
    app.handle_event(key(KeyCode::Char('q'), KeyModifiers::NONE), at(base, 200));

    assert_eq!(
        app.composers().text_of(selectors::GENERAL_CHAT),
        Some("hello")
    );
    assert!(app.popup().is_pending());
    app.tick(at(base, 300));
    assert!(app.popup().is_mounted());
}

#[test]
fn slow_presses_do_not_fire_the_chord() {
    let base = Instant::now();
    let mut app = gamelist_app();
    app.handle_event(key(KeyCode::Char('q'), KeyModifiers::NONE), at(base, 0));
    app.handle_event(key(KeyCode::Char('q'), KeyModifiers::NONE), at(base, 700));
    assert!(!app.popup().is_pending());
    assert!(!app.popup().is_mounted());
}

#[test]
fn escape_closes_and_releases_the_keymap() {
    let base = Instant::now();
    let mut app = gamelist_app();
    open_popup(&mut app, base);

    app.handle_event(key(KeyCode::Esc, KeyModifiers::NONE), at(base, 100));
    assert!(!app.popup().is_mounted());
    assert!(!app.bindings_active());

    // With the keymap released, picker keys fall through.
    app.handle_event(key(KeyCode::Right, KeyModifiers::NONE), at(base, 200));
    assert_eq!(app.session().last_used("Boys"), Some("boy"));
}

#[test]
fn tab_steps_categories_and_rebuilds_the_grid() {
    let base = Instant::now();
    let mut app = gamelist_app();
    open_popup(&mut app, base);

    assert_eq!(
        app.popup().grid().map(|grid| grid.category.as_str()),
        Some("Boys")
    );

    app.handle_event(key(KeyCode::Tab, KeyModifiers::NONE), at(base, 100));
    assert_eq!(app.session().active_category(), "Girls");
    assert_eq!(
        app.popup().grid().map(|grid| grid.category.as_str()),
        Some("Girls")
    );

    // Clamped at the first category: BackTab twice stays on Boys.
    app.handle_event(key(KeyCode::BackTab, KeyModifiers::NONE), at(base, 200));
    app.handle_event(key(KeyCode::BackTab, KeyModifiers::NONE), at(base, 300));
    assert_eq!(app.session().active_category(), "Boys");
}

#[test]
fn long_press_toggles_a_favorite_without_inserting() {
    let base = Instant::now();
    let mut app = gamelist_app();
    open_popup(&mut app, base);

    app.handle_event(
        RawEvent::PointerDown {
            target: cell("rofl", Section::Category),
            modifiers: KeyModifiers::NONE,
        },
        at(base, 100),
    );
    app.tick(at(base, 700));
    app.handle_event(
        RawEvent::PointerUp {
            target: cell("rofl", Section::Category),
            modifiers: KeyModifiers::NONE,
        },
        at(base, 750),
    );

    assert_eq!(app.session().favorites(), ["rofl".to_owned()]);
    // The suppressed click inserted nothing.
    assert_eq!(
        app.composers().text_of(selectors::GENERAL_CHAT),
        Some("")
    );
    assert!(app.popup().is_mounted());
}

#[test]
fn long_press_on_the_strip_removes_the_recent() {
    let base = Instant::now();
    let mut app = gamelist_app();
    open_popup(&mut app, base);

    // Build up two recents via shift+click (stays open).
    for (ms, id) in [(100, "boy"), (300, "ya")] {
        app.handle_event(
            RawEvent::PointerDown {
                target: cell(id, Section::Category),
                modifiers: KeyModifiers::SHIFT,
            },
            at(base, ms),
        );
        app.handle_event(
            RawEvent::PointerUp {
                target: cell(id, Section::Category),
                modifiers: KeyModifiers::SHIFT,
            },
            at(base, ms + 50),
        );
    }
    assert_eq!(app.session().recent(), ["ya".to_owned(), "boy".to_owned()]);

    app.handle_event(
        RawEvent::PointerDown {
            target: cell("ya", Section::Recent),
            modifiers: KeyModifiers::NONE,
        },
        at(base, 500),
    );
    app.tick(at(base, 1100));
    app.handle_event(
        RawEvent::PointerUp {
            target: cell("ya", Section::Recent),
            modifiers: KeyModifiers::NONE,
        },
        at(base, 1150),
    );

    assert_eq!(app.session().recent(), ["boy".to_owned()]);
    assert!(app.popup().is_mounted());
}

#[test]
fn outside_click_closes_the_popup() {
    let base = Instant::now();
    let mut app = gamelist_app();
    open_popup(&mut app, base);

    app.handle_event(
        RawEvent::PointerUp {
            target: PointerTarget::Outside,
            modifiers: KeyModifiers::NONE,
        },
        at(base, 100),
    );
    assert!(!app.popup().is_mounted());
    assert!(!app.bindings_active());
}

#[test]
fn forum_context_inserts_the_image_tag_form() {
    let base = Instant::now();
    let session = SessionState::load(
        Box::new(MemoryStore::new()),
        Catalog::builtin(),
        PickerConfig::default(),
    );
    let mut app = App::new(session, PageContext::classify("/forum/topic", "", ""));

    app.handle_event(
        RawEvent::PointerUp {
            target: text_input(selectors::FORUM_REPLY),
            modifiers: KeyModifiers::CONTROL,
        },
        base,
    );
    app.tick(at(base, 20));
    app.handle_event(key(KeyCode::Enter, KeyModifiers::NONE), at(base, 100));

    let text = app
        .composers()
        .text_of(selectors::FORUM_REPLY)
        .expect("forum reply field exists");
    assert_eq!(text, "[img]https://klavogonki.ru/img/smilies/boy.gif[/img] ");
}

#[test]
fn section_switch_and_strip_navigation() {
    let base = Instant::now();
    let mut app = gamelist_app();
    open_popup(&mut app, base);

    // Two shift-confirms to seed the strip.
    app.handle_event(key(KeyCode::Enter, KeyModifiers::SHIFT), at(base, 100));
    app.handle_event(key(KeyCode::Right, KeyModifiers::NONE), at(base, 150));
    app.handle_event(key(KeyCode::Enter, KeyModifiers::SHIFT), at(base, 200));
    assert_eq!(app.session().recent(), ["ya".to_owned(), "boy".to_owned()]);

    app.handle_event(key(KeyCode::Char('d'), KeyModifiers::NONE), at(base, 300));
    assert_eq!(app.session().focused_section(), Section::Recent);
    assert_eq!(app.session().selected_recent(), Some(0));

    app.handle_event(key(KeyCode::Char('k'), KeyModifiers::NONE), at(base, 400));
    app.handle_event(key(KeyCode::Enter, KeyModifiers::NONE), at(base, 500));

    let text = app
        .composers()
        .text_of(selectors::GENERAL_CHAT)
        .expect("general chat field exists");
    assert!(text.ends_with(":boy: "), "got: {text}");
}
