//! Insertion targets: page contexts, text fields, and code formatting.
//!
//! The picker inserts into whatever recognized text field the user touched
//! last; failing that, each page context has one well-known fallback field.
//! When neither resolves, the failure is user-facing and recoverable — the
//! error names the detected context(s) and nothing is mutated.

use crate::error::{PickerError, PickerResult};

/// Well-known fallback field selectors, one per page context.
pub mod selectors {
    /// Forum quick-reply textarea.
    pub const FORUM_REPLY: &str = "#fast-reply_textarea";
    /// General chat input on the game-list page.
    pub const GENERAL_CHAT: &str = "#chat-general.chat .messages input.text";
    /// In-game chat input.
    pub const GAME_CHAT: &str = "[id^=\"chat-game\"].chat .messages input.text";
    /// Generic app chat input, used when no specific context matched.
    pub const APP_CHAT: &str = "#app-chat-container #message-input";
}

// ─── Page Context ───────────────────────────────────────────────────────────

/// Classification of the current page, derived from URL path, query, and
/// hash. Contexts are not mutually exclusive (a game can be open from the
/// game list).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Forum pages (`/forum/` in the path).
    pub forum: bool,
    /// Game-list pages (`/gamelist/` in the path).
    pub gamelist: bool,
    /// An active game (`gmid` query parameter).
    pub game: bool,
    /// A user profile (`/u/` path with a numeric hash route).
    pub profile: bool,
    /// The game id, when in a game.
    pub gmid: Option<String>,
    /// The profile id, when on a profile.
    pub profile_id: Option<String>,
}

impl PageContext {
    /// Classify a location split into path, query string, and hash fragment.
    #[must_use]
    pub fn classify(path: &str, query: &str, hash: &str) -> Self {
        let gmid = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("gmid="))
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        let profile_id = (path == "/u/")
            .then(|| parse_profile_hash(hash))
            .flatten();

        Self {
            forum: path.contains("/forum/"),
            gamelist: path.contains("/gamelist/"),
            game: gmid.is_some(),
            profile: profile_id.is_some(),
            gmid,
            profile_id,
        }
    }

    /// Human-readable labels of every detected context, for the
    /// target-unavailable message.
    #[must_use]
    pub fn detected_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if self.forum {
            labels.push("the forum".to_owned());
        }
        if self.profile {
            labels.push("the profile".to_owned());
        }
        if self.gamelist {
            labels.push("general chat".to_owned());
        }
        if self.game {
            labels.push("game chat".to_owned());
        }
        if labels.is_empty() {
            labels.push("this page".to_owned());
        }
        labels
    }
}

/// Extract the numeric id from a `#/12345/...` profile hash route.
fn parse_profile_hash(hash: &str) -> Option<String> {
    let rest = hash.strip_prefix("#/")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let terminated = rest[digits.len()..].starts_with('/');
    (!digits.is_empty() && terminated).then_some(digits)
}

/// The context-specific fallback selector used when no input is focused.
#[must_use]
pub fn fallback_selector(context: &PageContext) -> &'static str {
    if context.forum {
        selectors::FORUM_REPLY
    } else if context.gamelist {
        selectors::GENERAL_CHAT
    } else if context.game {
        selectors::GAME_CHAT
    } else {
        selectors::APP_CHAT
    }
}

// ─── Text Fields ────────────────────────────────────────────────────────────

/// Whether a field accepts line breaks. Drives the insertion format on
/// forum pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line chat input.
    SingleLine,
    /// Multi-line textarea.
    MultiLine,
}

/// A recognized text field: its content, caret, and focus flag.
///
/// Caret positions are character offsets, so splicing stays valid for
/// non-ASCII content already in the field.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    /// Selector identifying the field on the page.
    pub selector: String,
    /// Single- or multi-line.
    pub kind: FieldKind,
    /// Whether the field currently holds focus.
    pub focused: bool,
    text: String,
    caret: usize,
}

impl InputBuffer {
    /// Create an empty field.
    #[must_use]
    pub fn new(selector: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            selector: selector.into(),
            kind,
            focused: false,
            text: String::new(),
            caret: 0,
        }
    }

    /// Current content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position in characters.
    #[must_use]
    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// Replace the content and park the caret at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.text.chars().count();
    }

    /// Move the caret, clamped to the content length.
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.text.chars().count());
    }

    /// Park the caret after the last character.
    pub fn move_caret_to_end(&mut self) {
        self.caret = self.text.chars().count();
    }

    /// Splice `code` at the caret and advance the caret past it.
    pub fn insert_at_caret(&mut self, code: &str) {
        let byte_index = self
            .text
            .char_indices()
            .nth(self.caret)
            .map_or(self.text.len(), |(index, _)| index);
        self.text.insert_str(byte_index, code);
        self.caret += code.chars().count();
    }

    /// Remove a duplicated trailing character: if the last two characters
    /// are equal both go, otherwise one goes. The caret lands at the end.
    ///
    /// This repairs the stray character left behind when the repeat-fix key
    /// chord's first press reached the field as ordinary input.
    pub fn strip_repeated_tail(&mut self) {
        let mut chars = self.text.chars();
        let last = chars.next_back();
        let second_last = chars.next_back();
        match (last, second_last) {
            (Some(a), Some(b)) if a == b => {
                self.text.pop();
                self.text.pop();
            }
            (Some(_), _) => {
                self.text.pop();
            }
            (None, _) => {}
        }
        self.caret = self.text.chars().count();
    }
}

// ─── Resolution ─────────────────────────────────────────────────────────────

/// Access to the page's recognized text fields.
///
/// The UI layer implements this over whatever widget model it has; the core
/// only needs the two lookups.
pub trait TargetResolver {
    /// Whether a recognized input has been focused this session.
    fn has_last_focused(&self) -> bool;

    /// The last focused recognized input.
    fn last_focused(&mut self) -> Option<&mut InputBuffer>;

    /// A field by its selector.
    fn by_selector(&mut self, selector: &str) -> Option<&mut InputBuffer>;
}

/// Resolve the field an insertion should go to: last focused input first,
/// then the context's fallback selector.
pub fn resolve_target<'r>(
    resolver: &'r mut dyn TargetResolver,
    context: &PageContext,
) -> PickerResult<&'r mut InputBuffer> {
    let found = if resolver.has_last_focused() {
        resolver.last_focused()
    } else {
        resolver.by_selector(fallback_selector(context))
    };
    found.ok_or_else(|| PickerError::TargetUnavailable {
        contexts: context.detected_labels(),
    })
}

/// The literal text inserted for an emoticon.
///
/// Forum pages with a multi-line target get the image-tag form; everything
/// else gets the colon token. Both carry a trailing space.
#[must_use]
pub fn emoticon_code(id: &str, context: &PageContext, kind: FieldKind, image_base: &str) -> String {
    if context.forum && kind == FieldKind::MultiLine {
        format!("[img]{image_base}/img/smilies/{id}.gif[/img] ")
    } else {
        format!(":{id}: ")
    }
}

/// Resolve a target, splice the emoticon code at its caret, and refocus it
/// (except on touch platforms). Returns the selector of the field written
/// to, so the caller can record it as the new default target.
pub fn insert_emoticon(
    resolver: &mut dyn TargetResolver,
    context: &PageContext,
    id: &str,
    image_base: &str,
    mobile: bool,
) -> PickerResult<String> {
    let buffer = resolve_target(resolver, context)?;
    let code = emoticon_code(id, context, buffer.kind, image_base);
    buffer.insert_at_caret(&code);
    if !mobile {
        buffer.focused = true;
    }
    Ok(buffer.selector.clone())
}
