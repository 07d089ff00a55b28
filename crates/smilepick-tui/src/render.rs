//! Popup rendering and mouse hit resolution.
//!
//! Drawing is a pure function of core session state plus the popup
//! controller; nothing here mutates either. Each draw also produces a
//! [`HitMap`] recording which screen region belongs to which
//! [`PointerTarget`], so the event loop can translate raw mouse
//! coordinates into the same semantic targets keyboard input resolves to.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};
use smilepick_core::{Section, SessionState};

use crate::popup::PopupController;
use crate::router::PointerTarget;

// ─── Hit Map ────────────────────────────────────────────────────────────────

/// Screen regions mapped to pointer targets, rebuilt every draw.
///
/// Regions are recorded back-to-front; [`hit`](HitMap::hit) resolves the
/// topmost one, so a cell inside the popup body wins over the body itself.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, PointerTarget)>,
}

impl HitMap {
    /// Record a region. Later regions occlude earlier ones.
    pub fn push(&mut self, rect: Rect, target: PointerTarget) {
        self.regions.push((rect, target));
    }

    /// The topmost target under a screen position, if any.
    #[must_use]
    pub fn hit(&self, x: u16, y: u16) -> Option<&PointerTarget> {
        self.regions
            .iter()
            .rev()
            .find(|(rect, _)| contains(*rect, x, y))
            .map(|(_, target)| target)
    }

    /// Number of recorded regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no regions were recorded (popup not mounted).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

// ─── Drawing ────────────────────────────────────────────────────────────────

/// Draw the picker popup and return the hit map for this frame.
///
/// An unmounted popup draws nothing and yields an empty map, which the
/// event loop treats as "everything is outside".
pub fn draw_picker(
    frame: &mut Frame,
    area: Rect,
    session: &SessionState,
    popup: &PopupController,
) -> HitMap {
    let mut hits = HitMap::default();
    if !popup.is_mounted() {
        return hits;
    }

    let outer = Block::bordered().title(" smilepick ");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    hits.push(area, PointerTarget::PopupBody);

    let [strip_area, grid_area, recent_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    draw_category_strip(frame, strip_area, session, &mut hits);
    draw_grid(frame, grid_area, session, popup, &mut hits);
    draw_recent_strip(frame, recent_area, session, &mut hits);
    hits
}

fn draw_category_strip(frame: &mut Frame, area: Rect, session: &SessionState, hits: &mut HitMap) {
    let mut cursor = Cursor::new(area);
    for name in session.catalog().category_names() {
        let disabled = name == smilepick_core::FAVOURITES && session.favorites().is_empty();
        let label = format!(" {} {name} ", session.catalog().icon(name));
        let style = if disabled {
            Style::default().add_modifier(Modifier::DIM)
        } else if name == session.active_category() {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let Some(rect) = cursor.place(frame, &label, style) else {
            continue;
        };
        // An empty Favourites button is visible but inert.
        if !disabled {
            hits.push(
                rect,
                PointerTarget::Category {
                    name: name.to_owned(),
                },
            );
        }
    }
}

fn draw_grid(
    frame: &mut Frame,
    area: Rect,
    session: &SessionState,
    popup: &PopupController,
    hits: &mut HitMap,
) {
    // The measured grid lags a category switch by one rebuild; fall back
    // to the session's order until it lands.
    let ids: Vec<String> = popup
        .grid()
        .filter(|layout| layout.category == session.active_category())
        .map_or_else(
            || session.current_sorted().to_vec(),
            |layout| layout.emoticons.clone(),
        );

    let keyboard_focus = session.focused_section() == Section::Category;
    let selected = session.last_used(session.active_category()).map(str::to_owned);

    let mut cursor = Cursor::new(area);
    for id in ids {
        let star = if session.is_favorite(&id) { "⭐" } else { "" };
        let label = format!(" {star}{id} ");
        let is_selected = keyboard_focus && selected.as_deref() == Some(id.as_str());
        let style = if is_selected {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default()
        };
        if let Some(rect) = cursor.place(frame, &label, style) {
            hits.push(
                rect,
                PointerTarget::Emoticon {
                    id,
                    section: Section::Category,
                },
            );
        }
    }
}

fn draw_recent_strip(frame: &mut Frame, area: Rect, session: &SessionState, hits: &mut HitMap) {
    let keyboard_focus = session.focused_section() == Section::Recent;
    let mut cursor = Cursor::new(area);
    for (index, id) in session.recent().iter().enumerate() {
        let is_selected = keyboard_focus && session.selected_recent() == Some(index);
        let style = if is_selected {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let label = format!(" {id} ");
        if let Some(rect) = cursor.place(frame, &label, style) {
            hits.push(
                rect,
                PointerTarget::Emoticon {
                    id: id.clone(),
                    section: Section::Recent,
                },
            );
        }
    }
}

/// Left-to-right, top-to-bottom cell placement within an area.
struct Cursor {
    area: Rect,
    x: u16,
    y: u16,
}

impl Cursor {
    fn new(area: Rect) -> Self {
        Self {
            area,
            x: area.x,
            y: area.y,
        }
    }

    /// Render `label` at the cursor and advance. Returns the cell rect, or
    /// `None` once the area is full.
    fn place(&mut self, frame: &mut Frame, label: &str, style: Style) -> Option<Rect> {
        #[allow(clippy::cast_possible_truncation)]
        let width = label.chars().count().min(usize::from(u16::MAX)) as u16;
        if width == 0 || self.area.width == 0 {
            return None;
        }
        if self.x + width > self.area.x + self.area.width {
            self.x = self.area.x;
            self.y += 1;
        }
        if self.y >= self.area.y + self.area.height {
            return None;
        }
        let rect = Rect {
            x: self.x,
            y: self.y,
            width: width.min(self.area.x + self.area.width - self.x),
            height: 1,
        };
        frame.render_widget(Paragraph::new(Span::styled(label.to_owned(), style)), rect);
        self.x += width + 1;
        Some(rect)
    }
}
