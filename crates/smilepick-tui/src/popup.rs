//! Popup lifecycle: mount debounce, grid measurement, stale-render guard.
//!
//! Opening is deferred by a short debounce so the event that requested the
//! toggle can finish propagating before the popup exists; otherwise the
//! very same click that opened it would land on the new popup (or the page
//! underneath) and close it again.
//!
//! Grid measurement is asynchronous in spirit: a rebuild is requested,
//! produced elsewhere, and applied later. Rapid category switching can
//! therefore finish rebuilds out of order, so every application is gated
//! on whether its request is still the latest one. A stale layout is
//! dropped, never displayed.

use std::time::{Duration, Instant};

use tracing::debug;

/// Minimum emoticon cell edge, in pixels. Cells grow to fit the largest
/// probed image but never shrink below this.
pub const MIN_CELL_PX: u16 = 34;

// ─── Grid Measurement ───────────────────────────────────────────────────────

/// Source of emoticon image dimensions.
///
/// Probing may fail per-image (asset missing, not yet loaded); failed
/// probes simply don't influence the cell size.
pub trait ImageProber {
    /// Natural `(width, height)` of an emoticon's image, if known.
    fn probe(&self, id: &str) -> Option<(u16, u16)>;
}

/// A measured grid, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    /// Category this grid was measured for.
    pub category: String,
    /// Uniform cell width.
    pub cell_width: u16,
    /// Uniform cell height.
    pub cell_height: u16,
    /// Cell contents, in display order.
    pub emoticons: Vec<String>,
}

/// Measure a uniform cell size over a category's emoticons.
#[must_use]
pub fn measure_grid(
    category: &str,
    emoticons: Vec<String>,
    prober: &dyn ImageProber,
) -> GridLayout {
    let mut cell_width = MIN_CELL_PX;
    let mut cell_height = MIN_CELL_PX;
    for id in &emoticons {
        if let Some((width, height)) = prober.probe(id) {
            cell_width = cell_width.max(width);
            cell_height = cell_height.max(height);
        }
    }
    GridLayout {
        category: category.to_owned(),
        cell_width,
        cell_height,
        emoticons,
    }
}

// ─── Popup Controller ───────────────────────────────────────────────────────

/// Owns the popup's open/closed state and the currently displayed grid.
pub struct PopupController {
    mount_delay: Duration,
    pending_open: Option<Instant>,
    mounted: bool,
    grid: Option<GridLayout>,
}

impl PopupController {
    /// Controller with the given mount debounce.
    #[must_use]
    pub fn new(mount_delay: Duration) -> Self {
        Self {
            mount_delay,
            pending_open: None,
            mounted: false,
            grid: None,
        }
    }

    /// Schedule an open. No-op while mounted or already pending.
    pub fn request_open(&mut self, now: Instant) {
        if !self.mounted && self.pending_open.is_none() {
            self.pending_open = Some(now);
        }
    }

    /// Close immediately, cancelling a pending open. Returns whether
    /// anything actually changed.
    pub fn close(&mut self) -> bool {
        let was_live = self.mounted || self.pending_open.is_some();
        self.mounted = false;
        self.pending_open = None;
        self.grid = None;
        was_live
    }

    /// Advance the debounce. Returns `true` on the call where the popup
    /// becomes mounted.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(requested) = self.pending_open else {
            return false;
        };
        if now.duration_since(requested) < self.mount_delay {
            return false;
        }
        self.pending_open = None;
        self.mounted = true;
        true
    }

    /// Whether the popup is currently mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether an open has been requested but not yet matured.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending_open.is_some()
    }

    /// Apply a finished grid rebuild. `is_current` is the request-token
    /// check made by the caller; a stale layout is dropped.
    pub fn apply_grid(&mut self, layout: GridLayout, is_current: bool) -> bool {
        if !is_current {
            debug!(category = %layout.category, "dropping stale grid rebuild");
            return false;
        }
        if !self.mounted {
            return false;
        }
        self.grid = Some(layout);
        true
    }

    /// The currently displayed grid, if any.
    #[must_use]
    pub fn grid(&self) -> Option<&GridLayout> {
        self.grid.as_ref()
    }
}
