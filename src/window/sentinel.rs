//! Extent sentinel controller.
//!
//! The scroll container reports an extent derived from its content; with
//! only the windowed rows attached, the browser would clamp scrolling at
//! the bottom of the materialized window. A minimal absolutely-positioned
//! marker is kept `lookahead` rows ahead of the last materialized row so
//! the user can always scroll into not-yet-materialized territory. The
//! marker only ever moves down; shrinking the extent would visibly snap
//! the scroll position.

use crate::error::Result;
use crate::surface::RowSurface;

/// Monotone controller for the scrollable-extent marker.
#[derive(Debug)]
pub struct ExtentSentinel {
    lookahead: u64,
    row_extent: f64,
    /// Furthest row the extent has been stretched to accommodate.
    position: u64,
}

impl ExtentSentinel {
    /// Create a controller with the given lookahead (rows) and row extent
    /// (pixels per row including border).
    pub fn new(lookahead: u64, row_extent: f64) -> Self {
        Self {
            lookahead,
            row_extent,
            position: 0,
        }
    }

    /// Furthest row the extent currently accommodates.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Stretch the extent to stay `lookahead` rows ahead of
    /// `last_rendered`, if that would grow it; otherwise a no-op.
    ///
    /// # Errors
    /// Propagates surface failures from moving the marker.
    pub fn notify<S: RowSurface>(&mut self, surface: &mut S, last_rendered: u64) -> Result<()> {
        let candidate = last_rendered.saturating_add(self.lookahead);
        if candidate > self.position {
            surface.set_extent_marker(candidate as f64 * self.row_extent)?;
            self.position = candidate;
        }
        Ok(())
    }
}
