//! Viewport-to-row-range geometry.
//!
//! Pure functions: the viewport is a pixel interval supplied by the
//! rendering surface, and rows are uniform, so row lookup is integer
//! division rather than a search over cumulative positions.

use crate::surface::SurfaceMetrics;

/// The pixel range of the scroll container's content currently visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Top edge offset within the scrollable content, in pixels.
    pub top: f64,
    /// Bottom edge offset within the scrollable content, in pixels.
    pub bottom: f64,
}

impl Viewport {
    /// Project current surface scroll metrics into a viewport.
    ///
    /// No caching; call once per frame.
    pub fn from_metrics(metrics: &SurfaceMetrics) -> Self {
        Self {
            top: metrics.scroll_top,
            bottom: metrics.scroll_top + metrics.viewport_height,
        }
    }

    /// Rows whose extent intersects this viewport (inclusive).
    ///
    /// Scroll offsets are source-guaranteed non-negative; the clamp below
    /// only guards float noise near zero.
    pub fn visible_row_range(&self, row_extent: f64) -> RowRange {
        let first = (self.top / row_extent).floor().max(0.0) as u64;
        let last = (self.bottom / row_extent).floor().max(0.0) as u64;
        RowRange { first, last }
    }
}

/// A contiguous, inclusive range of row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// First row in the range.
    pub first: u64,
    /// Last row in the range (inclusive).
    pub last: u64,
}

impl RowRange {
    /// Expand by `margin` rows on both sides, clamped to the row axis.
    pub fn expand(&self, margin: u64) -> RowRange {
        RowRange {
            first: self.first.saturating_sub(margin),
            last: self.last.saturating_add(margin),
        }
    }

    /// Whether `row` lies inside this range.
    pub fn contains(&self, row: u64) -> bool {
        row >= self.first && row <= self.last
    }

    /// Number of rows in the range.
    pub fn len(&self) -> u64 {
        self.last.saturating_sub(self.first) + 1
    }

    /// Ranges are never empty by construction; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }
}
