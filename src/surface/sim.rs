//! Simulated in-memory rendering surface.
//!
//! Stands in for the DOM on native targets: integration tests, the CLI,
//! and benches drive the windowing core against it. Every primitive is
//! counted so tests can assert the exact operation cost of an update, and
//! the container can be "disconnected" to exercise the fatal surface-loss
//! path.

use crate::error::{GridError, Result};
use crate::surface::{RowSurface, SurfaceMetrics};

/// Handle to a simulated row container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimHandle(usize);

/// State of one simulated row container.
#[derive(Debug, Clone)]
pub struct SimRow {
    /// Whether the row is currently attached to the surface.
    pub attached: bool,
    /// Vertical offset applied via the positional transform, in pixels.
    pub offset: f64,
    /// Cell contents; `None` means blank.
    pub cells: Vec<Option<String>>,
}

/// Cumulative primitive-operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimCounters {
    /// Row containers constructed from scratch.
    pub created: u64,
    /// Attach operations.
    pub attached: u64,
    /// Detach operations.
    pub detached: u64,
    /// Offset repositions.
    pub positioned: u64,
    /// Cell text writes.
    pub cells_set: u64,
    /// Cell blanks.
    pub cells_cleared: u64,
}

/// In-memory [`RowSurface`] implementation.
#[derive(Debug, Default)]
pub struct SimSurface {
    scroll_top: f64,
    viewport_height: f64,
    rows: Vec<SimRow>,
    extent_marker: Option<f64>,
    counters: SimCounters,
    lost: bool,
}

impl SimSurface {
    /// Create a surface with the given visible height, scrolled to the top.
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    /// Set the scroll offset (simulates the user scrolling).
    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top;
    }

    /// Resize the visible height.
    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
    }

    /// Simulate external removal of the container. Every subsequent
    /// primitive fails with `GridError::SurfaceDetached`.
    pub fn disconnect(&mut self) {
        self.lost = true;
    }

    /// Inspect one row container.
    pub fn row(&self, handle: &SimHandle) -> &SimRow {
        &self.rows[handle.0]
    }

    /// Number of currently attached row containers.
    pub fn attached_count(&self) -> usize {
        self.rows.iter().filter(|r| r.attached).count()
    }

    /// Offsets of currently attached rows, sorted ascending.
    pub fn attached_offsets(&self) -> Vec<f64> {
        let mut offsets: Vec<f64> = self
            .rows
            .iter()
            .filter(|r| r.attached)
            .map(|r| r.offset)
            .collect();
        offsets.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        offsets
    }

    /// Current extent-marker offset, if one was ever placed.
    pub fn extent_marker(&self) -> Option<f64> {
        self.extent_marker
    }

    /// Cumulative operation counters.
    pub fn counters(&self) -> SimCounters {
        self.counters
    }

    fn check_connected(&self) -> Result<()> {
        if self.lost {
            return Err(GridError::SurfaceDetached);
        }
        Ok(())
    }

    fn row_mut(&mut self, handle: &SimHandle) -> Result<&mut SimRow> {
        self.rows
            .get_mut(handle.0)
            .ok_or_else(|| GridError::Surface(format!("unknown row handle {}", handle.0)))
    }
}

impl RowSurface for SimSurface {
    type Handle = SimHandle;

    fn create_row(&mut self, columns: usize) -> Result<Self::Handle> {
        self.check_connected()?;
        self.rows.push(SimRow {
            attached: false,
            offset: 0.0,
            cells: vec![None; columns],
        });
        self.counters.created += 1;
        Ok(SimHandle(self.rows.len() - 1))
    }

    fn attach_row(&mut self, handle: &Self::Handle) -> Result<()> {
        self.check_connected()?;
        self.row_mut(handle)?.attached = true;
        self.counters.attached += 1;
        Ok(())
    }

    fn detach_row(&mut self, handle: &Self::Handle) -> Result<()> {
        self.check_connected()?;
        self.row_mut(handle)?.attached = false;
        self.counters.detached += 1;
        Ok(())
    }

    fn set_row_offset(&mut self, handle: &Self::Handle, y_px: f64) -> Result<()> {
        self.check_connected()?;
        self.row_mut(handle)?.offset = y_px;
        self.counters.positioned += 1;
        Ok(())
    }

    fn set_cell_text(&mut self, handle: &Self::Handle, col: usize, text: &str) -> Result<()> {
        self.check_connected()?;
        let cell = self
            .row_mut(handle)?
            .cells
            .get_mut(col)
            .ok_or_else(|| GridError::Surface(format!("cell slot {col} out of range")))?;
        *cell = Some(text.to_string());
        self.counters.cells_set += 1;
        Ok(())
    }

    fn clear_cell(&mut self, handle: &Self::Handle, col: usize) -> Result<()> {
        self.check_connected()?;
        let cell = self
            .row_mut(handle)?
            .cells
            .get_mut(col)
            .ok_or_else(|| GridError::Surface(format!("cell slot {col} out of range")))?;
        *cell = None;
        self.counters.cells_cleared += 1;
        Ok(())
    }

    fn metrics(&self) -> Result<SurfaceMetrics> {
        self.check_connected()?;
        Ok(SurfaceMetrics {
            scroll_top: self.scroll_top,
            viewport_height: self.viewport_height,
        })
    }

    fn set_extent_marker(&mut self, y_px: f64) -> Result<()> {
        self.check_connected()?;
        self.extent_marker = Some(y_px);
        Ok(())
    }
}
