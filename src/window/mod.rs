//! Row window management: the windowing-and-recycling engine.
//!
//! This module provides:
//! - The window diff algorithm transitioning the materialized row set
//! - The per-manager recycling pool for detached row containers
//! - The monotone extent sentinel controller
//!
//! The manager is generic over the rendering surface and never touches a
//! concrete one directly; all mutation goes through [`RowSurface`]
//! primitives.

pub mod pool;
pub mod sentinel;

pub use pool::RowPool;
pub use sentinel::ExtentSentinel;

use std::collections::HashMap;

use serde::Serialize;

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::layout::{RowRange, Viewport};
use crate::source::DataSource;
use crate::surface::RowSurface;

/// One cell the data source failed to produce during an update.
#[derive(Debug, Clone, Serialize)]
pub struct CellFailure {
    /// Row index of the failed cell.
    pub row: u64,
    /// Column index of the failed cell.
    pub col: usize,
    /// Failure description from the data source.
    pub message: String,
}

/// Operations performed by one `update` call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateOps {
    /// Rows that entered the window and were materialized.
    pub materialized: u32,
    /// Rows that left the window and were released to the pool.
    pub dematerialized: u32,
    /// Row containers constructed from scratch (pool was empty).
    pub constructed: u32,
    /// Row containers reused from the pool.
    pub reused: u32,
    /// Cells the data source failed to produce; each recorded once.
    pub failures: Vec<CellFailure>,
}

impl UpdateOps {
    /// Whether the update changed nothing on the surface.
    pub fn is_noop(&self) -> bool {
        self.materialized == 0 && self.dematerialized == 0
    }
}

/// Snapshot of the manager's state, serialized for status readouts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WindowMetrics {
    /// First materialized row, if any.
    pub first_rendered: Option<u64>,
    /// Last materialized row, if any.
    pub last_rendered: Option<u64>,
    /// Rows currently materialized.
    pub materialized_rows: usize,
    /// Handles sitting in the recycling pool.
    pub pooled_rows: usize,
    /// Row containers constructed since creation.
    pub total_constructed: u64,
    /// Furthest row the scrollable extent accommodates.
    pub sentinel_row: u64,
    /// Update calls performed via `render`.
    pub frames: u64,
    /// Cumulative cell failures across all updates.
    pub cell_failures: u64,
}

/// Orchestrator for the materialized row window.
///
/// Holds the current window bounds, the sparse row-to-container slot map,
/// the recycling pool, and the extent sentinel. On each update it diffs
/// the current window against the target window and issues the minimal
/// set of materialize/dematerialize operations.
pub struct RowWindowManager<S: RowSurface> {
    config: GridConfig,
    columns: usize,
    /// Materialized window; `None` until the first update.
    window: Option<RowRange>,
    /// Handles for materialized rows, keyed only by rows currently in the
    /// window. Entries are removed (not nulled) on dematerialization so
    /// capacity tracks window size, never the furthest row visited.
    slots: HashMap<u64, S::Handle>,
    pool: RowPool<S::Handle>,
    sentinel: ExtentSentinel,
    total_constructed: u64,
    frames: u64,
    total_failures: u64,
}

impl<S: RowSurface> RowWindowManager<S> {
    /// Create a manager for a grid with `columns` cells per row.
    ///
    /// The column count is fixed for the manager's lifetime; pooled
    /// containers are built with exactly this many cell slots and are
    /// reused without revalidation.
    ///
    /// # Errors
    /// Returns `GridError::Config` for an invalid configuration or a zero
    /// column count.
    pub fn new(config: GridConfig, columns: usize) -> Result<Self> {
        config.validate()?;
        if columns == 0 {
            return Err(GridError::Config("column count must be positive".into()));
        }
        let sentinel = ExtentSentinel::new(config.sentinel_lookahead, config.row_extent());
        Ok(Self {
            config,
            columns,
            window: None,
            slots: HashMap::new(),
            pool: RowPool::new(),
            sentinel,
            total_constructed: 0,
            frames: 0,
            total_failures: 0,
        })
    }

    /// The fixed configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Cells per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The currently materialized window, if any.
    pub fn window(&self) -> Option<RowRange> {
        self.window
    }

    /// Handles currently sitting in the recycling pool.
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    /// Snapshot the manager's state for a status readout.
    pub fn metrics(&self) -> WindowMetrics {
        WindowMetrics {
            first_rendered: self.window.map(|w| w.first),
            last_rendered: self.window.map(|w| w.last),
            materialized_rows: self.slots.len(),
            pooled_rows: self.pool.len(),
            total_constructed: self.total_constructed,
            sentinel_row: self.sentinel.position(),
            frames: self.frames,
            cell_failures: self.total_failures,
        }
    }

    /// One frame: derive the target window from current surface metrics
    /// and transition to it.
    ///
    /// # Errors
    /// Propagates fatal surface failures; cell-level data failures are
    /// reported in the returned ops instead.
    pub fn render<D: DataSource>(&mut self, surface: &mut S, source: &D) -> Result<UpdateOps> {
        let metrics = surface.metrics()?;
        let viewport = Viewport::from_metrics(&metrics);
        let target = viewport
            .visible_row_range(self.config.row_extent())
            .expand(self.config.preload_rows);
        self.frames += 1;
        self.update(surface, source, target)
    }

    /// Transition the materialized set from the current window to
    /// `target`, reusing handles for rows present in both and recycling
    /// handles for rows that leave.
    ///
    /// Rows leaving the window are released first so that rows entering
    /// it can reuse their containers within the same update, whichever
    /// direction the scroll moved. Work is proportional to the two
    /// window sizes, never to dataset size or jump distance, and the
    /// operations issued equal exactly the symmetric difference of the
    /// windows.
    ///
    /// # Errors
    /// Propagates fatal surface failures. A data-source failure for one
    /// cell blanks that cell and is recorded once in the returned ops
    /// without aborting the rest of the update.
    pub fn update<D: DataSource>(
        &mut self,
        surface: &mut S,
        source: &D,
        target: RowRange,
    ) -> Result<UpdateOps> {
        let mut ops = UpdateOps::default();

        // Pass 1: release rows leaving the window. The initial empty
        // window contributes nothing.
        if let Some(current) = self.window {
            for row in current.first..=current.last {
                if !target.contains(row) {
                    if let Some(handle) = self.slots.remove(&row) {
                        surface.detach_row(&handle)?;
                        self.pool.release(handle);
                        ops.dematerialized += 1;
                    }
                }
            }
        }

        // Pass 2: materialize rows entering the window, pool first.
        for row in target.first..=target.last {
            if !self.slots.contains_key(&row) {
                self.materialize(surface, source, row, &mut ops)?;
            }
        }

        self.window = Some(target);
        self.sentinel.notify(surface, target.last)?;
        self.total_failures += ops.failures.len() as u64;
        Ok(ops)
    }

    /// Tear down: detach every materialized container and drop both the
    /// slot map contents and the pooled handles. The window resets to the
    /// initial empty state; the sentinel keeps its position.
    ///
    /// # Errors
    /// Propagates surface failures from detaching.
    pub fn clear(&mut self, surface: &mut S) -> Result<()> {
        for (_, handle) in self.slots.drain() {
            surface.detach_row(&handle)?;
        }
        self.pool.drain().for_each(drop);
        self.window = None;
        Ok(())
    }

    /// Materialize one row: acquire a container (pool first, else
    /// construct), position it, fill its cells, attach it, record it.
    fn materialize<D: DataSource>(
        &mut self,
        surface: &mut S,
        source: &D,
        row: u64,
        ops: &mut UpdateOps,
    ) -> Result<()> {
        let handle = match self.pool.acquire() {
            Some(handle) => {
                ops.reused += 1;
                handle
            }
            None => {
                let handle = surface.create_row(self.columns)?;
                ops.constructed += 1;
                self.total_constructed += 1;
                handle
            }
        };

        surface.set_row_offset(&handle, row as f64 * self.config.row_extent())?;
        self.fill_row(surface, source, &handle, row, ops)?;
        surface.attach_row(&handle)?;
        self.slots.insert(row, handle);
        ops.materialized += 1;
        Ok(())
    }

    /// Fill every cell of a positioned row from the data source.
    fn fill_row<D: DataSource>(
        &self,
        surface: &mut S,
        source: &D,
        handle: &S::Handle,
        row: u64,
        ops: &mut UpdateOps,
    ) -> Result<()> {
        for col in 0..self.columns {
            match source.get_item(row, col) {
                Ok(text) => surface.set_cell_text(handle, col, &text)?,
                Err(e) => {
                    // A pooled container may carry stale text in this slot.
                    surface.clear_cell(handle, col)?;
                    ops.failures.push(CellFailure {
                        row,
                        col,
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::surface::SimSurface;

    struct LabelSource {
        columns: usize,
    }

    impl DataSource for LabelSource {
        fn number_of_columns(&self) -> usize {
            self.columns
        }

        fn get_item(&self, row: u64, col: usize) -> Result<String> {
            Ok(format!("{row}:{col}"))
        }
    }

    fn manager(surface_columns: usize) -> RowWindowManager<SimSurface> {
        RowWindowManager::new(GridConfig::default(), surface_columns).unwrap()
    }

    #[test]
    fn test_zero_columns_rejected() {
        assert!(matches!(
            RowWindowManager::<SimSurface>::new(GridConfig::default(), 0),
            Err(GridError::Config(_))
        ));
    }

    #[test]
    fn test_first_update_materializes_target() {
        let mut surface = SimSurface::new(300.0);
        let source = LabelSource { columns: 3 };
        let mut mgr = manager(3);

        let ops = mgr
            .update(&mut surface, &source, RowRange { first: 0, last: 9 })
            .unwrap();
        assert_eq!(ops.materialized, 10);
        assert_eq!(ops.constructed, 10);
        assert_eq!(ops.dematerialized, 0);
        assert_eq!(mgr.window(), Some(RowRange { first: 0, last: 9 }));
        assert_eq!(surface.attached_count(), 10);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut surface = SimSurface::new(300.0);
        let source = LabelSource { columns: 2 };
        let mut mgr = manager(2);
        let target = RowRange { first: 5, last: 14 };

        mgr.update(&mut surface, &source, target).unwrap();
        let ops = mgr.update(&mut surface, &source, target).unwrap();
        assert!(ops.is_noop());
        assert!(ops.failures.is_empty());
    }

    #[test]
    fn test_disjoint_jump_recycles_everything() {
        let mut surface = SimSurface::new(300.0);
        let source = LabelSource { columns: 1 };
        let mut mgr = manager(1);

        mgr.update(&mut surface, &source, RowRange { first: 0, last: 9 })
            .unwrap();
        let ops = mgr
            .update(
                &mut surface,
                &source,
                RowRange {
                    first: 100,
                    last: 109,
                },
            )
            .unwrap();
        assert_eq!(ops.dematerialized, 10);
        assert_eq!(ops.materialized, 10);
        assert_eq!(ops.reused, 10);
        assert_eq!(ops.constructed, 0);
        assert_eq!(mgr.pooled(), 0);
    }

    #[test]
    fn test_slot_map_tracks_window_only() {
        let mut surface = SimSurface::new(300.0);
        let source = LabelSource { columns: 1 };
        let mut mgr = manager(1);

        mgr.update(
            &mut surface,
            &source,
            RowRange {
                first: 1000,
                last: 1009,
            },
        )
        .unwrap();
        let metrics = mgr.metrics();
        assert_eq!(metrics.materialized_rows, 10);
        assert_eq!(metrics.first_rendered, Some(1000));
        assert_eq!(metrics.last_rendered, Some(1009));
    }

    #[test]
    fn test_clear_resets_window_and_pool() {
        let mut surface = SimSurface::new(300.0);
        let source = LabelSource { columns: 1 };
        let mut mgr = manager(1);

        mgr.update(&mut surface, &source, RowRange { first: 0, last: 9 })
            .unwrap();
        mgr.update(&mut surface, &source, RowRange { first: 3, last: 7 })
            .unwrap();
        assert!(mgr.pooled() > 0);

        mgr.clear(&mut surface).unwrap();
        assert_eq!(mgr.window(), None);
        assert_eq!(mgr.pooled(), 0);
        assert_eq!(surface.attached_count(), 0);
    }

    #[test]
    fn test_render_derives_target_from_metrics() {
        // 150px viewport over 31px rows: visible {0,4}, preload 5 -> {0,9}.
        let mut surface = SimSurface::new(150.0);
        let source = LabelSource { columns: 2 };
        let mut mgr = manager(2);

        let ops = mgr.render(&mut surface, &source).unwrap();
        assert_eq!(ops.materialized, 10);
        assert_eq!(mgr.window(), Some(RowRange { first: 0, last: 9 }));
        assert_eq!(mgr.metrics().frames, 1);
    }
}
