//! Window diff and recycling tests
//!
//! Tests for verifying the materialize/dematerialize diff, pool reuse,
//! bounded operation cost, and sentinel monotonicity against the
//! simulated surface.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use rowview::{
    DataSource, GridConfig, Result, RowRange, RowWindowManager, SimSurface,
};

/// Row extent used throughout: 30px row + 1px border.
const EXTENT: f64 = 31.0;

struct LabelSource {
    columns: usize,
}

impl DataSource for LabelSource {
    fn number_of_columns(&self) -> usize {
        self.columns
    }

    fn get_item(&self, row: u64, col: usize) -> Result<String> {
        Ok(format!("R{row}C{col}"))
    }
}

fn test_config() -> GridConfig {
    GridConfig {
        row_height: 30.0,
        column_width: 120.0,
        border_width: 1.0,
        preload_rows: 5,
        sentinel_lookahead: 5,
    }
}

fn setup(columns: usize) -> (SimSurface, LabelSource, RowWindowManager<SimSurface>) {
    let surface = SimSurface::new(150.0);
    let source = LabelSource { columns };
    let manager = RowWindowManager::new(test_config(), columns).unwrap();
    (surface, source, manager)
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_scenario_a_initial_render() {
    // Viewport {0,150} -> visible {0,4} -> target {0,9} after preload.
    let (mut surface, source, mut manager) = setup(3);

    let ops = manager.render(&mut surface, &source).unwrap();
    assert_eq!(manager.window(), Some(RowRange { first: 0, last: 9 }));
    assert_eq!(ops.materialized, 10);
    assert_eq!(ops.constructed, 10, "Empty pool: all rows built fresh");
    assert_eq!(surface.attached_count(), 10);
}

#[test]
fn test_scenario_b_scroll_down_recycles() {
    let (mut surface, source, mut manager) = setup(3);
    manager
        .update(&mut surface, &source, RowRange { first: 0, last: 9 })
        .unwrap();

    let ops = manager
        .update(&mut surface, &source, RowRange { first: 5, last: 14 })
        .unwrap();
    assert_eq!(ops.dematerialized, 5, "Rows 0-4 released");
    assert_eq!(ops.materialized, 5, "Rows 10-14 materialized");
    assert_eq!(ops.reused, 5, "All five came from the pool");
    assert_eq!(ops.constructed, 0);
    assert_eq!(manager.pooled(), 0);

    // Rows 5-14 attached at their own offsets; rows 5-9 untouched.
    let expected: Vec<f64> = (5..=14).map(|r| r as f64 * EXTENT).collect();
    assert_eq!(surface.attached_offsets(), expected);
}

#[test]
fn test_scenario_c_identical_target_is_noop() {
    let (mut surface, source, mut manager) = setup(2);
    let target = RowRange { first: 5, last: 14 };

    manager.update(&mut surface, &source, target).unwrap();
    let before = surface.counters();

    let ops = manager.update(&mut surface, &source, target).unwrap();
    assert!(ops.is_noop());
    let after = surface.counters();
    assert_eq!(before.created, after.created);
    assert_eq!(before.attached, after.attached);
    assert_eq!(before.detached, after.detached);
    assert_eq!(
        before.cells_set, after.cells_set,
        "Reused-in-place rows are not refilled"
    );
}

// =============================================================================
// COVERAGE
// =============================================================================

#[test]
fn test_coverage_across_scroll_positions() {
    let (mut surface, source, mut manager) = setup(1);

    for scroll_rows in [0u64, 3, 10, 100, 57, 0] {
        surface.set_scroll_top(scroll_rows as f64 * EXTENT);
        manager.render(&mut surface, &source).unwrap();

        let visible_last = scroll_rows + (150.0f64 / EXTENT).floor() as u64;
        let expected = RowRange {
            first: scroll_rows.saturating_sub(5),
            last: visible_last + 5,
        };
        assert_eq!(
            manager.window(),
            Some(expected),
            "Window must cover visible range plus margin at row {scroll_rows}"
        );
    }
}

// =============================================================================
// BOUNDED DIFF COST
// =============================================================================

#[test]
fn test_ops_equal_symmetric_difference() {
    let (mut surface, source, mut manager) = setup(1);
    manager
        .update(&mut surface, &source, RowRange { first: 0, last: 9 })
        .unwrap();

    // {0,9} -> {3,12}: rows 0-2 leave, rows 10-12 enter.
    let ops = manager
        .update(&mut surface, &source, RowRange { first: 3, last: 12 })
        .unwrap();
    assert_eq!(ops.dematerialized, 3);
    assert_eq!(ops.materialized, 3);

    // Overlapping shift by one row each side.
    let ops = manager
        .update(&mut surface, &source, RowRange { first: 4, last: 13 })
        .unwrap();
    assert_eq!(ops.dematerialized + ops.materialized, 2);
}

#[test]
fn test_far_jump_ops_bounded_by_window_sizes() {
    let (mut surface, source, mut manager) = setup(1);
    manager
        .update(&mut surface, &source, RowRange { first: 0, last: 9 })
        .unwrap();

    // A jump a billion rows away still performs exactly 10 + 10 ops.
    let ops = manager
        .update(
            &mut surface,
            &source,
            RowRange {
                first: 1_000_000_000,
                last: 1_000_000_009,
            },
        )
        .unwrap();
    assert_eq!(ops.dematerialized, 10);
    assert_eq!(ops.materialized, 10);
    assert_eq!(ops.constructed, 0, "The ten released containers cover it");
}

// =============================================================================
// RECYCLING BOUNDS
// =============================================================================

#[test]
fn test_constructions_bounded_by_peak_window() {
    let (mut surface, source, mut manager) = setup(2);

    // Scroll steadily down for a long run.
    for step in 0..200u64 {
        surface.set_scroll_top(step as f64 * 2.0 * EXTENT);
        manager.render(&mut surface, &source).unwrap();
    }
    let window_len = manager.window().unwrap().len();
    assert_eq!(
        surface.counters().created,
        window_len,
        "Steady downward scrolling reuses containers after the first frame"
    );
}

#[test]
fn test_scroll_back_into_visited_range_constructs_nothing() {
    let (mut surface, source, mut manager) = setup(2);

    for step in 0..50u64 {
        surface.set_scroll_top(step as f64 * 2.0 * EXTENT);
        manager.render(&mut surface, &source).unwrap();
    }
    let built = surface.counters().created;

    // Back up through the visited range, then down again.
    for step in (0..50u64).rev() {
        surface.set_scroll_top(step as f64 * 2.0 * EXTENT);
        manager.render(&mut surface, &source).unwrap();
    }
    for step in 0..50u64 {
        surface.set_scroll_top(step as f64 * 2.0 * EXTENT);
        manager.render(&mut surface, &source).unwrap();
    }
    assert_eq!(
        surface.counters().created,
        built,
        "Revisiting rows must not construct new containers"
    );
}

// =============================================================================
// SENTINEL
// =============================================================================

#[test]
fn test_sentinel_tracks_window_monotonically() {
    let (mut surface, source, mut manager) = setup(1);

    manager
        .update(&mut surface, &source, RowRange { first: 0, last: 9 })
        .unwrap();
    assert_eq!(manager.metrics().sentinel_row, 14);
    assert_eq!(surface.extent_marker(), Some(14.0 * EXTENT));

    manager
        .update(&mut surface, &source, RowRange { first: 90, last: 99 })
        .unwrap();
    assert_eq!(manager.metrics().sentinel_row, 104);

    // Scrolling back up leaves the extent untouched.
    manager
        .update(&mut surface, &source, RowRange { first: 0, last: 9 })
        .unwrap();
    assert_eq!(manager.metrics().sentinel_row, 104);
    assert_eq!(surface.extent_marker(), Some(104.0 * EXTENT));
}

// =============================================================================
// TEARDOWN
// =============================================================================

#[test]
fn test_clear_detaches_everything() {
    let (mut surface, source, mut manager) = setup(2);
    manager
        .update(&mut surface, &source, RowRange { first: 0, last: 9 })
        .unwrap();
    manager
        .update(&mut surface, &source, RowRange { first: 5, last: 14 })
        .unwrap();

    manager.clear(&mut surface).unwrap();
    assert_eq!(surface.attached_count(), 0);
    assert_eq!(manager.window(), None);
    assert_eq!(manager.pooled(), 0);

    // A fresh render after clear starts from scratch.
    let ops = manager.render(&mut surface, &source).unwrap();
    assert_eq!(ops.materialized, 10);
}
