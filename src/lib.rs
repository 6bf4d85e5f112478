//! rowview - virtualized row grid for the web
//!
//! Windows and recycles rows of a conceptually infinite grid in the
//! browser via WebAssembly and the DOM:
//! - Materializes only the rows near the visible area
//! - Recycles detached row containers instead of recreating them
//! - Per-update cost bounded by window size, never dataset size
//! - Monotone scrollable extent so the user can keep scrolling
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'rowview';
//! await init();
//! const view = new GridView({ rowHeight: 30, preloadRows: 5 });
//! view.setDataSource(4, (row, col) => `R${row}C${col}`);
//! view.attachTo(container, statusBar);
//! ```

// Core windowing engine (target independent)
pub mod config;
pub mod error;
pub mod layout;
pub mod source;
pub mod surface;
pub mod window;

// Browser glue (DOM viewer)
pub mod viewer;

use wasm_bindgen::prelude::*;

// Re-export the main viewer struct
#[cfg(target_arch = "wasm32")]
pub use viewer::GridView;

pub use config::{GridConfig, GridOptions};
pub use error::{GridError, Result};
pub use layout::{RowRange, Viewport};
pub use source::DataSource;
pub use surface::{RowSurface, SimSurface, SurfaceMetrics};
pub use window::{
    CellFailure, ExtentSentinel, RowPool, RowWindowManager, UpdateOps, WindowMetrics,
};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
