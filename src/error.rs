//! Structured error types for rowview.
//!
//! The failure surface of the windowing core is narrow: a data source may
//! fail to produce one cell, or the rendering surface may go away under us.
//! Cell failures are recoverable and reported per update; surface failures
//! are fatal for the manager instance.

/// All errors that can occur while windowing and rendering rows.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The data source failed to produce a value for one cell.
    ///
    /// Recoverable: the affected cell is blanked and the update continues.
    #[error("Cell ({row}, {col}): {message}")]
    Cell {
        /// Row index of the failed cell.
        row: u64,
        /// Column index of the failed cell.
        col: usize,
        /// Data-source failure description.
        message: String,
    },

    /// The bound scroll container left the document mid-update.
    ///
    /// Fatal for this manager instance; a fresh instance is required.
    #[error("Rendering surface detached from the document")]
    SurfaceDetached,

    /// A rendering-surface primitive failed.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Invalid configuration rejected at construction.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
