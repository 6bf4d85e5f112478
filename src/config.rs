//! Grid configuration.
//!
//! All pixel geometry derives from a handful of constants fixed at
//! construction: row height, column width, border width, the preload
//! margin, and the sentinel lookahead. Rows are uniform; a row's full
//! vertical extent is its height plus one border.

use serde::Deserialize;

use crate::error::{GridError, Result};

/// Default row height in pixels (excluding the border).
pub const DEFAULT_ROW_HEIGHT: f64 = 30.0;

/// Default column width in pixels.
pub const DEFAULT_COLUMN_WIDTH: f64 = 120.0;

/// Default row border width in pixels.
pub const DEFAULT_BORDER_WIDTH: f64 = 1.0;

/// Default number of rows materialized beyond each viewport edge.
pub const DEFAULT_PRELOAD_ROWS: u64 = 5;

/// Default number of rows the scrollable extent stays ahead of the last
/// materialized row.
pub const DEFAULT_SENTINEL_LOOKAHEAD: u64 = 5;

/// Fixed geometry and tuning for one grid view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Row height in pixels, excluding the border.
    pub row_height: f64,
    /// Column width in pixels.
    pub column_width: f64,
    /// Row separator width in pixels.
    pub border_width: f64,
    /// Rows materialized beyond each viewport edge.
    pub preload_rows: u64,
    /// Rows the scrollable extent stays ahead of the last materialized row.
    pub sentinel_lookahead: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            column_width: DEFAULT_COLUMN_WIDTH,
            border_width: DEFAULT_BORDER_WIDTH,
            preload_rows: DEFAULT_PRELOAD_ROWS,
            sentinel_lookahead: DEFAULT_SENTINEL_LOOKAHEAD,
        }
    }
}

impl GridConfig {
    /// Full vertical extent of one row: height plus border.
    pub fn row_extent(&self) -> f64 {
        self.row_height + self.border_width
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `GridError::Config` if the row extent is not strictly
    /// positive or any pixel dimension is negative or non-finite.
    pub fn validate(&self) -> Result<()> {
        if !self.row_height.is_finite()
            || !self.column_width.is_finite()
            || !self.border_width.is_finite()
        {
            return Err(GridError::Config("dimensions must be finite".into()));
        }
        if self.row_height < 0.0 || self.column_width < 0.0 || self.border_width < 0.0 {
            return Err(GridError::Config("dimensions must be non-negative".into()));
        }
        if self.row_extent() <= 0.0 {
            return Err(GridError::Config(
                "row extent (row_height + border_width) must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// JavaScript-facing options mirror of [`GridConfig`].
///
/// Every field is optional; omitted fields fall back to the defaults
/// above. Deserialized from a plain JS object via `serde-wasm-bindgen`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Row height in pixels.
    pub row_height: Option<f64>,
    /// Column width in pixels.
    pub column_width: Option<f64>,
    /// Border width in pixels.
    pub border_width: Option<f64>,
    /// Preload margin in rows.
    pub preload_rows: Option<u64>,
    /// Sentinel lookahead in rows.
    pub sentinel_lookahead: Option<u64>,
}

impl GridOptions {
    /// Resolve options against the defaults and validate the result.
    ///
    /// # Errors
    /// Returns `GridError::Config` for invalid dimensions.
    pub fn resolve(&self) -> Result<GridConfig> {
        let defaults = GridConfig::default();
        let config = GridConfig {
            row_height: self.row_height.unwrap_or(defaults.row_height),
            column_width: self.column_width.unwrap_or(defaults.column_width),
            border_width: self.border_width.unwrap_or(defaults.border_width),
            preload_rows: self.preload_rows.unwrap_or(defaults.preload_rows),
            sentinel_lookahead: self
                .sentinel_lookahead
                .unwrap_or(defaults.sentinel_lookahead),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extent() {
        let config = GridConfig::default();
        assert_eq!(config.row_extent(), DEFAULT_ROW_HEIGHT + DEFAULT_BORDER_WIDTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_extent_rejected() {
        let config = GridConfig {
            row_height: 0.0,
            border_width: 0.0,
            ..GridConfig::default()
        };
        assert!(matches!(config.validate(), Err(GridError::Config(_))));
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let config = GridConfig {
            column_width: -1.0,
            ..GridConfig::default()
        };
        assert!(matches!(config.validate(), Err(GridError::Config(_))));
    }

    #[test]
    fn test_options_resolve_defaults() {
        let options = GridOptions::default();
        let config = options.resolve().unwrap();
        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn test_options_resolve_overrides() {
        let options = GridOptions {
            row_height: Some(24.0),
            preload_rows: Some(10),
            ..GridOptions::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.row_height, 24.0);
        assert_eq!(config.preload_rows, 10);
        assert_eq!(config.border_width, DEFAULT_BORDER_WIDTH);
    }
}
