//! DOM rendering surface (wasm32).
//!
//! Row containers are absolutely positioned divs inside the bound scroll
//! container, offset with a CSS transform so repositioning never triggers
//! layout recomputation proportional to row count. The extent marker is a
//! hidden 1x1 div whose `top` offset forces the container's measured
//! scroll extent.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlDivElement, HtmlElement};

use js_sys::Reflect;

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::surface::{RowSurface, SurfaceMetrics};

/// Border color for row separators.
const BORDER_COLOR: &str = "#E0E0E0";

/// Fractional scroll offset of a container.
///
/// `scrollTop` is fractional on zoomed/high-DPI pages; the typed getter
/// truncates to integer, so read the raw property first.
fn scroll_top_f64(element: &HtmlElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_top()))
}

/// A materialized DOM row: the container div plus its fixed cell slots.
pub struct DomRow {
    element: HtmlDivElement,
    cells: Vec<HtmlDivElement>,
}

/// [`RowSurface`] over a scrollable DOM container.
pub struct DomSurface {
    document: Document,
    container: HtmlElement,
    sentinel: HtmlDivElement,
    config: GridConfig,
}

impl DomSurface {
    /// Bind to a scroll container that is part of the document.
    ///
    /// Sets `position: relative` and `overflow-y: auto` on the container
    /// if not already styled, and inserts the hidden extent marker.
    ///
    /// # Errors
    /// Returns a surface error if the container has no owner document or
    /// element creation fails.
    pub fn new(container: HtmlElement, config: GridConfig) -> Result<Self> {
        let document = container
            .owner_document()
            .ok_or_else(|| GridError::Surface("container has no owner document".into()))?;

        let container_style = container.style();
        if container_style
            .get_property_value("position")
            .unwrap_or_default()
            .is_empty()
        {
            let _ = container_style.set_property("position", "relative");
        }
        if container_style
            .get_property_value("overflow-y")
            .unwrap_or_default()
            .is_empty()
        {
            let _ = container_style.set_property("overflow-y", "auto");
        }

        let sentinel = create_div(&document)?;
        let sentinel_style = sentinel.style();
        let _ = sentinel_style.set_property("position", "absolute");
        let _ = sentinel_style.set_property("top", "0");
        let _ = sentinel_style.set_property("left", "0");
        let _ = sentinel_style.set_property("width", "1px");
        let _ = sentinel_style.set_property("height", "1px");
        let _ = sentinel_style.set_property("visibility", "hidden");
        container
            .append_child(&sentinel)
            .map_err(|_| GridError::Surface("failed to insert extent marker".into()))?;

        Ok(Self {
            document,
            container,
            sentinel,
            config,
        })
    }

    /// The bound scroll container.
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Remove the extent marker from the container (teardown). Row
    /// containers are removed separately by the window manager.
    pub fn teardown(&mut self) {
        self.sentinel.remove();
    }

    fn check_connected(&self) -> Result<()> {
        if !self.container.is_connected() {
            return Err(GridError::SurfaceDetached);
        }
        Ok(())
    }
}

fn create_div(document: &Document) -> Result<HtmlDivElement> {
    document
        .create_element("div")
        .map_err(|_| GridError::Surface("failed to create div".into()))?
        .dyn_into::<HtmlDivElement>()
        .map_err(|_| GridError::Surface("created element is not a div".into()))
}

impl RowSurface for DomSurface {
    type Handle = DomRow;

    fn create_row(&mut self, columns: usize) -> Result<Self::Handle> {
        let element = create_div(&self.document)?;
        let row_width = self.config.column_width * columns as f64;

        let style = element.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("top", "0");
        let _ = style.set_property("left", "0");
        let _ = style.set_property("width", &format!("{row_width}px"));
        let _ = style.set_property("height", &format!("{}px", self.config.row_height));
        let _ = style.set_property(
            "border-bottom",
            &format!("{}px solid {BORDER_COLOR}", self.config.border_width),
        );
        // Promote to own compositor layer so transform updates are cheap.
        let _ = style.set_property("will-change", "transform");

        let mut cells = Vec::with_capacity(columns);
        for col in 0..columns {
            let cell = create_div(&self.document)?;
            let cell_style = cell.style();
            let _ = cell_style.set_property("position", "absolute");
            let _ = cell_style.set_property("top", "0");
            let _ = cell_style.set_property(
                "left",
                &format!("{}px", self.config.column_width * col as f64),
            );
            let _ = cell_style.set_property("width", &format!("{}px", self.config.column_width));
            let _ = cell_style.set_property("height", "100%");
            let _ = cell_style.set_property("overflow", "hidden");
            let _ = cell_style.set_property("white-space", "nowrap");
            let _ = cell_style.set_property("text-overflow", "ellipsis");
            element
                .append_child(&cell)
                .map_err(|_| GridError::Surface("failed to append cell slot".into()))?;
            cells.push(cell);
        }

        Ok(DomRow { element, cells })
    }

    fn attach_row(&mut self, handle: &Self::Handle) -> Result<()> {
        self.check_connected()?;
        self.container
            .append_child(&handle.element)
            .map_err(|_| GridError::Surface("failed to attach row container".into()))?;
        Ok(())
    }

    fn detach_row(&mut self, handle: &Self::Handle) -> Result<()> {
        handle.element.remove();
        Ok(())
    }

    fn set_row_offset(&mut self, handle: &Self::Handle, y_px: f64) -> Result<()> {
        let _ = handle
            .element
            .style()
            .set_property("transform", &format!("translateY({y_px}px)"));
        Ok(())
    }

    fn set_cell_text(&mut self, handle: &Self::Handle, col: usize, text: &str) -> Result<()> {
        let cell = handle
            .cells
            .get(col)
            .ok_or_else(|| GridError::Surface(format!("cell slot {col} out of range")))?;
        cell.set_text_content(Some(text));
        Ok(())
    }

    fn clear_cell(&mut self, handle: &Self::Handle, col: usize) -> Result<()> {
        let cell = handle
            .cells
            .get(col)
            .ok_or_else(|| GridError::Surface(format!("cell slot {col} out of range")))?;
        cell.set_text_content(None);
        Ok(())
    }

    fn metrics(&self) -> Result<SurfaceMetrics> {
        self.check_connected()?;
        Ok(SurfaceMetrics {
            scroll_top: scroll_top_f64(&self.container),
            viewport_height: f64::from(self.container.client_height()),
        })
    }

    fn set_extent_marker(&mut self, y_px: f64) -> Result<()> {
        self.check_connected()?;
        let _ = self
            .sentinel
            .style()
            .set_property("top", &format!("{y_px}px"));
        Ok(())
    }
}
