//! Main GridView struct - the primary entry point for the DOM viewer.
//!
//! This module provides the WASM-exported `GridView` struct that handles:
//! - Binding the windowing engine to a scrollable container
//! - Running the cancellable per-frame loop
//! - Refreshing an optional status readout
//! - Forwarding row hover events to an optional observer
//!
//! All algorithmic work lives in [`crate::window`]; this is glue between
//! the browser and the surface-agnostic core.

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use web_sys::{HtmlElement, MouseEvent};

#[cfg(target_arch = "wasm32")]
use crate::config::{GridConfig, GridOptions};
#[cfg(target_arch = "wasm32")]
use crate::error::{GridError, Result};
#[cfg(target_arch = "wasm32")]
use crate::source::DataSource;
#[cfg(target_arch = "wasm32")]
use crate::surface::DomSurface;
#[cfg(target_arch = "wasm32")]
use crate::window::{RowWindowManager, UpdateOps};

/// Timing helper for frame metrics.
#[cfg(target_arch = "wasm32")]
pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

/// Data source backed by a JavaScript callback `(row, col) -> value`.
///
/// Strings pass through; numbers and booleans are stringified; anything
/// else (or a thrown exception) is a cell-level failure.
#[cfg(target_arch = "wasm32")]
pub(crate) struct JsDataSource {
    columns: usize,
    get_item: Function,
}

#[cfg(target_arch = "wasm32")]
impl JsDataSource {
    pub(crate) fn new(columns: usize, get_item: Function) -> Self {
        Self { columns, get_item }
    }
}

#[cfg(target_arch = "wasm32")]
impl DataSource for JsDataSource {
    fn number_of_columns(&self) -> usize {
        self.columns
    }

    fn get_item(&self, row: u64, col: usize) -> Result<String> {
        let value = self
            .get_item
            .call2(
                &JsValue::NULL,
                &JsValue::from_f64(row as f64),
                &JsValue::from_f64(col as f64),
            )
            .map_err(|e| GridError::Cell {
                row,
                col,
                message: e
                    .as_string()
                    .unwrap_or_else(|| "JavaScript callback threw".to_string()),
            })?;

        if let Some(text) = value.as_string() {
            Ok(text)
        } else if let Some(number) = value.as_f64() {
            Ok(number.to_string())
        } else if let Some(flag) = value.as_bool() {
            Ok(flag.to_string())
        } else {
            Err(GridError::Cell {
                row,
                col,
                message: "value is not displayable".to_string(),
            })
        }
    }
}

/// Everything that exists only while attached.
#[cfg(target_arch = "wasm32")]
struct AttachedState {
    manager: RowWindowManager<DomSurface>,
    surface: DomSurface,
    status: Option<HtmlElement>,
}

/// Shared state accessed by the frame closure and event handlers.
#[cfg(target_arch = "wasm32")]
struct SharedState {
    config: GridConfig,
    source: Option<JsDataSource>,
    attached: Option<AttachedState>,
    /// Cancellation flag: checked before every frame re-schedule.
    running: bool,
    /// Set once `destroy` has run; the instance cannot reattach.
    torn_down: bool,
    hover_callback: Option<Function>,
    last_frame_ms: f64,
    last_error: Option<String>,
}

#[cfg(target_arch = "wasm32")]
impl SharedState {
    /// Run one frame against taken-out attached state.
    ///
    /// Called with `attached` and `source` moved out of the `RefCell` so
    /// the JS data-source callback can re-enter viewer getters without
    /// tripping the borrow.
    fn frame(attached: &mut AttachedState, source: &JsDataSource) -> Result<UpdateOps> {
        let ops = attached.manager.render(&mut attached.surface, source)?;
        if let Some(status) = &attached.status {
            let metrics = attached.manager.metrics();
            let window_text = match (metrics.first_rendered, metrics.last_rendered) {
                (Some(first), Some(last)) => format!("rows {first}-{last}"),
                _ => "rows none".to_string(),
            };
            status.set_text_content(Some(&format!(
                "{window_text} | pool {} | built {} | failures {}",
                metrics.pooled_rows, metrics.total_constructed, metrics.cell_failures
            )));
        }
        Ok(ops)
    }
}

/// The main viewer struct exported to JavaScript.
#[wasm_bindgen]
pub struct GridView {
    #[cfg(target_arch = "wasm32")]
    state: Rc<RefCell<SharedState>>,
    /// Keeps the self-rescheduling frame closure alive for the session.
    #[cfg(target_arch = "wasm32")]
    frame_closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    #[cfg(target_arch = "wasm32")]
    hover_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    #[cfg(target_arch = "wasm32")]
    container: Option<HtmlElement>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl GridView {
    /// Create a viewer from a plain options object.
    ///
    /// Recognized options: `{rowHeight, columnWidth, borderWidth,
    /// preloadRows, sentinelLookahead}`; omitted fields use defaults.
    ///
    /// # Errors
    /// Returns an error for malformed options or invalid dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> std::result::Result<GridView, JsValue> {
        console_error_panic_hook::set_once();

        let options: GridOptions = if options.is_undefined() || options.is_null() {
            GridOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsValue::from_str(&format!("Invalid options: {e}")))?
        };
        let config = options.resolve()?;

        Ok(GridView {
            state: Rc::new(RefCell::new(SharedState {
                config,
                source: None,
                attached: None,
                running: false,
                torn_down: false,
                hover_callback: None,
                last_frame_ms: 0.0,
                last_error: None,
            })),
            frame_closure: Rc::new(RefCell::new(None)),
            hover_closure: None,
            container: None,
        })
    }

    /// Wire the data source: a fixed column count and a `(row, col)`
    /// callback returning the cell value.
    ///
    /// # Errors
    /// Fails with zero columns, or after the viewer has been attached
    /// (the column count is fixed for the viewer's lifetime).
    #[wasm_bindgen(js_name = setDataSource)]
    pub fn set_data_source(
        &mut self,
        columns: u32,
        get_item: Function,
    ) -> std::result::Result<(), JsValue> {
        let mut s = self.state.borrow_mut();
        if columns == 0 {
            return Err(GridError::Config("column count must be positive".into()).into());
        }
        if s.attached.is_some() || s.torn_down {
            return Err(GridError::Config(
                "data source must be set before attaching".into(),
            )
            .into());
        }
        s.source = Some(JsDataSource::new(columns as usize, get_item));
        Ok(())
    }

    /// Bind to a scrollable container (and an optional status readout
    /// target), run one synchronous frame, and start the frame loop.
    ///
    /// # Errors
    /// Fails if no data source is set, the viewer is already attached or
    /// torn down, or the first frame fails fatally.
    #[wasm_bindgen(js_name = attachTo)]
    pub fn attach_to(
        &mut self,
        container: HtmlElement,
        status: Option<HtmlElement>,
    ) -> std::result::Result<(), JsValue> {
        {
            let mut s = self.state.borrow_mut();
            if s.torn_down {
                return Err(GridError::Other("viewer was destroyed".into()).into());
            }
            if s.attached.is_some() {
                return Err(GridError::Other("viewer is already attached".into()).into());
            }
            let columns = s
                .source
                .as_ref()
                .map(DataSource::number_of_columns)
                .ok_or_else(|| GridError::Config("no data source set".into()))?;

            let surface = DomSurface::new(container.clone(), s.config)?;
            let manager = RowWindowManager::new(s.config, columns)?;
            s.attached = Some(AttachedState {
                manager,
                surface,
                status,
            });
            s.running = true;
        }

        // First frame runs synchronously so the grid is populated before
        // the first paint.
        Self::run_frame(&self.state)?;

        self.install_hover_listener(&container);
        self.container = Some(container);
        Self::start_frame_loop(&self.state, &self.frame_closure);
        Ok(())
    }

    /// Run a single frame manually and return the operations performed.
    ///
    /// # Errors
    /// Propagates fatal surface failures.
    pub fn render(&self) -> std::result::Result<JsValue, JsValue> {
        let ops = Self::run_frame(&self.state)?;
        serde_wasm_bindgen::to_value(&ops)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Snapshot of the window manager state.
    ///
    /// # Errors
    /// Fails when the viewer is not attached.
    pub fn metrics(&self) -> std::result::Result<JsValue, JsValue> {
        let s = self.state.borrow();
        let attached = s
            .attached
            .as_ref()
            .ok_or_else(|| GridError::Other("viewer is not attached".into()))?;
        serde_wasm_bindgen::to_value(&attached.manager.metrics())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Duration of the most recent frame in milliseconds.
    #[wasm_bindgen(js_name = lastFrameMs)]
    pub fn last_frame_ms(&self) -> f64 {
        self.state.borrow().last_frame_ms
    }

    /// Whether the frame loop is still scheduled.
    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// The fatal error that stopped the frame loop, if any.
    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    /// Register an observer invoked with the hovered row index.
    #[wasm_bindgen(js_name = setOnRowHover)]
    pub fn set_on_row_hover(&mut self, callback: Function) {
        self.state.borrow_mut().hover_callback = Some(callback);
    }

    /// Tear down: stop the frame loop, detach all materialized rows, and
    /// remove the extent marker. The instance cannot be reattached.
    pub fn destroy(&mut self) {
        // Clear the flag first so an in-flight frame cannot re-schedule.
        let attached = {
            let mut s = self.state.borrow_mut();
            s.running = false;
            s.torn_down = true;
            s.attached.take()
        };
        if let Some(mut attached) = attached {
            let _ = attached.manager.clear(&mut attached.surface);
            attached.surface.teardown();
        }
        if let (Some(container), Some(closure)) = (&self.container, &self.hover_closure) {
            let _ = container.remove_event_listener_with_callback(
                "mousemove",
                closure.as_ref().unchecked_ref(),
            );
        }
        self.hover_closure = None;
        // The frame closure stays allocated until the instance drops: a
        // frame may be mid-flight, and the cleared flag already prevents
        // any further re-schedule.
    }
}

#[cfg(target_arch = "wasm32")]
impl GridView {
    /// Execute one frame with state moved out of the cell (see
    /// [`SharedState::frame`]). Fatal errors stop the loop and are kept
    /// for `lastError`.
    fn run_frame(state: &Rc<RefCell<SharedState>>) -> Result<UpdateOps> {
        let started = now_ms();
        let (mut attached, source) = {
            let mut s = state.borrow_mut();
            let Some(attached) = s.attached.take() else {
                return Err(GridError::Other("viewer is not attached".into()));
            };
            let Some(source) = s.source.take() else {
                s.attached = Some(attached);
                return Err(GridError::Config("no data source set".into()));
            };
            (attached, source)
        };

        let result = SharedState::frame(&mut attached, &source);

        let mut s = state.borrow_mut();
        s.source = Some(source);
        if s.torn_down {
            // destroy() ran from inside the data-source callback; finish
            // the teardown it could not perform on the taken-out state.
            let _ = attached.manager.clear(&mut attached.surface);
            attached.surface.teardown();
        } else {
            s.attached = Some(attached);
        }
        s.last_frame_ms = now_ms() - started;

        match result {
            Ok(ops) => Ok(ops),
            Err(e) => {
                s.running = false;
                s.last_error = Some(e.to_string());
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "rowview frame loop stopped: {e}"
                )));
                Err(e)
            }
        }
    }

    /// Start the self-rescheduling frame loop. The closure re-schedules
    /// itself only while the cancellation flag is set.
    fn start_frame_loop(
        state: &Rc<RefCell<SharedState>>,
        holder: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    ) {
        let state = state.clone();
        let holder_for_closure = holder.clone();
        let closure = Closure::wrap(Box::new(move || {
            if !state.borrow().running {
                return;
            }
            if Self::run_frame(&state).is_err() {
                return;
            }
            if !state.borrow().running {
                return;
            }
            Self::schedule(&holder_for_closure);
        }) as Box<dyn FnMut()>);

        *holder.borrow_mut() = Some(closure);
        Self::schedule(holder);
    }

    fn schedule(holder: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(closure) = holder.borrow().as_ref() {
            let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        }
    }

    /// Delegate a single `mousemove` listener on the container; the row
    /// index is derived from the pointer position and current scroll, so
    /// no per-row wiring is needed.
    fn install_hover_listener(&mut self, container: &HtmlElement) {
        let state = self.state.clone();
        let container_for_hover = container.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let s = state.borrow();
            let Some(callback) = s.hover_callback.clone() else {
                return;
            };
            let row_extent = s.config.row_extent();
            drop(s);

            let rect = container_for_hover.get_bounding_client_rect();
            let y_in_content = f64::from(event.client_y) - rect.top()
                + f64::from(container_for_hover.scroll_top());
            if y_in_content < 0.0 {
                return;
            }
            let row = (y_in_content / row_extent).floor();
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_f64(row));
        }) as Box<dyn FnMut(MouseEvent)>);

        let _ = container
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        self.hover_closure = Some(closure);
    }
}
