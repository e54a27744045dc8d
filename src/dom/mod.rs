//! Browser binding: enhance a live `<table>` element.
//!
//! `TableWidget` reads the table into a [`TableController`], builds the
//! control markup around it, and wires the listeners. Every listener follows
//! the same shape: mutate the controller, then [`view::sync`] the page.
//! Listener closures hold only a weak reference to the shared state, so the
//! widget and everything it registered go away together.

mod host;
mod reader;
mod view;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::controller::{RowSource, TableController, DEFAULT_PER_PAGE};
use crate::error::TableError;
use crate::export_selected::{SelectionExport, SelectionExportExtension};
use crate::types::{Checkbox, Table};

pub use host::{AlertNotifier, DownloadSink};

use reader::RowBinding;
use view::ControlElements;

/// Tables with this class are enhanced by [`init_all`].
pub const AUTO_INIT_SELECTOR: &str = "table.simpletable";

fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

#[allow(clippy::cast_possible_truncation)]
fn timeout_ms(ms: f64) -> i32 {
    ms.ceil().clamp(0.0, f64::from(i32::MAX)) as i32
}

fn init_logging() {
    // Both are no-ops after the first call
    let _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}

struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// State shared between the widget and its event handlers.
pub(crate) struct WidgetState {
    controller: Option<TableController>,
    table: HtmlElement,
    tbody: HtmlElement,
    ui: Option<ControlElements>,
    headers: Vec<HtmlElement>,
    select_all: Option<(Rc<Checkbox>, HtmlInputElement)>,
    rows: Vec<RowBinding>,
    placeholder: Option<Element>,
    search_timer: Option<i32>,
    search_closure: Option<Closure<dyn FnMut()>>,
    listeners: Vec<Listener>,
}

impl WidgetState {
    fn find_checkbox(&self, target: &EventTarget) -> Option<Rc<Checkbox>> {
        self.rows.iter().find_map(|binding| {
            binding
                .checkboxes
                .iter()
                .find(|(_, input)| AsRef::<EventTarget>::as_ref(input) == target)
                .map(|(checkbox, _)| Rc::clone(checkbox))
        })
    }
}

/// Run `f` against the controller and re-sync the page.
fn update(state: &Rc<RefCell<WidgetState>>, f: impl FnOnce(&mut TableController)) {
    let mut s = state.borrow_mut();
    let Some(controller) = s.controller.as_mut() else {
        return;
    };
    f(controller);
    view::sync(&mut s);
}

fn listen(
    state: &Rc<RefCell<WidgetState>>,
    target: &EventTarget,
    event: &'static str,
    handler: impl Fn(&Rc<RefCell<WidgetState>>, Event) + 'static,
) {
    let weak: Weak<RefCell<WidgetState>> = Rc::downgrade(state);
    let closure = Closure::wrap(Box::new(move |event: Event| {
        if let Some(state) = weak.upgrade() {
            handler(&state, event);
        }
    }) as Box<dyn FnMut(Event)>);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("could not attach '{event}' listener");
    }
    state.borrow_mut().listeners.push(Listener {
        target: target.clone(),
        event,
        closure,
    });
}

fn event_element(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

/// An enhanced table.
#[wasm_bindgen]
pub struct TableWidget {
    state: Rc<RefCell<WidgetState>>,
}

impl TableWidget {
    fn build(
        table: HtmlElement,
        per_page: usize,
        selection_export: bool,
    ) -> Result<TableWidget, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| TableError::Host("no document".into()))?;
        let tbody = table
            .query_selector("tbody")?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| TableError::InvalidInput("table has no <tbody>".into()))?;

        let headers = reader::read_headers(&table);
        let rows = reader::read_rows(&tbody);
        let core = Table::new(
            headers.headers,
            rows.iter().map(|binding| binding.row.clone()).collect(),
        );

        let mut builder = TableController::builder(core)
            .per_page(per_page)
            .sink(DownloadSink)
            .notifier(AlertNotifier);
        if selection_export {
            builder = builder.extension(SelectionExportExtension::new());
        }
        let controller = builder.build()?;
        let ui = ControlElements::create(&document, &table, controller.controls())?;

        let state = Rc::new(RefCell::new(WidgetState {
            controller: Some(controller),
            table,
            tbody,
            ui: Some(ui),
            headers: headers.elements,
            select_all: headers.select_all,
            rows,
            placeholder: None,
            search_timer: None,
            search_closure: None,
            listeners: Vec::new(),
        }));
        Self::wire_listeners(&state);
        view::sync(&mut state.borrow_mut());
        Ok(TableWidget { state })
    }

    fn wire_listeners(state: &Rc<RefCell<WidgetState>>) {
        let (search, export_group, per_page, pagination, tbody, select_all, sortable) = {
            let s = state.borrow();
            let Some(ui) = s.ui.as_ref() else {
                return;
            };
            let sortable: Vec<(usize, HtmlElement)> = s
                .controller
                .as_ref()
                .map(|c| c.table().headers())
                .unwrap_or_default()
                .iter()
                .zip(&s.headers)
                .enumerate()
                .filter(|(_, (header, _))| header.is_sortable())
                .map(|(index, (_, element))| (index, element.clone()))
                .collect();
            (
                ui.search.clone(),
                ui.export_group.clone(),
                ui.per_page.clone(),
                ui.pagination.clone(),
                s.tbody.clone(),
                s.select_all.as_ref().map(|(_, input)| input.clone()),
                sortable,
            )
        };

        let search_input = search.clone();
        listen(state, &search, "input", move |state, _| {
            let value = search_input.value();
            if let Some(controller) = state.borrow_mut().controller.as_mut() {
                controller.search_input(&value, now_ms());
            }
            Self::schedule_search(state);
        });

        for (index, element) in sortable {
            let _ = element.style().set_property("cursor", "pointer");
            listen(state, &element, "click", move |state, _| {
                update(state, |c| c.handle_sort(index));
            });
        }

        listen(state, &tbody, "change", |state, event| {
            let Some(target) = event.target() else {
                return;
            };
            let Some(input) = target.dyn_ref::<HtmlInputElement>() else {
                return;
            };
            let checked = input.checked();
            let checkbox = state.borrow().find_checkbox(&target);
            if let Some(checkbox) = checkbox {
                update(state, |c| c.set_checkbox(&checkbox, checked));
            }
        });

        if let Some(input) = select_all {
            let select_all_input = input.clone();
            listen(state, &input, "change", move |state, _| {
                let checked = select_all_input.checked();
                update(state, |c| c.toggle_select_all(checked));
            });
        }

        let per_page_select: HtmlSelectElement = per_page.clone();
        listen(state, &per_page, "change", move |state, _| {
            match per_page_select.value().parse::<usize>() {
                Ok(n) => update(state, |c| {
                    if let Err(err) = c.set_per_page(n) {
                        log::warn!("{err}");
                    }
                }),
                Err(_) => log::warn!("ignoring per-page value '{}'", per_page_select.value()),
            }
        });

        listen(state, &export_group, "click", |state, event| {
            let Some(index) = event_element(&event, "button")
                .and_then(|b| b.get_attribute("data-index"))
                .and_then(|i| i.parse::<usize>().ok())
            else {
                return;
            };
            update(state, |c| {
                let Some(action) = c.controls().export_group.get(index).map(|b| b.action.clone())
                else {
                    return;
                };
                if let Err(err) = c.trigger(&action) {
                    log::error!("export failed: {err}");
                    c.warn(&err.to_string());
                }
            });
        });

        listen(state, &pagination, "click", |state, event| {
            let Some(kind) = event_element(&event, "button")
                .filter(|b| !b.has_attribute("disabled"))
                .and_then(|b| view::page_button_kind(&b))
            else {
                return;
            };
            update(state, |c| c.press_page_button(kind));
        });
    }

    /// (Re)arm the search timer for whatever search is pending.
    fn schedule_search(state: &Rc<RefCell<WidgetState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if let Some(timer) = s.search_timer.take() {
            window.clear_timeout_with_handle(timer);
        }
        let Some(delay) = s
            .controller
            .as_ref()
            .and_then(|c| c.search_pending_ms(now_ms()))
        else {
            return;
        };
        if s.search_closure.is_none() {
            let weak = Rc::downgrade(state);
            s.search_closure = Some(Closure::wrap(Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    Self::handle_search_timeout(&state);
                }
            }) as Box<dyn FnMut()>));
        }
        let Some(callback) = s.search_closure.as_ref() else {
            return;
        };
        let timer = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout_ms(delay),
            )
            .ok();
        s.search_timer = timer;
    }

    fn handle_search_timeout(state: &Rc<RefCell<WidgetState>>) {
        let ran = {
            let mut s = state.borrow_mut();
            s.search_timer = None;
            let ran = s
                .controller
                .as_mut()
                .is_some_and(|c| c.poll_search(now_ms()));
            if ran {
                view::sync(&mut s);
            }
            ran
        };
        if !ran {
            // Fired a little early; wait out the rest of the window
            Self::schedule_search(state);
        }
    }

    fn with_controller<T>(
        &self,
        f: impl FnOnce(&mut TableController) -> crate::error::Result<T>,
    ) -> Result<T, JsValue> {
        let mut s = self.state.borrow_mut();
        let controller = s
            .controller
            .as_mut()
            .ok_or_else(|| TableError::InvalidInput("widget was destroyed".into()))?;
        let result = f(controller);
        view::sync(&mut s);
        result.map_err(JsValue::from)
    }
}

#[wasm_bindgen]
impl TableWidget {
    /// Enhance `table`. `per_page` defaults to 10; the export-selected button
    /// is added unless `selection_export` is `false`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        table: Option<HtmlElement>,
        per_page: Option<usize>,
        selection_export: Option<bool>,
    ) -> Result<TableWidget, JsValue> {
        init_logging();
        let table =
            table.ok_or_else(|| TableError::InvalidInput("Table element is required".into()))?;
        Self::build(
            table,
            per_page.unwrap_or(DEFAULT_PER_PAGE),
            selection_export.unwrap_or(true),
        )
    }

    #[wasm_bindgen(js_name = exportToCsv)]
    pub fn export_to_csv(&self) -> Result<(), JsValue> {
        self.with_controller(|c| c.export_to_csv().map(|_| ()))
    }

    #[wasm_bindgen(js_name = exportToExcel)]
    pub fn export_to_excel(&self) -> Result<(), JsValue> {
        self.with_controller(|c| c.export_to_excel().map(|_| ()))
    }

    #[wasm_bindgen(js_name = exportSelected)]
    pub fn export_selected(&self) -> Result<(), JsValue> {
        self.with_controller(|c| c.export_selected().map(|_| ()))
    }

    #[wasm_bindgen(js_name = getSelectedIds)]
    pub fn selected_ids(&self) -> Result<Vec<String>, JsValue> {
        self.with_controller(|c| Ok(c.selected_ids()))
    }

    /// Export records of the filtered rows as plain objects.
    #[wasm_bindgen(js_name = getExportData)]
    pub fn export_data(&self) -> Result<JsValue, JsValue> {
        let data = self.with_controller(|c| Ok(c.export_data(None)))?;
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        serde::Serialize::serialize(&data.rows, &serializer)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    #[wasm_bindgen(js_name = setSearch)]
    pub fn set_search(&self, term: &str) -> Result<(), JsValue> {
        self.with_controller(|c| {
            c.set_search(term);
            Ok(())
        })
    }

    pub fn sort(&self, column: usize) -> Result<(), JsValue> {
        self.with_controller(|c| {
            c.handle_sort(column);
            Ok(())
        })
    }

    #[wasm_bindgen(js_name = goToPage)]
    pub fn go_to_page(&self, page: usize) -> Result<(), JsValue> {
        self.with_controller(|c| {
            c.go_to_page(page);
            Ok(())
        })
    }

    #[wasm_bindgen(js_name = setPerPage)]
    pub fn set_per_page(&self, per_page: usize) -> Result<(), JsValue> {
        self.with_controller(|c| c.set_per_page(per_page))
    }

    /// Replace the body rows with `html` (`<tr>` markup).
    #[wasm_bindgen(js_name = updateData)]
    pub fn update_data(&self, html: &str) -> Result<(), JsValue> {
        let mut s = self.state.borrow_mut();
        s.placeholder = None;
        s.tbody.set_inner_html(html);
        s.rows = reader::read_rows(&s.tbody);
        let rows = s.rows.iter().map(|binding| binding.row.clone()).collect();
        drop(s);
        self.with_controller(|c| c.update_data(RowSource::Rows(rows)))
    }

    /// Remove the controls and listeners and show every row again.
    pub fn destroy(self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = self.state.borrow_mut();
        if let Some(timer) = s.search_timer.take() {
            window.clear_timeout_with_handle(timer);
        }
        for listener in s.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
        if let Some(controller) = s.controller.take() {
            let _table = controller.destroy();
        }
        if let Some(old) = s.placeholder.take() {
            old.remove();
        }
        for binding in &s.rows {
            let _ = binding.element.style().set_property("display", "");
        }
        for header in &s.headers {
            let _ = header.class_list().remove_2("sort-asc", "sort-desc");
        }
        if let Some(ui) = s.ui.take() {
            ui.remove(&s.table);
        }
        log::debug!("table widget destroyed");
    }
}

/// Enhance every `table.simpletable` on the page.
///
/// Construction errors are logged per table and do not stop the others.
#[wasm_bindgen(js_name = initAll)]
pub fn init_all() -> js_sys::Array {
    init_logging();
    let widgets = js_sys::Array::new();
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return widgets;
    };
    let Ok(tables) = document.query_selector_all(AUTO_INIT_SELECTOR) else {
        return widgets;
    };
    for i in 0..tables.length() {
        let Some(table) = tables
            .item(i)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        match TableWidget::build(table, DEFAULT_PER_PAGE, true) {
            Ok(widget) => {
                widgets.push(&JsValue::from(widget));
            }
            Err(err) => log::error!("SimpleTable initialization error: {err:?}"),
        }
    }
    log::info!("enhanced {} tables", widgets.length());
    widgets
}
