//! Control surface elements and the state-to-DOM sync.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, HtmlTableCellElement,
};

use crate::controls::ControlSet;
use crate::types::{PageButtonKind, Placeholder};

use super::WidgetState;

pub(crate) const CONTAINER_CLASS: &str = "simpletable-container";
pub(crate) const EMPTY_ROW_CLASS: &str = "simpletable-empty";

/// Elements created around the table.
pub(crate) struct ControlElements {
    pub container: HtmlElement,
    pub search: HtmlInputElement,
    pub export_group: HtmlElement,
    pub per_page: HtmlSelectElement,
    pub counter: HtmlElement,
    pub pagination: HtmlElement,
    pub info: HtmlElement,
}

fn create<T: JsCast>(document: &Document, tag: &str, class: &str) -> Result<T, JsValue> {
    let element = document.create_element(tag)?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("unexpected element type for <{tag}>")))
}

impl ControlElements {
    /// Build the control markup and move `table` into the new container.
    pub fn create(
        document: &Document,
        table: &HtmlElement,
        controls: &ControlSet,
    ) -> Result<Self, JsValue> {
        let container: HtmlElement = create(document, "div", CONTAINER_CLASS)?;
        let wrap: HtmlElement = create(document, "div", "simpletable-controls")?;
        let search_wrap: HtmlElement = create(document, "div", "simpletable-search")?;
        let right: HtmlElement = create(document, "div", "simpletable-controls-right")?;

        let search: HtmlInputElement = create(document, "input", "")?;
        search.set_placeholder(&controls.search_placeholder);

        let export_group: HtmlElement = create(document, "div", "simpletable-export-group")?;
        for (index, item) in controls.export_group.iter().enumerate() {
            let button: HtmlButtonElement = create(
                document,
                "button",
                &format!("simpletable-export-btn {}", item.class),
            )?;
            button.set_inner_html(&item.label);
            button.set_title(&item.title);
            button.set_attribute("data-index", &index.to_string())?;
            export_group.append_child(&button)?;
        }

        let per_page: HtmlSelectElement = create(document, "select", "simpletable-perpage")?;
        fill_per_page(&per_page, &controls.per_page_labels())?;
        per_page.set_value(&controls.per_page.to_string());

        let counter: HtmlElement = create(document, "span", "simpletable-selection")?;

        search_wrap.append_child(&search)?;
        right.append_child(&export_group)?;
        right.append_child(&per_page)?;
        right.append_child(&counter)?;
        wrap.append_child(&search_wrap)?;
        wrap.append_child(&right)?;
        container.append_child(&wrap)?;

        if let Some(parent) = table.parent_node() {
            parent.insert_before(&container, Some(table))?;
        }
        container.append_child(table)?;

        let pagination: HtmlElement = create(document, "div", "simpletable-pagination")?;
        let info: HtmlElement = create(document, "div", "simpletable-info")?;
        container.append_child(&pagination)?;
        container.append_child(&info)?;

        Ok(Self {
            container,
            search,
            export_group,
            per_page,
            counter,
            pagination,
            info,
        })
    }

    /// Mirror the dynamic parts of the control set.
    ///
    /// While a search is pending the box holds newer input than the
    /// committed term and is left alone.
    pub fn sync(&self, controls: &ControlSet, search_pending: bool) {
        self.counter
            .set_text_content(Some(&controls.selection_counter));
        self.info.set_text_content(Some(&controls.info));
        if !search_pending && self.search.value() != controls.search_value {
            self.search.set_value(&controls.search_value);
        }
        let labels = controls.per_page_labels();
        if per_page_values(&self.per_page) != labels {
            if let Err(err) = fill_per_page(&self.per_page, &labels) {
                log::warn!("per-page options render failed: {err:?}");
            }
        }
        let per_page = controls.per_page.to_string();
        if self.per_page.value() != per_page {
            self.per_page.set_value(&per_page);
        }
        if let Err(err) = self.render_pagination(controls) {
            log::warn!("pagination render failed: {err:?}");
        }
    }

    fn render_pagination(&self, controls: &ControlSet) -> Result<(), JsValue> {
        self.pagination.set_inner_html("");
        let Some(document) = self.pagination.owner_document() else {
            return Ok(());
        };
        for item in &controls.pagination {
            let button: HtmlButtonElement =
                create(&document, "button", if item.active { "active" } else { "" })?;
            button.set_text_content(Some(&item.label));
            button.set_disabled(item.disabled);
            let (kind, page) = match item.kind {
                PageButtonKind::Prev => ("prev", String::new()),
                PageButtonKind::Next => ("next", String::new()),
                PageButtonKind::Page(n) => ("page", n.to_string()),
                PageButtonKind::Ellipsis => ("ellipsis", String::new()),
            };
            button.set_attribute("data-kind", kind)?;
            if !page.is_empty() {
                button.set_attribute("data-page", &page)?;
            }
            self.pagination.append_child(&button)?;
        }
        Ok(())
    }

    /// Take the container out again, leaving the table where the container was.
    pub fn remove(&self, table: &HtmlElement) {
        if let Some(parent) = self.container.parent_node() {
            let _ = parent.insert_before(table, Some(&self.container));
        }
        self.container.remove();
    }
}

/// Parse the pagination button a click landed on.
pub(crate) fn page_button_kind(button: &Element) -> Option<PageButtonKind> {
    match button.get_attribute("data-kind")?.as_str() {
        "prev" => Some(PageButtonKind::Prev),
        "next" => Some(PageButtonKind::Next),
        "page" => button
            .get_attribute("data-page")?
            .parse()
            .ok()
            .map(PageButtonKind::Page),
        _ => None,
    }
}

fn per_page_values(select: &HtmlSelectElement) -> Vec<String> {
    (0..select.length())
        .filter_map(|index| select.item(index))
        .filter_map(|element| element.dyn_into::<HtmlOptionElement>().ok())
        .map(|option| option.value())
        .collect()
}

/// Replace the selector's options with `labels`.
fn fill_per_page(select: &HtmlSelectElement, labels: &[String]) -> Result<(), JsValue> {
    select.set_inner_html("");
    for label in labels {
        let option = HtmlOptionElement::new_with_text_and_value(label, label)?;
        select.append_child(&option)?;
    }
    Ok(())
}

fn set_visible(element: &HtmlElement, visible: bool) {
    let _ = element
        .style()
        .set_property("display", if visible { "" } else { "none" });
}

fn create_placeholder(tbody: &HtmlElement, placeholder: &Placeholder) -> Result<Element, JsValue> {
    let document = tbody
        .owner_document()
        .ok_or_else(|| JsValue::from_str("table is detached"))?;
    let row = document.create_element("tr")?;
    row.set_class_name(EMPTY_ROW_CLASS);
    let cell: HtmlTableCellElement = create(&document, "td", "")?;
    cell.set_col_span(u32::try_from(placeholder.colspan).unwrap_or(u32::MAX));
    cell.set_text_content(Some(&placeholder.message));
    row.append_child(&cell)?;
    tbody.append_child(&row)?;
    Ok(row)
}

/// Mirror the controller's state into the page.
pub(crate) fn sync(state: &mut WidgetState) {
    let Some(controller) = state.controller.as_ref() else {
        return;
    };

    for binding in &state.rows {
        let visible = !binding.row.is_hidden();
        set_visible(&binding.element, visible);
        for (checkbox, input) in &binding.checkboxes {
            input.set_checked(checkbox.is_checked());
        }
        if visible {
            if let (Some(element), Some(cell)) =
                (&binding.number_cell, binding.row.row_number_cell())
            {
                element.set_text_content(Some(&cell.text_content()));
            }
        }
    }

    if let Some(old) = state.placeholder.take() {
        old.remove();
    }
    if let Some(placeholder) = controller.table().placeholder() {
        match create_placeholder(&state.tbody, placeholder) {
            Ok(row) => state.placeholder = Some(row),
            Err(err) => log::warn!("could not insert empty-state row: {err:?}"),
        }
    }

    for (element, header) in state.headers.iter().zip(controller.table().headers()) {
        let classes = element.class_list();
        let _ = classes.remove_2("sort-asc", "sort-desc");
        if let Some(direction) = header.sort_marker() {
            let _ = classes.add_1(direction.css_class());
        }
    }

    if let Some((checkbox, input)) = &state.select_all {
        input.set_checked(checkbox.is_checked());
        input.set_disabled(checkbox.is_disabled());
    }

    if let Some(ui) = &state.ui {
        ui.sync(controller.controls(), controller.search_pending());
    }
}
