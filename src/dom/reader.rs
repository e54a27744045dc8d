//! Read a live `<table>` into the core model, keeping the element bindings.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlInputElement, Node};

use crate::types::{CellNode, Checkbox, ColumnHeader, HeaderControl, Row, TableCell};

const NO_EXPORT_CLASS: &str = "no-export";
const ROW_NUMBER_CLASS: &str = "row-number";

/// A core row together with the elements that display it.
pub(crate) struct RowBinding {
    pub row: Row,
    pub element: HtmlElement,
    pub number_cell: Option<HtmlElement>,
    pub checkboxes: Vec<(Rc<Checkbox>, HtmlInputElement)>,
}

pub(crate) struct HeaderBindings {
    pub headers: Vec<ColumnHeader>,
    pub elements: Vec<HtmlElement>,
    pub select_all: Option<(Rc<Checkbox>, HtmlInputElement)>,
}

fn elements(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn read_headers(table: &Element) -> HeaderBindings {
    let mut bindings = HeaderBindings {
        headers: Vec::new(),
        elements: Vec::new(),
        select_all: None,
    };

    for th in elements(table, "thead th") {
        let label = th.text_content().unwrap_or_default();
        let mut header = ColumnHeader::new(label);
        if th.class_list().contains(NO_EXPORT_CLASS) {
            header = header.no_export();
        }

        let checkbox = th
            .query_selector("input[type=checkbox]")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        if let Some(input) = checkbox {
            let control = Checkbox::new(None, input.checked());
            header = header.with_control(HeaderControl::SelectAll(Rc::clone(&control)));
            if bindings.select_all.is_none() {
                bindings.select_all = Some((control, input));
            }
        } else if th.query_selector("input, select, button").ok().flatten().is_some() {
            header = header.with_control(HeaderControl::Other);
        }

        if let Ok(element) = th.dyn_into::<HtmlElement>() {
            bindings.headers.push(header);
            bindings.elements.push(element);
        }
    }
    bindings
}

pub(crate) fn read_rows(tbody: &Element) -> Vec<RowBinding> {
    elements(tbody, "tr")
        .into_iter()
        .filter(|tr| !tr.class_list().contains("simpletable-empty"))
        .filter_map(|tr| tr.dyn_into::<HtmlElement>().ok())
        .map(|tr| read_row(&tr))
        .collect()
}

fn read_row(tr: &HtmlElement) -> RowBinding {
    let mut checkboxes = Vec::new();
    let mut number_cell = None;
    let mut cells = Vec::new();

    for td in elements(tr, ":scope > td, :scope > th") {
        let mut nodes = Vec::new();
        collect_nodes(&td, &mut nodes, &mut checkboxes);
        let mut cell = TableCell::new(nodes);
        if td.class_list().contains(ROW_NUMBER_CLASS) {
            cell = cell.into_row_number();
            if number_cell.is_none() {
                number_cell = td.dyn_into::<HtmlElement>().ok();
            }
        }
        cells.push(cell);
    }

    RowBinding {
        row: Row::new(cells),
        element: tr.clone(),
        number_cell,
        checkboxes,
    }
}

fn collect_nodes(
    parent: &Node,
    nodes: &mut Vec<CellNode>,
    checkboxes: &mut Vec<(Rc<Checkbox>, HtmlInputElement)>,
) {
    let children = parent.child_nodes();
    for i in 0..children.length() {
        let Some(child) = children.item(i) else {
            continue;
        };
        if child.node_type() == Node::TEXT_NODE {
            nodes.push(CellNode::Text(child.text_content().unwrap_or_default()));
            continue;
        }
        let Ok(element) = child.dyn_into::<Element>() else {
            continue;
        };
        match element.tag_name().to_ascii_lowercase().as_str() {
            "button" => nodes.push(CellNode::Button(element.text_content().unwrap_or_default())),
            "input" => match element.dyn_into::<HtmlInputElement>() {
                Ok(input) if input.type_().eq_ignore_ascii_case("checkbox") => {
                    let checkbox = Checkbox::new(input.get_attribute("value"), input.checked());
                    checkbox.set_disabled(input.disabled());
                    nodes.push(CellNode::Checkbox(Rc::clone(&checkbox)));
                    checkboxes.push((checkbox, input));
                }
                _ => nodes.push(CellNode::Control),
            },
            "select" | "textarea" => nodes.push(CellNode::Control),
            "script" | "style" => {}
            _ => collect_nodes(&element, nodes, checkboxes),
        }
    }
}
