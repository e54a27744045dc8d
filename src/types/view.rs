use serde::{Deserialize, Serialize};

use super::SortDirection;

/// Search, sort, and paging state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Normalized (trimmed, lowercased) search term.
    pub search_term: String,
    pub sort_column: Option<usize>,
    pub sort_direction: SortDirection,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl ViewState {
    pub fn new(per_page: usize) -> Self {
        Self {
            search_term: String::new(),
            sort_column: None,
            sort_direction: SortDirection::Asc,
            page: 1,
            per_page,
        }
    }
}

/// One entry of the page-number window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// What a pagination button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageButtonKind {
    Prev,
    Next,
    Page(usize),
    Ellipsis,
}

/// A rendered pagination button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageButton {
    pub kind: PageButtonKind,
    pub label: String,
    pub disabled: bool,
    pub active: bool,
}

/// Rendered state of the header "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectAllState {
    pub checked: bool,
    pub disabled: bool,
}
