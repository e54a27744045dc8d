//! Checkbox selection bookkeeping.
//!
//! Checked state is remembered per checkbox *identity* so it survives paging
//! and filtering. The association is weak: it never keeps a checkbox alive,
//! and entries whose checkbox has been dropped (e.g. after `update_data`
//! replaced the rows) are purged on the next write.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::types::Checkbox;

/// Identity-keyed, non-owning map from checkbox to its recorded state.
#[derive(Debug, Default)]
pub struct SelectionState {
    entries: HashMap<*const Checkbox, (Weak<Checkbox>, bool)>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the checked state of a checkbox.
    pub fn set(&mut self, checkbox: &Rc<Checkbox>, checked: bool) {
        self.purge();
        self.entries
            .insert(Rc::as_ptr(checkbox), (Rc::downgrade(checkbox), checked));
    }

    /// Recorded state, if any. A dead entry at a reused address never matches.
    pub fn get(&self, checkbox: &Rc<Checkbox>) -> Option<bool> {
        let (weak, checked) = self.entries.get(&Rc::as_ptr(checkbox))?;
        let live = weak.upgrade()?;
        Rc::ptr_eq(&live, checkbox).then_some(*checked)
    }

    pub fn contains(&self, checkbox: &Rc<Checkbox>) -> bool {
        self.get(checkbox).is_some()
    }

    /// Number of entries whose checkbox is still alive.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|(weak, _)| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries for checkboxes nobody references anymore.
    pub fn purge(&mut self) {
        self.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut state = SelectionState::new();
        let a = Checkbox::new(None, false);
        let b = Checkbox::new(None, false);
        state.set(&a, true);
        assert_eq!(state.get(&a), Some(true));
        assert_eq!(state.get(&b), None);
        state.set(&a, false);
        assert_eq!(state.get(&a), Some(false));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_entry_does_not_keep_checkbox_alive() {
        let mut state = SelectionState::new();
        let a = Checkbox::new(None, false);
        let weak = Rc::downgrade(&a);
        state.set(&a, true);
        drop(a);
        assert!(weak.upgrade().is_none());
        assert!(state.is_empty());
        state.purge();
        assert!(state.entries.is_empty());
    }

    #[test]
    fn test_identity_not_value() {
        let mut state = SelectionState::new();
        let a = Checkbox::new(Some("1".into()), false);
        let same_value = Checkbox::new(Some("1".into()), false);
        state.set(&a, true);
        assert!(!state.contains(&same_value));
    }
}
