//! Extension hooks for [`TableController`].
//!
//! An extension is registered on the [`TableBuilder`](crate::controller::TableBuilder)
//! and composed after the base controller: its `create_controls` runs once the
//! base control surface exists, `after_render` runs at the end of every render,
//! and `handle_action` receives every [`Action::Custom`] the base does not own.
//! Extensions only ever see the controller's public API.

use crate::controller::TableController;
use crate::controls::{Action, ControlSet};
use crate::error::Result;
use crate::types::ExportOutcome;

pub trait TableExtension {
    /// Short identifier used in log output.
    fn name(&self) -> &str;

    /// Amend the control surface. Runs after the base controls are built.
    fn create_controls(&self, _controls: &mut ControlSet) {}

    /// Observe the controller after each render.
    fn after_render(&self, _controller: &TableController) {}

    /// Handle a custom action. Return `Ok(None)` for actions this extension
    /// does not own so that the next extension gets a chance.
    fn handle_action(
        &self,
        _controller: &mut TableController,
        _action: &Action,
    ) -> Result<Option<ExportOutcome>> {
        Ok(None)
    }
}
