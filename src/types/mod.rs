//! Data types for the table widget.

mod column;
mod export;
mod row;
mod table;
mod view;

pub use column::*;
pub use export::*;
pub use row::*;
pub use table::*;
pub use view::*;
