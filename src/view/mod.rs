//! UI-agnostic view layer.
//!
//! [`state::ViewState`] owns the session state, [`table::TableModel`] the
//! sort/selection rules, and [`render`] projects both into a
//! [`tree::DisplayTree`]. The TUI (or a future web frontend) maps the tree
//! to framework-specific widgets.

pub mod format;
pub mod render;
pub mod state;
pub mod table;
pub mod tabs;
pub mod tree;

pub use render::render;
pub use state::{Applied, ViewState};
pub use table::{SortDirection, TableModel};
pub use tabs::{StoreProfile, Tab};
pub use tree::{CellContent, DisplayTree, TreeBody};

/// Name of the store inspected when none is given.
pub const DEFAULT_STORE_NAME: &str = "construction-documentation-ui-db";
