//! UI-agnostic display tree.
//!
//! The projection in [`super::render`] produces these types; the TUI maps
//! them to ratatui widgets. A different frontend would map them to its own
//! widget set without touching the projection.

use super::table::SortDirection;
use super::tabs::Tab;

/// Rendered form of one cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// Missing field: an empty cell.
    Empty,
    /// The literal `null` token.
    Null,
    /// Plain scalar text.
    Text(String),
    /// Negative number, painted with a warning marker.
    Negative(String),
    /// Image-typed binary under the thumbnail threshold. The caption is
    /// shown until a thumbnail loads; a text frontend always shows it.
    Thumbnail { caption: String },
    /// Any other binary value, caption only.
    Binary { caption: String },
    /// Array/object: collapsed summary with an expandable pretty-printed
    /// body. Expanding must not change the selection.
    Expandable { summary: String, body: String },
}

/// One projected cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub content: CellContent,
    /// Cells of the column literally named `version` are painted accented.
    pub version_accent: bool,
}

/// One projected row with its highlight flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub cells: Vec<CellView>,
    pub selected: bool,
    pub related: bool,
}

/// One column header.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub name: String,
    pub version_accent: bool,
    /// Present when this column drives the active sort.
    pub sort: Option<SortDirection>,
}

/// One collection rendered as a titled table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSection {
    /// Collection name, used to address sort/selection updates.
    pub collection: String,
    /// Section heading: collection name and row count.
    pub title: String,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
}

/// The content of one tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabView {
    pub tab: Tab,
    pub sections: Vec<TableSection>,
    /// Shown instead of sections when the tab has nothing to display.
    pub placeholder: Option<String>,
}

/// Whole-view projection handed to the frontend.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTree {
    /// Window/header title: store name and version, or a neutral fallback.
    pub title: String,
    pub body: TreeBody,
}

/// Either the active tab's tables or a store-level placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeBody {
    /// No store delivered: message naming the missing target.
    MissingStore { message: String },
    Tab(TabView),
}
